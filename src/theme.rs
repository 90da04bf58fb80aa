//! Centralized theme and styling for the TUI
//!
//! Single source of truth for the colors and styles used by the
//! questionnaire and admin screens.
//!
//! # Usage
//! ```rust
//! use laptop_picker::theme::{Colors, Styles, Theme};
//! use laptop_picker::engine::ScoreBand;
//! use ratatui::style::Style;
//!
//! let style = Style::default().fg(Colors::PRIMARY);
//! let title_style = Styles::title();
//! let badge = Theme::score_style(ScoreBand::Good);
//! ```

use crate::engine::ScoreBand;
use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// Core color palette for the application
pub struct Colors;

impl Colors {
    // -------------------------------------------------------------------------
    // Base Colors
    // -------------------------------------------------------------------------

    /// Panel and dialog background
    pub const BG_PRIMARY: Color = Color::Rgb(20, 20, 30);

    /// Background of the delete confirmation
    pub const BG_DANGER: Color = Color::Rgb(30, 20, 20);

    pub const FG_PRIMARY: Color = Color::White;
    pub const FG_SECONDARY: Color = Color::Gray;
    pub const FG_MUTED: Color = Color::DarkGray;

    // -------------------------------------------------------------------------
    // Accents
    // -------------------------------------------------------------------------

    /// Borders, titles, highlights
    pub const PRIMARY: Color = Color::Cyan;

    /// Chosen answers, emphasis
    pub const SECONDARY: Color = Color::Yellow;

    // -------------------------------------------------------------------------
    // Semantic Colors
    // -------------------------------------------------------------------------

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // -------------------------------------------------------------------------
    // UI Element Colors
    // -------------------------------------------------------------------------

    pub const BORDER_ACTIVE: Color = Color::Cyan;
    pub const BORDER_INACTIVE: Color = Color::DarkGray;

    /// Highlighted row
    pub const SELECTED_BG: Color = Color::Yellow;

    /// Highlighted row text (for contrast on yellow bg)
    pub const SELECTED_FG: Color = Color::Black;

    pub const NAV_HINT: Color = Color::DarkGray;

    /// Laptops marked for comparison
    pub const MARKED: Color = Color::LightMagenta;

    // -------------------------------------------------------------------------
    // Score badges
    // -------------------------------------------------------------------------

    pub const SCORE_GOOD: Color = Color::Green;
    pub const SCORE_FAIR: Color = Color::Yellow;
    pub const SCORE_POOR: Color = Color::Red;

    // -------------------------------------------------------------------------
    // Stepper
    // -------------------------------------------------------------------------

    pub const STEP_ACTIVE: Color = Color::Yellow;
    pub const STEP_COMPLETE: Color = Color::Green;
    pub const STEP_PENDING: Color = Color::Gray;
}

// =============================================================================
// PRE-BUILT STYLES
// =============================================================================

/// Pre-built styles for common UI patterns
pub struct Styles;

impl Styles {
    pub fn text() -> Style {
        Style::default().fg(Colors::FG_PRIMARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Colors::FG_SECONDARY)
    }

    /// Main title style (cyan, bold)
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header row
    pub fn header() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn border_active() -> Style {
        Style::default().fg(Colors::BORDER_ACTIVE)
    }

    pub fn border_inactive() -> Style {
        Style::default().fg(Colors::BORDER_INACTIVE)
    }

    pub fn panel_bg() -> Style {
        Style::default().bg(Colors::BG_PRIMARY)
    }

    pub fn panel_bg_danger() -> Style {
        Style::default().bg(Colors::BG_DANGER)
    }

    /// Highlighted list or table row
    pub fn selected() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// An answer the user picked
    pub fn chosen() -> Style {
        Style::default()
            .fg(Colors::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Focused input field
    pub fn focused() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn marked() -> Style {
        Style::default().fg(Colors::MARKED)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    /// Selected dialog button
    pub fn button_active() -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Selected destructive button
    pub fn button_danger() -> Style {
        Style::default()
            .fg(Colors::FG_PRIMARY)
            .bg(Colors::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    /// Navigation hint (keybindings)
    pub fn nav_hint() -> Style {
        Style::default().fg(Colors::NAV_HINT)
    }
}

// =============================================================================
// THEME CONTEXT
// =============================================================================

/// Severity level for dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Danger,
}

/// Semantic style lookups
pub struct Theme;

impl Theme {
    /// Border color for a severity level
    pub fn severity_color(severity: Severity) -> Color {
        match severity {
            Severity::Info => Colors::PRIMARY,
            Severity::Warning => Colors::WARNING,
            Severity::Danger => Colors::ERROR,
        }
    }

    /// Title text for a severity level
    pub fn severity_title(severity: Severity) -> &'static str {
        match severity {
            Severity::Info => " Notice ",
            Severity::Warning => " Check your input ",
            Severity::Danger => " Error ",
        }
    }

    pub fn score_color(band: ScoreBand) -> Color {
        match band {
            ScoreBand::Good => Colors::SCORE_GOOD,
            ScoreBand::Fair => Colors::SCORE_FAIR,
            ScoreBand::Poor => Colors::SCORE_POOR,
        }
    }

    /// Score badge style
    pub fn score_style(band: ScoreBand) -> Style {
        Style::default()
            .fg(Colors::SELECTED_FG)
            .bg(Self::score_color(band))
            .add_modifier(Modifier::BOLD)
    }

    /// Stepper cell style
    pub fn step_style(completed: bool, active: bool) -> Style {
        if active {
            Style::default()
                .fg(Colors::STEP_ACTIVE)
                .add_modifier(Modifier::BOLD)
        } else if completed {
            Style::default().fg(Colors::STEP_COMPLETE)
        } else {
            Style::default().fg(Colors::STEP_PENDING)
        }
    }
}

// =============================================================================
// UI CONSTANTS
// =============================================================================

/// Layout constants
pub struct UiConstants;

impl UiConstants {
    pub const DIALOG_WIDTH_PCT: u16 = 60;
    pub const DIALOG_MAX_WIDTH: u16 = 80;
    pub const DIALOG_MIN_WIDTH: u16 = 40;

    pub const NAV_BAR_HEIGHT: u16 = 1;

    /// Title plus stepper
    pub const HEADER_HEIGHT: u16 = 4;

    pub const SUMMARY_BAR_HEIGHT: u16 = 3;

    /// Visible rows of the select-field dropdown
    pub const DROPDOWN_ROWS: u16 = 6;
}

/// Common UI text strings
pub struct UiText;

impl UiText {
    pub const BTN_CONFIRM_DELETE: &'static str = "[ Delete ]";
    pub const BTN_CANCEL: &'static str = "[ Cancel ]";
    pub const PRESS_ENTER: &'static str = "Press Enter to continue";
    pub const NO_RESULTS: &'static str = "No laptops match your answers.";
    pub const NO_ROWS: &'static str = "No rows.";
    pub const MISSING: &'static str = "-";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_colors_differ_per_band() {
        assert_ne!(
            Theme::score_color(ScoreBand::Good),
            Theme::score_color(ScoreBand::Poor)
        );
        assert_eq!(Theme::score_color(ScoreBand::Fair), Colors::SCORE_FAIR);
    }

    #[test]
    fn test_step_style_prefers_active() {
        assert_eq!(
            Theme::step_style(true, true).fg,
            Some(Colors::STEP_ACTIVE)
        );
        assert_eq!(Theme::step_style(true, false).fg, Some(Colors::STEP_COMPLETE));
        assert_eq!(Theme::step_style(false, false).fg, Some(Colors::STEP_PENDING));
    }
}
