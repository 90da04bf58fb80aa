//! Header and common widget rendering
//!
//! Title line, the questionnaire stepper, the summary bar and the
//! navigation/help overlays shared by every screen.

use crate::app::{AppMode, Screen};
use crate::components::help_overlay::HelpOverlay;
use crate::components::keybindings::KeybindingContext;
use crate::components::nav_bar::NavBar;
use crate::questionnaire::{QuestionnaireController, WizardStep};
use crate::theme::{Styles, Theme};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const STEPPER: [WizardStep; 5] = [
    WizardStep::Category,
    WizardStep::Software,
    WizardStep::Features,
    WizardStep::Budget,
    WizardStep::Results,
];

/// Header renderer: application title plus the step indicator
pub struct HeaderRenderer {
    title: String,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    pub fn new() -> Self {
        Self {
            title: format!("Laptop Picker v{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Stepper spans: done steps green, the current one highlighted.
    pub fn stepper_line(current: WizardStep) -> Line<'static> {
        // Comparison and details hang off the results step
        let current = if current.is_question() {
            current
        } else {
            WizardStep::Results
        };
        let mut spans = Vec::new();
        for (i, step) in STEPPER.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" › ", Styles::text_muted()));
            }
            let style = Theme::step_style(*step < current, *step == current);
            spans.push(Span::styled(format!("{}. {}", step.number(), step), style));
        }
        Line::from(spans)
    }

    pub fn render_header(
        &self,
        f: &mut Frame,
        area: Rect,
        mode: AppMode,
        controller: &QuestionnaireController,
    ) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let mut lines = vec![Line::from(vec![
            Span::styled(self.title.clone(), Styles::title()),
            Span::styled(format!("  ·  {}", mode), Styles::text_secondary()),
        ])];
        if mode == AppMode::Wizard {
            lines.push(Self::stepper_line(controller.step()));
        }

        let header = Paragraph::new(lines)
            .block(Block::default().borders(Borders::BOTTOM).border_style(Styles::border_inactive()))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }
}

/// Current usage and budget; question steps only
pub fn render_summary_bar(f: &mut Frame, area: Rect, controller: &QuestionnaireController) {
    let Some(text) = controller.summary_text() else {
        return;
    };
    let mut spans = vec![Span::styled(text, Styles::text())];
    if !controller.can_advance() {
        spans.push(Span::styled("   (answer to continue)", Styles::text_muted()));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).border_style(Styles::border_inactive())),
        area,
    );
}

/// One-line feedback such as "Saved"
pub fn render_status(f: &mut Frame, area: Rect, message: &str) {
    if message.is_empty() {
        return;
    }
    f.render_widget(
        Paragraph::new(message.to_string()).style(Styles::success()),
        area,
    );
}

/// Render the navigation bar
pub fn render_nav_bar(f: &mut Frame, screen: Screen, keybinding_ctx: &KeybindingContext, area: Rect) {
    let nav_bar = NavBar::new(keybinding_ctx.get_nav_items(screen));
    nav_bar.render(f, area);
}

/// Render the help overlay
pub fn render_help_overlay(f: &mut Frame, screen: Screen, keybinding_ctx: &KeybindingContext) {
    let help_overlay = HelpOverlay::new(screen, keybinding_ctx);
    help_overlay.render(f, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_stepper_lists_question_steps_and_results() {
        let line = HeaderRenderer::stepper_line(WizardStep::Features);
        assert_eq!(
            text(&line),
            "1. Category › 2. Software › 3. Features & Ports › 4. Budget › 5. Results"
        );
        assert_eq!(line.spans[4].style, Theme::step_style(false, true));
        assert_eq!(line.spans[0].style, Theme::step_style(true, false));
        assert_eq!(line.spans[6].style, Theme::step_style(false, false));
    }

    #[test]
    fn test_stepper_maps_comparison_to_results() {
        let line = HeaderRenderer::stepper_line(WizardStep::Comparison);
        assert_eq!(line.spans[8].style, Theme::step_style(false, true));
    }
}
