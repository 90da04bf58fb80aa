//! User interface rendering module
//!
//! This module is organized into submodules for better maintainability:
//! - `header` - Title, stepper, summary bar, nav bar and help overlay
//! - `screens` - Question steps 1-4
//! - `results` - Results, comparison and details (steps 5-7)
//! - `admin` - Admin tabs, table and add/edit forms
//! - `dialogs` - Alerts and the delete confirmation

pub mod admin;
mod dialogs;
mod header;
pub mod results;
pub mod screens;

pub use header::HeaderRenderer;
pub use screens::{OptionView, SelectionEvent, selection_event, step_options};

use crate::admin::AdminPanel;
use crate::app::{AppMode, AppState, Screen};
use crate::components::keybindings::KeybindingContext;
use crate::questionnaire::{QuestionnaireController, WizardStep};
use crate::theme::UiConstants;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

/// Everything a frame is drawn from.
pub struct RenderContext<'a> {
    pub state: &'a AppState,
    pub screen: Screen,
    pub questionnaire: &'a QuestionnaireController,
    pub admin: &'a AdminPanel,
    pub keybindings: &'a KeybindingContext,
}

/// UI renderer for the application
///
/// This is the main entry point for UI rendering. It delegates to specialized
/// submodules for different parts of the UI.
pub struct UiRenderer {
    header: HeaderRenderer,
}

impl Default for UiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UiRenderer {
    pub fn new() -> Self {
        Self {
            header: HeaderRenderer::new(),
        }
    }

    /// Render the complete UI
    pub fn render(&self, f: &mut Frame, ctx: &RenderContext<'_>) {
        let state = ctx.state;
        let show_summary = state.mode == AppMode::Wizard && ctx.questionnaire.step().is_question();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(UiConstants::HEADER_HEIGHT),
                Constraint::Min(5),
                Constraint::Length(if show_summary { UiConstants::SUMMARY_BAR_HEIGHT } else { 0 }),
                Constraint::Length(1),
                Constraint::Length(UiConstants::NAV_BAR_HEIGHT),
            ])
            .split(f.area());

        self.header
            .render_header(f, main_chunks[0], state.mode, ctx.questionnaire);

        let content_area = main_chunks[1];
        match state.mode {
            AppMode::Wizard => match ctx.questionnaire.step() {
                WizardStep::Results => {
                    results::render_results(f, content_area, ctx.questionnaire, state)
                }
                WizardStep::Comparison => {
                    results::render_comparison(f, content_area, ctx.questionnaire)
                }
                WizardStep::Details => results::render_details(f, content_area, ctx.questionnaire),
                _ => screens::render_question(f, content_area, ctx.questionnaire, state),
            },
            AppMode::Admin => admin::render_admin(f, content_area, ctx.admin, state),
        }

        if show_summary {
            header::render_summary_bar(f, main_chunks[2], ctx.questionnaire);
        }
        header::render_status(f, main_chunks[3], &state.status_message);
        header::render_nav_bar(f, ctx.screen, ctx.keybindings, main_chunks[4]);

        if let Some(alert) = &state.alert {
            dialogs::render_alert(f, alert);
        } else if state.help_visible {
            header::render_help_overlay(f, ctx.screen, ctx.keybindings);
        }
    }
}
