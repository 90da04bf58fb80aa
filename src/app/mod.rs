//! Application module
//!
//! Owns the questionnaire controller, the admin panel and the UI state, and
//! turns key events into controller calls. Every key goes through the
//! [`KeybindingContext`] of the current [`Screen`]; printable keys that no
//! binding claims are text input on the admin search and form screens.

mod state;

pub use state::{Alert, AppMode, AppState, Screen};

use crate::admin::{AdminPanel, AdminSettings, TableMode};
use crate::components::keybindings::{KeyAction, KeybindingContext};
use crate::error::Result;
use crate::questionnaire::{QuestionnaireController, WizardStep};
use crate::repository::Repository;
use crate::types::AdminTab;
use crate::ui::{RenderContext, UiRenderer, selection_event, step_options};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Main application struct
pub struct App {
    state: AppState,
    questionnaire: QuestionnaireController,
    admin: AdminPanel,
    /// Surfaces load lazily, the first time they are shown
    wizard_loaded: bool,
    admin_loaded: bool,
    ui_renderer: UiRenderer,
    keybinding_context: KeybindingContext,
}

impl App {
    pub fn new(repository: Repository, settings: &AdminSettings, mode: AppMode) -> Self {
        info!("Creating new App instance in {} mode", mode);
        Self {
            state: AppState::new(mode),
            questionnaire: QuestionnaireController::new(repository.clone()),
            admin: AdminPanel::new(repository, settings),
            wizard_loaded: false,
            admin_loaded: false,
            ui_renderer: UiRenderer::new(),
            keybinding_context: KeybindingContext::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn questionnaire(&self) -> &QuestionnaireController {
        &self.questionnaire
    }

    pub fn admin(&self) -> &AdminPanel {
        &self.admin
    }

    /// Load the initial surface and open `admin_tab` if given.
    ///
    /// Load failures are shown as an alert rather than returned.
    pub fn start(&mut self, admin_tab: Option<AdminTab>) {
        self.ensure_loaded();
        if let Some(tab) = admin_tab {
            if self.admin_loaded && self.admin.active_tab() != tab {
                let result = self.switch_tab(tab);
                self.report(result);
            }
        }
    }

    /// What the keys currently act on
    pub fn screen(&self) -> Screen {
        if self.state.alert.is_some() {
            return Screen::Alert;
        }
        match self.state.mode {
            AppMode::Wizard => match self.questionnaire.step() {
                WizardStep::Results => Screen::Results,
                WizardStep::Comparison => Screen::Comparison,
                WizardStep::Details => Screen::Details,
                _ => Screen::Question,
            },
            AppMode::Admin => match self.admin.active_table().mode() {
                TableMode::Browse => Screen::AdminBrowse,
                TableMode::Search => Screen::AdminSearch,
                TableMode::Adding => Screen::AdminAdd,
                TableMode::Editing(_) => Screen::AdminEdit,
                TableMode::ConfirmDelete { .. } => Screen::AdminConfirm,
            },
        }
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        info!("Starting main application loop");

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    // Release and repeat events are reported on some terminals
                    if key.kind == KeyEventKind::Press && self.handle_key(key, Instant::now()) {
                        break;
                    }
                }
            }

            if self.admin_loaded {
                self.admin.active_table_mut().tick(Instant::now());
            }
        }

        info!("Main loop finished");
        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let ctx = RenderContext {
            state: &self.state,
            screen: self.screen(),
            questionnaire: &self.questionnaire,
            admin: &self.admin,
            keybindings: &self.keybinding_context,
        };
        self.ui_renderer.render(f, &ctx);
    }

    /// Handle one key press; returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        let screen = self.screen();

        if self.state.help_visible {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.state.help_visible = false;
            }
            return false;
        }

        match self.keybinding_context.action_for(screen, &key) {
            Some(KeyAction::Quit) => {
                info!("Quit requested");
                return true;
            }
            Some(KeyAction::Help) => self.state.help_visible = true,
            Some(KeyAction::SwitchMode) => self.switch_mode(),
            Some(action) => {
                debug!("{:?} on {}", action, screen);
                self.state.status_message.clear();
                let result = self.dispatch(screen, action);
                self.report(result);
            }
            None if screen.takes_text() => self.type_text(screen, key, now),
            None => {}
        }
        false
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            warn!("{}", e);
            self.state.show_error(&e);
        }
    }

    fn ensure_loaded(&mut self) {
        let result = match self.state.mode {
            AppMode::Wizard if !self.wizard_loaded => self.load_wizard(),
            AppMode::Admin if !self.admin_loaded => self.load_admin(),
            _ => Ok(()),
        };
        self.report(result);
    }

    fn load_wizard(&mut self) -> Result<()> {
        self.questionnaire.load()?;
        self.wizard_loaded = true;
        Ok(())
    }

    fn load_admin(&mut self) -> Result<()> {
        self.admin.load()?;
        self.admin_loaded = true;
        Ok(())
    }

    fn switch_mode(&mut self) {
        self.state.mode = match self.state.mode {
            AppMode::Wizard => AppMode::Admin,
            AppMode::Admin => AppMode::Wizard,
        };
        self.state.status_message.clear();
        info!("Switched to {}", self.state.mode);
        self.ensure_loaded();
    }

    fn dispatch(&mut self, screen: Screen, action: KeyAction) -> Result<()> {
        match screen {
            Screen::Alert => {
                if action == KeyAction::Dismiss {
                    self.state.alert = None;
                }
                Ok(())
            }
            Screen::Question => self.on_question(action),
            Screen::Results | Screen::Comparison | Screen::Details => self.on_results(screen, action),
            Screen::AdminBrowse => self.on_admin_browse(action),
            Screen::AdminSearch | Screen::AdminAdd | Screen::AdminEdit | Screen::AdminConfirm => {
                self.on_admin_dialog(screen, action)
            }
        }
    }

    // ------------------------------------------------------------------
    // Questionnaire
    // ------------------------------------------------------------------

    fn step_changed(&mut self) {
        self.state.cursor = 0;
        self.state.list = None;
    }

    fn reset(&mut self) -> Result<()> {
        self.step_changed();
        if self.wizard_loaded {
            self.questionnaire.reset()
        } else {
            self.load_wizard()
        }
    }

    fn on_question(&mut self, action: KeyAction) -> Result<()> {
        let list = self.state.list();
        let count = step_options(&self.questionnaire, list).len();
        match action {
            KeyAction::NavigateUp => self.state.move_cursor(-1, count),
            KeyAction::NavigateDown => self.state.move_cursor(1, count),
            KeyAction::SwitchList => {
                if self.questionnaire.step() == WizardStep::Features {
                    self.state.switch_list();
                }
            }
            KeyAction::Select => {
                if let Some(event) = selection_event(&self.questionnaire, list, self.state.cursor) {
                    self.questionnaire
                        .select(event.step, &event.id, event.kind, event.sub_key)?;
                }
            }
            KeyAction::Next => {
                if self.questionnaire.next() {
                    self.step_changed();
                } else {
                    self.state.status_message = "Answer this step to continue".to_string();
                }
            }
            KeyAction::Finish => {
                self.questionnaire.finish()?;
                self.step_changed();
            }
            KeyAction::Back => {
                let before = self.questionnaire.step();
                self.questionnaire.back();
                if self.questionnaire.step() != before {
                    self.step_changed();
                }
            }
            KeyAction::Reset => self.reset()?,
            _ => {}
        }
        Ok(())
    }

    fn highlighted_laptop(&self) -> Option<i64> {
        self.questionnaire
            .results()
            .get(self.state.cursor)
            .map(|item| item.id)
    }

    fn on_results(&mut self, screen: Screen, action: KeyAction) -> Result<()> {
        let count = self.questionnaire.results().len();
        match action {
            KeyAction::NavigateUp => self.state.move_cursor(-1, count),
            KeyAction::NavigateDown => self.state.move_cursor(1, count),
            KeyAction::ToggleCompare => {
                if let Some(id) = self.highlighted_laptop() {
                    self.questionnaire.toggle_compare(id);
                }
            }
            KeyAction::Details => {
                if let Some(id) = self.highlighted_laptop() {
                    self.questionnaire.show_details(id)?;
                }
            }
            KeyAction::Compare => self.questionnaire.open_comparison()?,
            KeyAction::Back => {
                self.questionnaire.back();
                // The results cursor survives a visit to comparison or details
                if screen == Screen::Results {
                    self.step_changed();
                }
            }
            KeyAction::Reset => self.reset()?,
            _ => {}
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    fn switch_tab(&mut self, tab: AdminTab) -> Result<()> {
        self.state.admin_column = 0;
        self.admin.switch_to(tab)
    }

    fn on_admin_browse(&mut self, action: KeyAction) -> Result<()> {
        if !self.admin_loaded {
            // Reload retries a failed first load; nothing else has rows to act on
            if action == KeyAction::Refresh {
                self.load_admin()?;
            }
            return Ok(());
        }

        let last_column = self.admin.active_table().columns().len().saturating_sub(1);
        match action {
            KeyAction::NavigateUp => self.admin.active_table_mut().select_previous(),
            KeyAction::NavigateDown => self.admin.active_table_mut().select_next(),
            KeyAction::ColumnRight => {
                self.state.admin_column = (self.state.admin_column + 1).min(last_column);
            }
            KeyAction::ColumnLeft => {
                self.state.admin_column = self.state.admin_column.saturating_sub(1);
            }
            KeyAction::Sort => self.admin.active_table_mut().toggle_sort(self.state.admin_column),
            KeyAction::NextTab => self.switch_tab(self.admin.active_tab().next())?,
            KeyAction::PreviousTab => self.switch_tab(self.admin.active_tab().previous())?,
            KeyAction::NextPage => self.admin.active_table_mut().next_page()?,
            KeyAction::PreviousPage => self.admin.active_table_mut().previous_page()?,
            KeyAction::Search => {
                let table = self.admin.active_table_mut();
                self.state.search_input = table.search().to_string();
                table.begin_search();
            }
            KeyAction::Add => self.admin.active_table_mut().begin_add(),
            KeyAction::Edit => self.admin.active_table_mut().begin_edit()?,
            KeyAction::Delete => self.admin.active_table_mut().request_delete()?,
            KeyAction::Refresh => {
                self.admin.active_table_mut().refresh()?;
                self.state.status_message = "Reloaded".to_string();
            }
            _ => {}
        }
        Ok(())
    }

    fn on_admin_dialog(&mut self, screen: Screen, action: KeyAction) -> Result<()> {
        if action == KeyAction::Cancel {
            let table = self.admin.active_table_mut();
            if screen == Screen::AdminAdd {
                table.form_mut().clear();
            }
            table.cancel();
            return Ok(());
        }

        match (screen, action) {
            (Screen::AdminSearch, KeyAction::Submit) => {
                let term = self.state.search_input.trim().to_string();
                let table = self.admin.active_table_mut();
                table.cancel();
                table.set_search(&term)?;
            }
            (Screen::AdminAdd, KeyAction::NextField) => self.admin.active_table_mut().form_mut().focus_next(),
            (Screen::AdminAdd, KeyAction::PreviousField) => {
                self.admin.active_table_mut().form_mut().focus_previous()
            }
            (Screen::AdminAdd, KeyAction::NavigateUp) => self.admin.move_option(-1),
            (Screen::AdminAdd, KeyAction::NavigateDown) => self.admin.move_option(1),
            (Screen::AdminAdd, KeyAction::Select) => {
                // Enter on a text field moves on
                if !self.admin.pick_option() {
                    self.admin.active_table_mut().form_mut().focus_next();
                }
            }
            (Screen::AdminAdd, KeyAction::Submit) => {
                self.admin.active_table_mut().submit_add()?;
                self.state.status_message = "Row added".to_string();
            }
            (Screen::AdminEdit, KeyAction::NextField | KeyAction::PreviousField) => {
                if let TableMode::Editing(edit) = self.admin.active_table_mut().mode_mut() {
                    if action == KeyAction::NextField {
                        edit.focus_next();
                    } else {
                        edit.focus_previous();
                    }
                }
            }
            (Screen::AdminEdit, KeyAction::Submit) => {
                self.admin.active_table_mut().submit_edit()?;
                self.state.status_message = "Row updated".to_string();
            }
            (Screen::AdminConfirm, KeyAction::Confirm) => {
                self.admin.active_table_mut().confirm_delete()?;
                self.state.status_message = "Row deleted".to_string();
            }
            _ => {}
        }
        Ok(())
    }

    fn type_text(&mut self, screen: Screen, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        let table = self.admin.active_table_mut();
        match (screen, key.code) {
            (Screen::AdminSearch, KeyCode::Char(c)) => self.state.search_input.push(c),
            (Screen::AdminSearch, KeyCode::Backspace) => {
                self.state.search_input.pop();
            }
            (Screen::AdminAdd, KeyCode::Char(c)) => table.form_mut().type_char(c, now),
            (Screen::AdminAdd, KeyCode::Backspace) => table.form_mut().backspace(now),
            (Screen::AdminEdit, KeyCode::Char(c)) => {
                if let TableMode::Editing(edit) = table.mode_mut() {
                    edit.type_char(c);
                }
            }
            (Screen::AdminEdit, KeyCode::Backspace) => {
                if let TableMode::Editing(edit) = table.mode_mut() {
                    edit.backspace();
                }
            }
            _ => {}
        }
    }
}
