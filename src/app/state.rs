//! Application state definitions
//!
//! UI-only state: which surface is shown, the highlighted row, pending text
//! input and the blocking alert. Domain state lives in the questionnaire
//! controller and the admin panel.

use crate::error::PickerError;
use crate::questionnaire::SubKey;
use crate::theme::Severity;
use strum::Display;

/// Top-level surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum AppMode {
    #[default]
    #[strum(serialize = "Questionnaire")]
    Wizard,
    #[strum(serialize = "Admin")]
    Admin,
}

/// Keybinding context: what the keys currently act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Screen {
    #[strum(serialize = "Question")]
    Question,
    #[strum(serialize = "Results")]
    Results,
    #[strum(serialize = "Comparison")]
    Comparison,
    #[strum(serialize = "Laptop details")]
    Details,
    #[strum(serialize = "Admin table")]
    AdminBrowse,
    #[strum(serialize = "Admin search")]
    AdminSearch,
    #[strum(serialize = "Add row")]
    AdminAdd,
    #[strum(serialize = "Edit row")]
    AdminEdit,
    #[strum(serialize = "Confirm delete")]
    AdminConfirm,
    #[strum(serialize = "Message")]
    Alert,
}

impl Screen {
    /// Screens where printable keys are text input.
    pub fn takes_text(&self) -> bool {
        matches!(self, Self::AdminSearch | Self::AdminAdd | Self::AdminEdit)
    }
}

/// Blocking message; every other key is ignored until it is dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

impl Alert {
    /// Validation problems are the user's to fix; anything else is an error.
    pub fn from_error(error: &PickerError) -> Self {
        let severity = if error.is_validation() {
            Severity::Warning
        } else {
            Severity::Danger
        };
        Self {
            severity,
            message: error.user_message(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub mode: AppMode,
    pub help_visible: bool,
    pub alert: Option<Alert>,
    /// One-line feedback under the content ("Saved", "Page 2 of 3", ...)
    pub status_message: String,
    /// Highlighted row on the questionnaire screens
    pub cursor: usize,
    /// Active list on the features step
    pub list: Option<SubKey>,
    /// Column the admin sort key acts on
    pub admin_column: usize,
    /// Search text being typed
    pub search_input: String,
}

impl AppState {
    pub fn new(mode: AppMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn list(&self) -> SubKey {
        self.list.unwrap_or(SubKey::Features)
    }

    pub fn switch_list(&mut self) {
        self.list = Some(match self.list() {
            SubKey::Features => SubKey::Ports,
            SubKey::Ports => SubKey::Features,
        });
        self.cursor = 0;
    }

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    /// Show an error as a blocking alert.
    pub fn show_error(&mut self, error: &PickerError) {
        self.alert = Some(Alert::from_error(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = AppState::default();
        state.move_cursor(-1, 3);
        assert_eq!(state.cursor, 0);
        state.move_cursor(5, 3);
        assert_eq!(state.cursor, 2);
        state.move_cursor(1, 0);
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_alert_severity_follows_error_kind() {
        let alert = Alert::from_error(&PickerError::validation("Required: name"));
        assert_eq!(alert.severity, Severity::Warning);
        let alert = Alert::from_error(&PickerError::api(500, "boom"));
        assert_eq!(alert.severity, Severity::Danger);
    }

    #[test]
    fn test_switch_list_resets_cursor() {
        let mut state = AppState {
            cursor: 4,
            ..Default::default()
        };
        state.switch_list();
        assert_eq!(state.list(), SubKey::Ports);
        assert_eq!(state.cursor, 0);
    }
}
