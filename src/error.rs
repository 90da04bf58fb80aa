//! Error handling module for the laptop picker
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Every failure the UI surfaces to the user is one of these variants, rendered
//! through its `Display` implementation.

use thiserror::Error;

/// Main error type for the laptop picker
#[derive(Error, Debug)]
pub enum PickerError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend could not be reached (DNS, TLS, connection reset, timeout)
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A row returned by the backend did not match the expected shape
    #[error("Unexpected row shape: {0}")]
    Decode(String),

    /// Validation errors (user input caught before any request is sent)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// State errors (mutex poisoning, invalid transitions)
    #[error("State error: {0}")]
    State(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for laptop picker operations
pub type Result<T> = std::result::Result<T, PickerError>;

impl PickerError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a backend error from a status code and the backend's message
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a state error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }

    /// Whether this error was raised locally before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Message for an alert: validation text as written, everything else with its kind.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
