//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Local input validation failure, resolved before any network call
    #[error("{0}")]
    Validation(String),

    /// Structured error message returned by the backend
    #[error("{0}")]
    Backend(String),

    /// Operation attempted in an invalid state
    #[error("{0}")]
    State(String),

    /// Another authentication operation is already in flight
    #[error("Another authentication operation is in progress")]
    Busy,

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] passage_storage::StorageError),

    /// Configuration or path error
    #[error("Configuration error: {0}")]
    Config(#[from] passage_core::CoreError),
}

impl AuthError {
    /// Render this error as the message shown to the presentation layer.
    ///
    /// Validation, backend, and state errors describe themselves; transport,
    /// storage, and configuration failures collapse to the operation's
    /// generic fallback text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AuthError::Validation(m) | AuthError::Backend(m) | AuthError::State(m) => m.clone(),
            AuthError::Busy => self.to_string(),
            AuthError::Http(_) | AuthError::Storage(_) | AuthError::Config(_) => {
                fallback.to_string()
            }
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
