//! Error types for the registrar service.

use thiserror::Error;

/// Common error type for the registrar service.
#[derive(Error, Debug)]
pub enum RegistrarError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant; the message is kept
    /// for logs and never shown to API clients.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Unique constraint violated (duplicate username, email, ...).
    #[error("{0} already exists")]
    Conflict(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for RegistrarError {
    fn from(e: sqlx::Error) -> Self {
        RegistrarError::Database(e.to_string())
    }
}

/// Result type alias for registrar operations.
pub type Result<T> = std::result::Result<T, RegistrarError>;
