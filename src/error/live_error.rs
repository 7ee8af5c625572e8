//! Unified error type for livefeed.
//!
//! `LiveError` is returned by the fallible setup paths (configuration,
//! credentials, history export). A running client never returns it; its
//! failures arrive through listener callbacks as [`StreamError`]s.

use thiserror::Error;

use super::category::ErrorCategory;
use super::stream::StreamError;
use crate::traits::{CredentialsError, HttpError};

/// Unified error type for livefeed setup and tooling.
#[derive(Debug, Error)]
pub enum LiveError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Credentials are missing or unreadable.
    #[error("{0}")]
    Credentials(#[from] CredentialsError),

    /// Stream attempt failure.
    #[error("{0}")]
    Stream(#[from] StreamError),

    /// Transport setup failure.
    #[error("{0}")]
    Http(#[from] HttpError),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LiveError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LiveError::Config(_) => ErrorCategory::Configuration,
            LiveError::Credentials(_) => ErrorCategory::Auth,
            LiveError::Stream(err) => err.category(),
            LiveError::Http(HttpError::InvalidUrl(_)) => ErrorCategory::Configuration,
            LiveError::Http(_) => ErrorCategory::Network,
            LiveError::Io(_) | LiveError::Json(_) => ErrorCategory::System,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            LiveError::Stream(err) => err.user_message(),
            LiveError::Credentials(CredentialsError::Missing(_)) => {
                "Admin username/password required for the live feed".to_string()
            }
            other => format!("{} ({})", other, other.category().recovery_hint()),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            LiveError::Config(_) => "E_CONFIG",
            LiveError::Credentials(_) => "E_CREDS",
            LiveError::Stream(err) => err.error_code(),
            LiveError::Http(_) => "E_HTTP",
            LiveError::Io(_) => "E_IO",
            LiveError::Json(_) => "E_JSON",
        }
    }
}

/// Type alias for Results using LiveError.
pub type LiveResult<T> = Result<T, LiveError>;
