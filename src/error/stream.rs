//! Per-attempt stream error types.
//!
//! A [`StreamError`] ends one connection attempt. None of them is fatal to
//! the live client; each one is reported and followed by a reconnect.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::{CredentialsError, HttpError};

/// Reasons a single connection attempt failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// The request could not be sent or no response arrived.
    #[error("Failed to open stream: {0}")]
    ConnectFailed(HttpError),

    /// The server answered with a non-success status.
    #[error("Stream HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response had no readable body.
    #[error("Stream HTTP {status} has no body")]
    MissingBody { status: u16 },

    /// Reading the body failed after the stream was open.
    #[error("Stream read failed: {0}")]
    ReadFailed(HttpError),

    /// Authentication headers could not be produced.
    #[error("Stream credentials unavailable: {0}")]
    Credentials(CredentialsError),
}

impl StreamError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::ConnectFailed(_) | StreamError::ReadFailed(_) => ErrorCategory::Network,
            StreamError::HttpStatus { status } if *status == 401 || *status == 403 => {
                ErrorCategory::Auth
            }
            StreamError::HttpStatus { .. } | StreamError::MissingBody { .. } => {
                ErrorCategory::Server
            }
            StreamError::Credentials(_) => ErrorCategory::Auth,
        }
    }

    /// Returns true if the server rejected the credentials.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, StreamError::HttpStatus { status: 401 | 403 })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectFailed(_) => {
                "Could not reach the live feed. Retrying...".to_string()
            }
            StreamError::HttpStatus { status } if *status == 401 || *status == 403 => {
                format!("The live feed rejected the credentials (HTTP {}).", status)
            }
            StreamError::HttpStatus { status } => {
                format!("The live feed returned HTTP {}. Retrying...", status)
            }
            StreamError::MissingBody { .. } => {
                "The live feed sent an empty response. Retrying...".to_string()
            }
            StreamError::ReadFailed(_) => {
                "Connection to the live feed was lost. Reconnecting...".to_string()
            }
            StreamError::Credentials(err) => {
                format!("Live feed credentials are unavailable: {}", err)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectFailed(_) => "E_STREAM_CONN",
            StreamError::HttpStatus { .. } => "E_STREAM_STATUS",
            StreamError::MissingBody { .. } => "E_STREAM_BODY",
            StreamError::ReadFailed(_) => "E_STREAM_READ",
            StreamError::Credentials(_) => "E_STREAM_CREDS",
        }
    }
}
