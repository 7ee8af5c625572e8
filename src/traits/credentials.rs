//! Authentication header source trait abstraction.
//!
//! The live feed authenticates with custom request headers. A
//! [`HeaderProvider`] is asked for them before every connection attempt, so
//! credentials changed between attempts are picked up on reconnect.

use crate::traits::Headers;

/// Credentials operation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CredentialsError {
    /// A required credential is missing or empty
    Missing(String),
    /// Failed to load credentials
    LoadFailed(String),
    /// Failed to save credentials
    SaveFailed(String),
    /// Credentials not found
    NotFound,
    /// Serialization/deserialization error
    Serialization(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsError::Missing(what) => write!(f, "Missing credential: {}", what),
            CredentialsError::LoadFailed(msg) => write!(f, "Failed to load credentials: {}", msg),
            CredentialsError::SaveFailed(msg) => write!(f, "Failed to save credentials: {}", msg),
            CredentialsError::NotFound => write!(f, "Credentials not found"),
            CredentialsError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            CredentialsError::Other(msg) => write!(f, "Credentials error: {}", msg),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Source of per-request authentication headers.
///
/// # Example
///
/// ```ignore
/// use livefeed::auth::AdminCredentials;
/// use livefeed::traits::HeaderProvider;
///
/// let creds = AdminCredentials::new("admin", "secret");
/// let headers = creds.auth_headers()?;
/// assert_eq!(headers["X-Auth-Username"], "admin");
/// ```
pub trait HeaderProvider: Send + Sync {
    /// Headers to attach to the next request.
    fn auth_headers(&self) -> Result<Headers, CredentialsError>;
}

/// A provider that sends no authentication headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl HeaderProvider for NoAuth {
    fn auth_headers(&self) -> Result<Headers, CredentialsError> {
        Ok(Headers::new())
    }
}

impl<P: HeaderProvider + ?Sized> HeaderProvider for std::sync::Arc<P> {
    fn auth_headers(&self) -> Result<Headers, CredentialsError> {
        (**self).auth_headers()
    }
}
