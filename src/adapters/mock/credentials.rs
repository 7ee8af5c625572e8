//! In-memory header provider for testing.

use std::sync::{Arc, Mutex};

use crate::auth::credentials::AdminCredentials;
use crate::traits::{CredentialsError, HeaderProvider, Headers};

/// In-memory header provider for testing.
///
/// Clones share state, so a test can rotate credentials or force failures
/// while a client holds another clone.
///
/// # Example
///
/// ```ignore
/// use livefeed::adapters::mock::InMemoryCredentials;
/// use livefeed::auth::AdminCredentials;
///
/// let provider = InMemoryCredentials::with_credentials(AdminCredentials::new("admin", "pw"));
/// provider.set_should_fail(true);
/// assert!(provider.auth_headers().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    /// Stored credentials
    credentials: Arc<Mutex<Option<AdminCredentials>>>,
    /// Whether auth_headers should fail
    should_fail: Arc<Mutex<bool>>,
    /// Number of auth_headers calls
    calls: Arc<Mutex<usize>>,
}

impl InMemoryCredentials {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider with initial credentials.
    pub fn with_credentials(creds: AdminCredentials) -> Self {
        let provider = Self::new();
        provider.set_credentials(Some(creds));
        provider
    }

    /// Configure whether auth_headers should fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Replace the stored credentials.
    pub fn set_credentials(&self, creds: Option<AdminCredentials>) {
        *self.credentials.lock().unwrap() = creds;
    }

    /// Get the current credentials.
    pub fn get_credentials(&self) -> Option<AdminCredentials> {
        self.credentials.lock().unwrap().clone()
    }

    /// Number of times headers were requested.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl HeaderProvider for InMemoryCredentials {
    fn auth_headers(&self) -> Result<Headers, CredentialsError> {
        *self.calls.lock().unwrap() += 1;

        if *self.should_fail.lock().unwrap() {
            return Err(CredentialsError::LoadFailed("Mock load failure".to_string()));
        }

        match self.credentials.lock().unwrap().as_ref() {
            Some(creds) => creds.auth_headers(),
            None => Err(CredentialsError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PASSWORD_HEADER;

    #[test]
    fn test_empty_provider() {
        let provider = InMemoryCredentials::new();
        assert!(provider.get_credentials().is_none());
        assert_eq!(provider.auth_headers(), Err(CredentialsError::NotFound));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_with_credentials() {
        let provider = InMemoryCredentials::with_credentials(AdminCredentials::new("admin", "pw"));
        let headers = provider.auth_headers().unwrap();
        assert_eq!(headers[PASSWORD_HEADER], "pw");
    }

    #[test]
    fn test_forced_failure() {
        let provider = InMemoryCredentials::with_credentials(AdminCredentials::new("admin", "pw"));
        provider.set_should_fail(true);
        assert!(matches!(
            provider.auth_headers(),
            Err(CredentialsError::LoadFailed(_))
        ));

        provider.set_should_fail(false);
        assert!(provider.auth_headers().is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let provider = InMemoryCredentials::new();
        let clone = provider.clone();
        clone.set_credentials(Some(AdminCredentials::new("rotated", "pw")));
        assert_eq!(
            provider.get_credentials().map(|c| c.username),
            Some("rotated".to_string())
        );
    }
}
