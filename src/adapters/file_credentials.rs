//! File-based header provider adapter.
//!
//! Reads the credentials file on every call, so edits to the file are
//! picked up on the next reconnect.

use crate::auth::credentials::CredentialsManager;
use crate::traits::{CredentialsError, HeaderProvider, Headers};

/// Header provider backed by [`CredentialsManager`].
///
/// Credentials are stored in `~/.livefeed/credentials.json`.
///
/// # Example
///
/// ```ignore
/// use livefeed::adapters::FileCredentialsProvider;
/// use livefeed::traits::HeaderProvider;
///
/// let provider = FileCredentialsProvider::new()?;
/// let headers = provider.auth_headers()?;
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialsProvider {
    manager: CredentialsManager,
}

impl FileCredentialsProvider {
    /// Create a provider for the default credentials file.
    ///
    /// # Returns
    /// The provider, or an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsManager::new()
            .map(Self::with_manager)
            .ok_or_else(|| {
                CredentialsError::Other("Failed to determine home directory".to_string())
            })
    }

    /// Create a provider over an existing manager.
    pub fn with_manager(manager: CredentialsManager) -> Self {
        Self { manager }
    }

    /// Get a reference to the underlying credentials manager.
    pub fn manager(&self) -> &CredentialsManager {
        &self.manager
    }
}

impl HeaderProvider for FileCredentialsProvider {
    fn auth_headers(&self) -> Result<Headers, CredentialsError> {
        match self.manager.load()? {
            Some(creds) => creds.auth_headers(),
            None => Err(CredentialsError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AdminCredentials, USERNAME_HEADER};
    use tempfile::TempDir;

    fn provider(temp_dir: &TempDir) -> FileCredentialsProvider {
        FileCredentialsProvider::with_manager(CredentialsManager::with_path(
            temp_dir.path().join("credentials.json"),
        ))
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            provider(&temp_dir).auth_headers(),
            Err(CredentialsError::NotFound)
        );
    }

    #[test]
    fn test_reads_file_on_every_call() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir);

        provider
            .manager()
            .save(&AdminCredentials::new("first", "pw"))
            .unwrap();
        assert_eq!(provider.auth_headers().unwrap()[USERNAME_HEADER], "first");

        provider
            .manager()
            .save(&AdminCredentials::new("second", "pw"))
            .unwrap();
        assert_eq!(provider.auth_headers().unwrap()[USERNAME_HEADER], "second");
    }

    #[test]
    fn test_incomplete_file_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir);
        provider
            .manager()
            .save(&AdminCredentials::new("admin", ""))
            .unwrap();

        assert_eq!(
            provider.auth_headers(),
            Err(CredentialsError::Missing("password".to_string()))
        );
    }
}
