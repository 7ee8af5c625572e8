//! Admin credentials and their on-disk storage.
//!
//! The live feed authenticates every request with a username/password pair
//! carried in custom headers. Credentials can be persisted to
//! `~/.livefeed/credentials.json`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::traits::{CredentialsError, HeaderProvider, Headers};

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".livefeed";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Header carrying the admin username.
pub const USERNAME_HEADER: &str = "X-Auth-Username";

/// Header carrying the admin password.
pub const PASSWORD_HEADER: &str = "X-Auth-Password";

/// Username/password pair for the admin API.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check that both fields are present.
    ///
    /// Surrounding whitespace does not count as a value.
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.username.trim().is_empty() {
            return Err(CredentialsError::Missing("username".to_string()));
        }
        if self.password.trim().is_empty() {
            return Err(CredentialsError::Missing("password".to_string()));
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

// The password never reaches logs.
impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl HeaderProvider for AdminCredentials {
    fn auth_headers(&self) -> Result<Headers, CredentialsError> {
        self.validate()?;

        let mut headers = Headers::new();
        headers.insert(USERNAME_HEADER.to_string(), self.username.trim().to_string());
        headers.insert(PASSWORD_HEADER.to_string(), self.password.clone());
        Ok(headers)
    }
}

/// Manages credential storage and retrieval.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    /// Path to the credentials file.
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager for `~/.livefeed/credentials.json`.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)))
    }

    /// Create a manager for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the credentials file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    pub fn load(&self) -> Result<Option<AdminCredentials>, CredentialsError> {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CredentialsError::LoadFailed(e.to_string())),
        };

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map(Some)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))
    }

    /// Save credentials to the credentials file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self, credentials: &AdminCredentials) -> Result<(), CredentialsError> {
        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent).map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        }

        let file = File::create(&self.credentials_path)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    /// Remove the credentials file if it exists.
    pub fn clear(&self) -> Result<(), CredentialsError> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialsError::Other(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> CredentialsManager {
        CredentialsManager::with_path(temp_dir.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    #[test]
    fn test_headers() {
        let creds = AdminCredentials::new(" admin ", "secret");
        let headers = creds.auth_headers().unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[USERNAME_HEADER], "admin");
        assert_eq!(headers[PASSWORD_HEADER], "secret");
    }

    #[test]
    fn test_missing_username() {
        let creds = AdminCredentials::new("", "secret");
        assert_eq!(
            creds.auth_headers(),
            Err(CredentialsError::Missing("username".to_string()))
        );
        assert!(!creds.is_complete());
    }

    #[test]
    fn test_missing_password() {
        let creds = AdminCredentials::new("admin", "   ");
        assert_eq!(
            creds.validate(),
            Err(CredentialsError::Missing("password".to_string()))
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = AdminCredentials::new("admin", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let creds = AdminCredentials::new("admin", "secret");
        manager.save(&creds).unwrap();
        assert!(manager.credentials_path().exists());

        assert_eq!(manager.load().unwrap(), Some(creds));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), "not json").unwrap();

        assert!(matches!(
            manager.load(),
            Err(CredentialsError::Serialization(_))
        ));
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.clear().is_ok());

        manager.save(&AdminCredentials::new("a", "b")).unwrap();
        manager.clear().unwrap();
        assert!(!manager.credentials_path().exists());
        assert_eq!(manager.load().unwrap(), None);
    }

    #[test]
    fn test_default_path() {
        if let Some(manager) = CredentialsManager::new() {
            let path = manager.credentials_path();
            assert!(path.ends_with(".livefeed/credentials.json"));
        }
    }
}
