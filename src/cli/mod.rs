//! CLI support for the `livefeed` binary.
//!
//! - Argument parsing
//! - Credential resolution (flags, environment, credentials file)
//! - Output formatting

pub mod args;

pub use args::{parse_args, ArgsError, CliCommand, RunOptions, USAGE};

use std::sync::Arc;

use crate::adapters::FileCredentialsProvider;
use crate::auth::{AdminCredentials, CredentialsManager};
use crate::error::LiveResult;
use crate::live::HistoryEntry;
use crate::traits::HeaderProvider;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const ENV_USERNAME: &str = "LIVEFEED_USERNAME";
const ENV_PASSWORD: &str = "LIVEFEED_PASSWORD";

/// Resolve admin credentials.
///
/// Each field comes from the command line first, then `LIVEFEED_USERNAME` /
/// `LIVEFEED_PASSWORD`, then the credentials file. The result is validated,
/// so a missing field is an error.
pub fn resolve_credentials<F>(
    options: &RunOptions,
    lookup: F,
    manager: Option<&CredentialsManager>,
) -> LiveResult<AdminCredentials>
where
    F: Fn(&str) -> Option<String>,
{
    let stored = match manager {
        Some(manager) => manager.load()?.unwrap_or_default(),
        None => AdminCredentials::default(),
    };

    let pick = |flag: &Option<String>, key: &str, fallback: String| {
        flag.clone()
            .filter(|v| !v.is_empty())
            .or_else(|| lookup(key).filter(|v| !v.is_empty()))
            .unwrap_or(fallback)
    };

    let credentials = AdminCredentials::new(
        pick(&options.username, ENV_USERNAME, stored.username),
        pick(&options.password, ENV_PASSWORD, stored.password),
    );
    credentials.validate()?;
    Ok(credentials)
}

/// Where the binary gets its auth headers.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Pair given on the command line or in the environment
    Fixed(AdminCredentials),
    /// Credentials file, read again on every connection attempt
    File(FileCredentialsProvider),
}

impl CredentialSource {
    pub fn into_provider(self) -> Arc<dyn HeaderProvider> {
        match self {
            CredentialSource::Fixed(credentials) => Arc::new(credentials),
            CredentialSource::File(provider) => Arc::new(provider),
        }
    }
}

/// Pick the credential source for the binary.
///
/// With no username or password from flags or the environment, the
/// credentials file is used directly so edits to it apply on reconnect.
/// The file is still checked once here so a missing field fails fast.
pub fn resolve_credential_source<F>(
    options: &RunOptions,
    lookup: F,
    manager: Option<CredentialsManager>,
) -> LiveResult<CredentialSource>
where
    F: Fn(&str) -> Option<String>,
{
    let given = |flag: &Option<String>, key: &str| {
        flag.as_deref().is_some_and(|v| !v.is_empty())
            || lookup(key).is_some_and(|v| !v.is_empty())
    };
    let overridden = given(&options.username, ENV_USERNAME) || given(&options.password, ENV_PASSWORD);

    match manager {
        Some(manager) if !overridden => {
            resolve_credentials(options, &lookup, Some(&manager))?;
            Ok(CredentialSource::File(FileCredentialsProvider::with_manager(
                manager,
            )))
        }
        manager => resolve_credentials(options, &lookup, manager.as_ref())
            .map(CredentialSource::Fixed),
    }
}

/// One output line for a history entry: `[type] id message`.
pub fn format_entry(entry: &HistoryEntry) -> String {
    format!("[{}] {} {}", entry.event_type, entry.id, entry.message)
}
