//! Live feed configuration.

use std::time::Duration;

use tracing::warn;

use crate::error::{LiveError, LiveResult};
use crate::live::BackoffPolicy;

/// Default server base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default live feed path on the server.
pub const DEFAULT_LIVE_PATH: &str = "/api/admin/sessions/live";

/// Default number of history entries kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

const ENV_BASE_URL: &str = "LIVEFEED_BASE_URL";
const ENV_PATH: &str = "LIVEFEED_PATH";
const ENV_BACKOFF_STEP_MS: &str = "LIVEFEED_BACKOFF_STEP_MS";
const ENV_BACKOFF_MAX_MS: &str = "LIVEFEED_BACKOFF_MAX_MS";
const ENV_CONNECT_TIMEOUT_SECS: &str = "LIVEFEED_CONNECT_TIMEOUT_SECS";

/// Configuration for a live client.
///
/// Use the builder methods to customize it.
///
/// # Example
///
/// ```ignore
/// use livefeed::config::LiveConfig;
///
/// let config = LiveConfig::default()
///     .with_base_url("https://attendance.example.com")
///     .with_connect_timeout(Duration::from_secs(5));
/// assert_eq!(config.url(), "https://attendance.example.com/api/admin/sessions/live");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LiveConfig {
    /// Server base URL (default: http://localhost:8080)
    pub base_url: String,
    /// Live feed path, or an absolute URL that replaces `base_url`
    pub path: String,
    /// Reconnect delays
    pub backoff: BackoffPolicy,
    /// Connect timeout for each attempt (default: 10s)
    pub connect_timeout: Duration,
    /// Entries kept by the event history (default: 500)
    pub history_capacity: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: DEFAULT_LIVE_PATH.to_string(),
            backoff: BackoffPolicy::default(),
            connect_timeout: Duration::from_secs(10),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl LiveConfig {
    /// Create a new LiveConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the live feed path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the reconnect backoff policy.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the history capacity.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Full URL of the live feed.
    pub fn url(&self) -> String {
        if is_absolute(&self.path) {
            return self.path.clone();
        }

        let base = self.base_url.trim_end_matches('/');
        if self.path.is_empty() {
            base.to_string()
        } else if self.path.starts_with('/') {
            format!("{}{}", base, self.path)
        } else {
            format!("{}/{}", base, self.path)
        }
    }

    /// Check that the configuration can be used.
    pub fn validate(&self) -> LiveResult<()> {
        let url = self.url();
        if !is_absolute(&url) {
            return Err(LiveError::Config(format!(
                "URL must start with http:// or https://: {}",
                url
            )));
        }
        self.backoff.validate().map_err(LiveError::Config)?;
        if self.connect_timeout.is_zero() {
            return Err(LiveError::Config("Connect timeout must be > 0".to_string()));
        }
        if self.history_capacity == 0 {
            return Err(LiveError::Config("History capacity must be > 0".to_string()));
        }
        Ok(())
    }

    /// Create config from `LIVEFEED_*` environment variables.
    ///
    /// Unset variables keep their defaults. Values that fail to parse are
    /// ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(path) = lookup(ENV_PATH) {
            config.path = path;
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_BACKOFF_STEP_MS) {
            config.backoff.step = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, ENV_BACKOFF_MAX_MS) {
            config.backoff.max_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, ENV_CONNECT_TIMEOUT_SECS) {
            config.connect_timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment value");
            None
        }
    }
}
