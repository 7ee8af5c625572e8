//! Error category classification.
//!
//! Categories drive logging and user messaging. They never stop the live
//! client from retrying: every failure of an attempt is followed by a
//! scheduled reconnect.

use std::fmt;

/// High-level categorization of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, TLS, timeout, mid-stream read failures.
    Network,

    /// Missing or rejected credentials (including HTTP 401/403).
    Auth,

    /// Non-success statuses and malformed responses from the server.
    Server,

    /// Invalid settings supplied by the caller.
    Configuration,

    /// Filesystem and OS errors.
    System,
}

impl ErrorCategory {
    /// Returns true if errors in this category are usually transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::System => "system",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your network connection; the feed will reconnect",
            ErrorCategory::Auth => "Check the admin username and password",
            ErrorCategory::Server => "The server may be restarting; the feed will reconnect",
            ErrorCategory::Configuration => "Check the feed URL and backoff settings",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_transient() {
        assert!(ErrorCategory::Network.is_transient());
        assert!(ErrorCategory::Server.is_transient());
        assert!(!ErrorCategory::Auth.is_transient());
        assert!(!ErrorCategory::Configuration.is_transient());
        assert!(!ErrorCategory::System.is_transient());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Network.recovery_hint().contains("reconnect"));
        assert!(ErrorCategory::Auth.recovery_hint().contains("password"));
    }
}
