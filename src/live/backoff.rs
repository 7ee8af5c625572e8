//! Reconnect delay policy.

use std::time::Duration;

/// Linear backoff capped at a ceiling.
///
/// The delay before reconnect attempt `n` (1-based) is
/// `min(n * step, max_delay)`, so the sequence never decreases and never
/// exceeds `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay added per attempt.
    pub step: Duration,
    /// Upper bound for any delay.
    pub max_delay: Duration,
}

impl BackoffPolicy {
    /// Create a policy with the given step and ceiling.
    pub fn new(step: Duration, max_delay: Duration) -> Self {
        Self { step, max_delay }
    }

    /// Computes the delay to apply before the given reconnect attempt.
    ///
    /// `attempt` is 1-based; attempt 0 yields no delay.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        std::cmp::min(self.step.saturating_mul(attempt), self.max_delay)
    }

    /// Check the policy bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.step.is_zero() {
            return Err("Reconnect step must be > 0".to_string());
        }
        if self.max_delay < self.step {
            return Err("Max reconnect delay must be >= reconnect step".to_string());
        }
        Ok(())
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            step: Duration::from_secs(1),
            max_delay: Duration::from_secs(15),
        }
    }
}
