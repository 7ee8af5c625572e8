//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let http = MockHttpConfig::new().with_stream(&["id: 1\ndata: hi\n\n"]).build();
//! let (client, mut rx) = start_client(&http, admin_credentials());
//! client.connect();
//! assert!(matches!(next_notification(&mut rx).await, LiveNotification::Open(_)));
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use livefeed::live::{BackoffPolicy, ChannelListener, LiveNotification, ResilientClient};
use livefeed::traits::HeaderProvider;
use livefeed::LiveConfig;
use tokio::sync::mpsc::UnboundedReceiver;

/// How long a test waits for any single notification.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(3);

/// Backoff used by integration tests: 10ms steps capped at 40ms.
pub fn fast_backoff() -> BackoffPolicy {
    BackoffPolicy::new(Duration::from_millis(10), Duration::from_millis(40))
}

/// Config pointing at a fake host with fast backoff.
pub fn test_config() -> LiveConfig {
    LiveConfig::default()
        .with_base_url("http://live.test")
        .with_backoff(fast_backoff())
}

/// Formats one event block.
pub fn event_block(id: Option<&str>, event_type: Option<&str>, data: &[&str]) -> String {
    let mut block = String::new();
    if let Some(id) = id {
        block.push_str(&format!("id: {}\n", id));
    }
    if let Some(event_type) = event_type {
        block.push_str(&format!("event: {}\n", event_type));
    }
    for line in data {
        block.push_str(&format!("data: {}\n", line));
    }
    block.push('\n');
    block
}

/// Creates a client over the mock transport with a channel listener.
pub fn start_client<P>(
    http: &MockHttpClient,
    auth: P,
) -> (ResilientClient, UnboundedReceiver<LiveNotification>)
where
    P: HeaderProvider + 'static,
{
    start_client_with(test_config(), http, auth)
}

pub fn start_client_with<P>(
    config: LiveConfig,
    http: &MockHttpClient,
    auth: P,
) -> (ResilientClient, UnboundedReceiver<LiveNotification>)
where
    P: HeaderProvider + 'static,
{
    let (listener, rx) = ChannelListener::new();
    let client = ResilientClient::new(
        &config,
        Arc::new(http.clone()),
        Arc::new(auth),
        Arc::new(listener),
    );
    (client, rx)
}

/// Waits for the next notification or panics after [`NOTIFY_TIMEOUT`].
pub async fn next_notification(rx: &mut UnboundedReceiver<LiveNotification>) -> LiveNotification {
    tokio::time::timeout(NOTIFY_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for a notification")
        .expect("listener channel closed")
}

/// Collects notifications that arrive within `window`.
pub async fn collect_for(
    rx: &mut UnboundedReceiver<LiveNotification>,
    window: Duration,
) -> Vec<LiveNotification> {
    let mut out = Vec::new();
    let deadline = tokio::time::Instant::now() + window;
    while let Ok(Some(notification)) = tokio::time::timeout_at(deadline, rx.recv()).await {
        out.push(notification);
    }
    out
}
