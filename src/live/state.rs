//! Client lifecycle state.

use std::fmt;

use serde::Serialize;

/// Connection lifecycle of a [`ResilientClient`](super::ResilientClient).
///
/// `Disconnected -> Connecting -> Connected -> Reconnecting -> Connected ...`
/// until `close()` returns the client to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Initial state, and the state after a manual close
    Disconnected,
    /// First attempt after `connect()`
    Connecting,
    /// Response accepted, body streaming
    Connected,
    /// Waiting for or running a re-attempt
    Reconnecting,
}

impl ConnectionState {
    /// Returns true for every state except `Disconnected`.
    pub fn is_active(&self) -> bool {
        !matches!(self, ConnectionState::Disconnected)
    }

    /// Returns a short label suitable for logging and UIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Reconnecting => "reconnecting",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a stream was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// The server ended the stream cleanly
    Eof,
    /// The caller closed the client
    Manual,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Eof => "eof",
            CloseReason::Manual => "manual",
        }
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the client's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientStatus {
    /// Current lifecycle state
    pub state: ConnectionState,
    /// Re-attempts since the last `connect()`
    pub attempts: u32,
    /// Resumption cursor sent as `Last-Event-ID`
    pub last_event_id: Option<String>,
}

impl Default for ClientStatus {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            attempts: 0,
            last_event_id: None,
        }
    }
}
