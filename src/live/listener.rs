//! Callback surface of the live client.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use super::state::CloseReason;
use crate::error::StreamError;
use crate::sse::{EventPayload, StreamEvent};

/// Passed to [`LiveListener::on_open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpenInfo {
    /// Re-attempts made since `connect()` before this open succeeded
    pub attempts: u32,
}

/// Passed to [`LiveListener::on_close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CloseInfo {
    pub reason: CloseReason,
}

/// A delivered event together with the resumption cursor at delivery time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMessage {
    pub event: StreamEvent,
    /// Last non-empty id seen on this client, including this event's own id
    pub last_event_id: Option<String>,
}

impl LiveMessage {
    /// The id carried by this event block, if any.
    pub fn id(&self) -> Option<&str> {
        self.event.resumption_id()
    }

    pub fn event_type(&self) -> &str {
        &self.event.event_type
    }

    pub fn data(&self) -> &EventPayload {
        &self.event.data
    }

    /// The payload text exactly as received.
    pub fn raw(&self) -> &str {
        self.event.raw()
    }

    pub fn is_heartbeat(&self) -> bool {
        self.event.is_heartbeat()
    }
}

/// Receives lifecycle callbacks from a [`ResilientClient`](super::ResilientClient).
///
/// Every method has an empty default. Callbacks run on the client's driver
/// task, in order, and should return quickly.
pub trait LiveListener: Send + Sync + 'static {
    /// The stream is open and events will follow.
    fn on_open(&self, _info: OpenInfo) {}

    /// An event arrived. The resumption cursor is already updated.
    fn on_message(&self, _message: LiveMessage) {}

    /// An attempt failed. A reconnect is scheduled right after this call.
    fn on_error(&self, _error: &StreamError) {}

    /// The stream ended cleanly or the client was closed.
    fn on_close(&self, _info: CloseInfo) {}

    /// A reconnect was scheduled after `delay`.
    fn on_reconnect_scheduled(&self, _attempt: u32, _delay: Duration) {}
}

/// Listener that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl LiveListener for NoopListener {}

impl<L: LiveListener + ?Sized> LiveListener for Arc<L> {
    fn on_open(&self, info: OpenInfo) {
        (**self).on_open(info)
    }

    fn on_message(&self, message: LiveMessage) {
        (**self).on_message(message)
    }

    fn on_error(&self, error: &StreamError) {
        (**self).on_error(error)
    }

    fn on_close(&self, info: CloseInfo) {
        (**self).on_close(info)
    }

    fn on_reconnect_scheduled(&self, attempt: u32, delay: Duration) {
        (**self).on_reconnect_scheduled(attempt, delay)
    }
}

/// A listener callback as a value.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveNotification {
    Open(OpenInfo),
    Message(LiveMessage),
    Error(StreamError),
    Close(CloseInfo),
    ReconnectScheduled { attempt: u32, delay: Duration },
}

/// Forwards every callback over an unbounded channel.
///
/// Notifications sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<LiveNotification>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LiveNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, notification: LiveNotification) {
        let _ = self.tx.send(notification);
    }
}

impl LiveListener for ChannelListener {
    fn on_open(&self, info: OpenInfo) {
        self.send(LiveNotification::Open(info));
    }

    fn on_message(&self, message: LiveMessage) {
        self.send(LiveNotification::Message(message));
    }

    fn on_error(&self, error: &StreamError) {
        self.send(LiveNotification::Error(error.clone()));
    }

    fn on_close(&self, info: CloseInfo) {
        self.send(LiveNotification::Close(info));
    }

    fn on_reconnect_scheduled(&self, attempt: u32, delay: Duration) {
        self.send(LiveNotification::ReconnectScheduled { attempt, delay });
    }
}
