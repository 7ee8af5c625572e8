//! Resilient live event stream client.
//!
//! Control flow: [`ResilientClient::connect`] opens a [`StreamSession`], the
//! session feeds body chunks to a [`FrameDecoder`](crate::sse::FrameDecoder),
//! and the client relays decoded events to its [`LiveListener`] while
//! tracking the resumption id. When a session fails or ends, the client
//! schedules the next attempt per its [`BackoffPolicy`] until `close()`.

mod backoff;
mod client;
mod history;
mod listener;
mod session;
mod state;

pub use backoff::BackoffPolicy;
pub use client::{create_live_client, ResilientClient, LAST_EVENT_ID_HEADER};
pub use history::{EventHistory, HistoryEntry, HistorySnapshot};
pub use listener::{
    ChannelListener, CloseInfo, LiveListener, LiveMessage, LiveNotification, NoopListener,
    OpenInfo,
};
pub use session::{SessionHandle, SessionRequest, SessionSignal, SessionSink, StreamSession};
pub use state::{ClientStatus, CloseReason, ConnectionState};
