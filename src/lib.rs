//! livefeed - resilient client for authenticated live event streams
//!
//! Opens a long-lived `text/event-stream` response with custom auth headers,
//! decodes it into typed events, and reconnects with capped backoff while
//! resuming from the last seen event id.

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod live;
pub mod sse;
pub mod traits;

pub use config::LiveConfig;
pub use error::{LiveError, LiveResult, StreamError};
pub use live::{
    create_live_client, ChannelListener, ClientStatus, ConnectionState, LiveListener,
    LiveMessage, LiveNotification, ResilientClient,
};
pub use sse::{EventPayload, FrameDecoder, StreamEvent};
