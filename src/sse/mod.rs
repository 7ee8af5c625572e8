//! Event-stream wire decoding.
//!
//! # Module structure
//! - `event` - Decoded event types (StreamEvent, EventPayload)
//! - `decoder` - Chunk-boundary aware frame decoder (FrameDecoder)

mod decoder;
mod event;

pub use decoder::{parse_field_line, FieldLine, FrameDecoder};
pub use event::{EventPayload, StreamEvent, DEFAULT_EVENT_TYPE, PING_EVENT_TYPE};
