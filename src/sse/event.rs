//! Decoded stream event types.
//!
//! A [`StreamEvent`] is produced by the [`FrameDecoder`](super::FrameDecoder)
//! for every terminated event block. The payload is decoded once, at
//! ingestion time, into an [`EventPayload`] so consumers get both the raw
//! text and a best-effort structured value.

use serde::Serialize;
use serde_json::Value;

/// Event type used when a block carries no `event:` field.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// Event type servers use for keep-alive heartbeats.
pub const PING_EVENT_TYPE: &str = "ping";

/// Payload of a stream event.
///
/// Payloads that look like a JSON object or array are decoded as
/// [`EventPayload::Structured`]; anything else, including JSON that fails to
/// parse, stays [`EventPayload::Raw`]. The raw text is always kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// Payload decoded as a JSON object or array.
    Structured {
        /// Decoded value
        value: Value,
        /// Original payload text
        raw: String,
    },
    /// Payload kept as plain text.
    Raw {
        /// Payload text
        text: String,
    },
}

impl EventPayload {
    /// Decode a payload assembled from `data:` lines.
    pub fn decode(raw: String) -> Self {
        let trimmed = raw.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(value) = serde_json::from_str::<Value>(&raw) {
                return EventPayload::Structured { value, raw };
            }
        }
        EventPayload::Raw { text: raw }
    }

    /// The payload text exactly as received.
    pub fn raw(&self) -> &str {
        match self {
            EventPayload::Structured { raw, .. } => raw,
            EventPayload::Raw { text } => text,
        }
    }

    /// The decoded value, if the payload was structured.
    pub fn structured(&self) -> Option<&Value> {
        match self {
            EventPayload::Structured { value, .. } => Some(value),
            EventPayload::Raw { .. } => None,
        }
    }

    /// Returns true when no `data:` content was received.
    pub fn is_empty(&self) -> bool {
        self.raw().is_empty()
    }
}

impl Default for EventPayload {
    fn default() -> Self {
        EventPayload::Raw {
            text: String::new(),
        }
    }
}

/// A single event decoded from the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamEvent {
    /// Identifier carried by this block's `id:` field, if any.
    pub id: Option<String>,
    /// Value of the `event:` field, or [`DEFAULT_EVENT_TYPE`].
    pub event_type: String,
    /// Payload assembled from the block's `data:` lines.
    pub data: EventPayload,
}

impl StreamEvent {
    /// Build an event, decoding `data` into an [`EventPayload`].
    pub fn new(id: Option<String>, event_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id,
            event_type: event_type.into(),
            data: EventPayload::decode(data.into()),
        }
    }

    /// The raw payload text.
    pub fn raw(&self) -> &str {
        self.data.raw()
    }

    /// Non-empty identifier usable as a resumption cursor.
    pub fn resumption_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns true for `ping` heartbeats, which UIs usually skip.
    pub fn is_heartbeat(&self) -> bool {
        self.event_type == PING_EVENT_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_object_payload() {
        let payload = EventPayload::decode(r#"{"present":3}"#.to_string());
        assert_eq!(payload.structured(), Some(&json!({"present": 3})));
        assert_eq!(payload.raw(), r#"{"present":3}"#);
    }

    #[test]
    fn test_decode_array_payload() {
        let payload = EventPayload::decode("[1, 2]".to_string());
        assert_eq!(payload.structured(), Some(&json!([1, 2])));
    }

    #[test]
    fn test_decode_plain_text_stays_raw() {
        let payload = EventPayload::decode("hello world".to_string());
        assert_eq!(
            payload,
            EventPayload::Raw {
                text: "hello world".to_string()
            }
        );
        assert!(payload.structured().is_none());
    }

    #[test]
    fn test_decode_scalars_stay_raw() {
        // Only objects and arrays are treated as structured
        assert!(EventPayload::decode("42".to_string()).structured().is_none());
        assert!(EventPayload::decode("\"quoted\"".to_string())
            .structured()
            .is_none());
    }

    #[test]
    fn test_decode_broken_json_falls_back_to_raw() {
        let payload = EventPayload::decode("{not json".to_string());
        assert_eq!(payload.raw(), "{not json");
        assert!(payload.structured().is_none());
    }

    #[test]
    fn test_empty_payload() {
        let payload = EventPayload::decode(String::new());
        assert!(payload.is_empty());
        assert_eq!(payload, EventPayload::default());
    }

    #[test]
    fn test_resumption_id_ignores_empty() {
        let event = StreamEvent::new(Some(String::new()), "message", "x");
        assert_eq!(event.resumption_id(), None);

        let event = StreamEvent::new(Some("7".to_string()), "message", "x");
        assert_eq!(event.resumption_id(), Some("7"));
    }

    #[test]
    fn test_is_heartbeat() {
        assert!(StreamEvent::new(None, "ping", "").is_heartbeat());
        assert!(!StreamEvent::new(None, "message", "").is_heartbeat());
    }

    #[test]
    fn test_payload_serializes_with_kind_tag() {
        let payload = EventPayload::decode("plain".to_string());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, json!({"kind": "raw", "text": "plain"}));
    }
}
