//! Bounded log of received events with JSON snapshot export.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::listener::LiveMessage;
use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::error::LiveResult;

/// One logged event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Carried event id, or the receive time in milliseconds when none exists
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Human-readable summary of the payload
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Build an entry for a message received at `received_at`.
    pub fn from_message(message: &LiveMessage, received_at: DateTime<Utc>) -> Self {
        let id = message
            .last_event_id
            .clone()
            .unwrap_or_else(|| received_at.timestamp_millis().to_string());

        Self {
            id,
            event_type: message.event_type().to_string(),
            message: summarize(message),
            received_at,
        }
    }
}

/// The payload's `message` string when it has a non-empty one, otherwise the
/// raw payload.
fn summarize(message: &LiveMessage) -> String {
    message
        .data()
        .structured()
        .and_then(|value| value.get("message"))
        .and_then(|field| field.as_str())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| message.raw())
        .to_string()
}

/// Exported view of the history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub taken_at: DateTime<Utc>,
    pub count: usize,
    pub events: Vec<HistoryEntry>,
}

impl HistorySnapshot {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> LiveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the snapshot as pretty JSON to `path`.
    pub fn write_to(&self, path: &Path) -> LiveResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Newest-first log that keeps at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct EventHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl EventHistory {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Log a message received now.
    pub fn record(&mut self, message: &LiveMessage) -> &HistoryEntry {
        self.record_at(message, Utc::now())
    }

    /// Log a message with an explicit receive time.
    pub fn record_at(&mut self, message: &LiveMessage, received_at: DateTime<Utc>) -> &HistoryEntry {
        self.entries
            .push_front(HistoryEntry::from_message(message, received_at));
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Snapshot taken now.
    pub fn snapshot(&self) -> HistorySnapshot {
        self.snapshot_at(Utc::now())
    }

    pub fn snapshot_at(&self, taken_at: DateTime<Utc>) -> HistorySnapshot {
        HistorySnapshot {
            taken_at,
            count: self.entries.len(),
            events: self.entries.iter().rev().cloned().collect(),
        }
    }
}
