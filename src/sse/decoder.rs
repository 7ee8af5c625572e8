//! Incremental event-stream frame decoder.
//!
//! Bytes arrive in arbitrary chunks. The decoder turns them into text without
//! splitting multi-byte characters, normalizes line endings to `\n`, and
//! cuts the text into blocks at every blank line. Each block becomes at most
//! one [`StreamEvent`].
//!
//! Wire format:
//! - `id: <opaque>` - event identifier used for resumption
//! - `event: <type>` - event type (defaults to `message`)
//! - `data: <line>` - payload line, may repeat
//! - `: comment` - ignored
//! - Empty line - terminates the block

use tracing::{debug, trace};

use super::event::{StreamEvent, DEFAULT_EVENT_TYPE};

const BLOCK_DELIMITER: &str = "\n\n";
const BOM: char = '\u{feff}';

/// Classification of a single protocol line.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldLine {
    /// `id:` field
    Id(String),
    /// `event:` field
    Event(String),
    /// `data:` field
    Data(String),
    /// Blank line
    Empty,
    /// Line starting with `:`
    Comment(String),
    /// Any other field; ignored by the decoder
    Unknown { field: String, value: String },
}

/// Parse one line (without its line terminator) into a [`FieldLine`].
///
/// The value is everything after the first colon, with at most one leading
/// space removed. A line without a colon is a field with an empty value.
pub fn parse_field_line(line: &str) -> FieldLine {
    if line.is_empty() {
        return FieldLine::Empty;
    }

    if let Some(comment) = line.strip_prefix(':') {
        return FieldLine::Comment(comment.trim_start().to_string());
    }

    let (field, value) = match line.split_once(':') {
        Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
        None => (line, ""),
    };

    match field {
        "id" => FieldLine::Id(value.to_string()),
        "event" => FieldLine::Event(value.to_string()),
        "data" => FieldLine::Data(value.to_string()),
        _ => FieldLine::Unknown {
            field: field.to_string(),
            value: value.to_string(),
        },
    }
}

/// Stateful decoder from raw bytes to [`StreamEvent`]s.
///
/// After every [`feed`](FrameDecoder::feed) the internal buffer holds only
/// the text of the block that has not been terminated yet.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text of the unterminated block
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    partial_char: Vec<u8>,
    /// A `\r` ended the previous chunk, so a leading `\n` is its pair
    skip_lf: bool,
    /// Offset where the next delimiter search starts
    scan_from: usize,
    /// Whether any text has been decoded yet (for BOM stripping)
    started: bool,
}

impl FrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every event completed by it.
    ///
    /// Never blocks; returns an empty vector when the chunk does not finish
    /// a block.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let text = self.decode_utf8(chunk);
        self.push_text(&text);

        let mut events = Vec::new();
        let mut consumed = 0;
        let mut from = self.scan_from;
        while let Some(pos) = self.buffer[from..].find(BLOCK_DELIMITER) {
            let end = from + pos;
            if let Some(event) = parse_block(&self.buffer[consumed..end]) {
                events.push(event);
            }
            consumed = end + BLOCK_DELIMITER.len();
            from = consumed;
        }
        if consumed > 0 {
            self.buffer.drain(..consumed);
        }

        // Only the last byte can start a delimiter completed by the next chunk.
        let mut scan_from = self.buffer.len().saturating_sub(BLOCK_DELIMITER.len() - 1);
        while !self.buffer.is_char_boundary(scan_from) {
            scan_from -= 1;
        }
        self.scan_from = scan_from;
        events
    }

    /// Number of bytes held for the unterminated block.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.partial_char.len()
    }

    /// Returns true when no partial block is buffered.
    pub fn is_drained(&self) -> bool {
        self.buffered_len() == 0
    }

    /// Discard any partial block.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.partial_char.clear();
        self.skip_lf = false;
        self.scan_from = 0;
        self.started = false;
    }

    /// Decode bytes as UTF-8, holding back an incomplete trailing sequence
    /// for the next chunk. Invalid sequences become U+FFFD.
    fn decode_utf8(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.partial_char);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid_up_to]));
                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &rest[valid_up_to + invalid_len..];
                        }
                        None => {
                            self.partial_char = rest[valid_up_to..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Append decoded text with `\r\n` and lone `\r` normalized to `\n`.
    ///
    /// A trailing `\r` ends its line at once; a `\n` opening the next chunk
    /// is then dropped as the second half of the pair.
    fn push_text(&mut self, text: &str) {
        let mut text = text;
        if !self.started && !text.is_empty() {
            self.started = true;
            text = text.strip_prefix(BOM).unwrap_or(text);
        }
        if self.skip_lf && !text.is_empty() {
            self.skip_lf = false;
            text = text.strip_prefix('\n').unwrap_or(text);
        }

        if !text.contains('\r') {
            self.buffer.push_str(text);
            return;
        }

        self.skip_lf = text.ends_with('\r');
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.buffer.push_str(&normalized);
    }
}

/// Parse one block (without its terminating blank line).
///
/// Returns `None` for blocks that contain no `id`, `event` or `data` field,
/// such as comment-only keep-alives.
fn parse_block(block: &str) -> Option<StreamEvent> {
    let mut id: Option<String> = None;
    let mut event_type: Option<String> = None;
    let mut data_lines: Vec<String> = Vec::new();
    let mut saw_field = false;

    for line in block.split('\n') {
        match parse_field_line(line) {
            FieldLine::Empty | FieldLine::Comment(_) => {}
            FieldLine::Id(value) => {
                if value.contains('\0') {
                    debug!("Skipping id field containing NUL");
                    continue;
                }
                id = Some(value);
                saw_field = true;
            }
            FieldLine::Event(value) => {
                event_type = Some(value);
                saw_field = true;
            }
            FieldLine::Data(value) => {
                data_lines.push(value);
                saw_field = true;
            }
            FieldLine::Unknown { field, .. } => {
                trace!(field = %field, "Ignoring unknown field");
            }
        }
    }

    if !saw_field {
        return None;
    }

    let event_type = event_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string());

    Some(StreamEvent::new(
        id.filter(|id| !id.is_empty()),
        event_type,
        data_lines.join("\n"),
    ))
}
