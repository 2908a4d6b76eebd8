//! Record parser for the newline-delimited reply protocol
//!
//! Buffers partial lines across fragment boundaries and decodes each
//! complete line independently. A line that fails to decode is dropped and
//! parsing continues; a malformed record never aborts the stream.

use tracing::warn;

use super::StreamEvent;

/// Parser for line-delimited `{"type", "value"}` records
#[derive(Debug, Default)]
pub struct RecordParser {
    /// Buffer for an incomplete line awaiting its terminator
    line_buffer: String,
}

impl RecordParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a text fragment, returning every completed record
    ///
    /// Splits only on fully-received terminators; the trailing partial line
    /// stays buffered until a later fragment completes it.
    pub fn parse_fragment(&mut self, fragment: &str) -> Vec<StreamEvent> {
        self.line_buffer.push_str(fragment);

        let mut events = Vec::new();
        while let Some(line_end) = self.line_buffer.find('\n') {
            let line = self.line_buffer[..line_end]
                .trim_end_matches('\r')
                .to_string();
            self.line_buffer.drain(..=line_end);

            if let Some(event) = Self::parse_line(&line) {
                events.push(event);
            }
        }

        events
    }

    /// Decode a single complete line; malformed lines are dropped
    fn parse_line(line: &str) -> Option<StreamEvent> {
        if line.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<StreamEvent>(line) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(%err, line, "dropping malformed record");
                None
            }
        }
    }

    /// Signal end-of-stream
    ///
    /// Bytes left without a trailing terminator are discarded; no partial
    /// record is ever emitted.
    pub fn finish(&mut self) {
        if !self.line_buffer.trim().is_empty() {
            warn!(
                discarded = self.line_buffer.len(),
                "discarding unterminated trailing line at end of stream"
            );
        }
        self.line_buffer.clear();
    }
}
