//! Newline-delimited JSON codec.

use super::json::events_from_value;
use super::{Codec, DecodeError};
use crate::event::Event;
use serde_json::Value;

/// Decodes each newline-terminated chunk of the body independently.
///
/// A final chunk with no trailing newline is still decoded, so the last
/// record of a stream is never dropped. Blank lines are skipped and a
/// trailing `\r` is stripped to accept CRLF input.
pub struct JsonLinesCodec;

impl Codec for JsonLinesCodec {
    fn name(&self) -> &'static str {
        "json_lines"
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Event>, DecodeError> {
        let mut events = Vec::new();
        for line in data.split(|&b| b == b'\n') {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            if line.is_empty() {
                continue;
            }
            let value: Value = serde_json::from_slice(line)?;
            events.extend(events_from_value(value)?);
        }
        Ok(events)
    }
}
