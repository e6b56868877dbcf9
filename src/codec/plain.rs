//! Plain text codec.

use super::{Codec, DecodeError};
use crate::event::Event;

/// Decodes the entire body into the `message` field of a single event.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// plain body always yields exactly one event.
pub struct PlainCodec;

impl Codec for PlainCodec {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Event>, DecodeError> {
        let text = String::from_utf8_lossy(data).into_owned();
        Ok(vec![Event::with_message(text)])
    }
}
