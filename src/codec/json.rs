//! JSON codec.

use super::{Codec, DecodeError};
use crate::event::Event;
use serde_json::Value;

/// Decodes a JSON body into events.
///
/// A top-level object becomes one event carrying its fields. A top-level
/// array becomes one event per element, in body order; every element must
/// itself be an object. Anything else is a decode failure.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, data: &[u8]) -> Result<Vec<Event>, DecodeError> {
        let value: Value = serde_json::from_slice(data)?;
        events_from_value(value)
    }
}

/// Turn a parsed JSON value into events. Shared with the `json_lines`
/// codec, which applies this per line.
pub(crate) fn events_from_value(value: Value) -> Result<Vec<Event>, DecodeError> {
    match value {
        Value::Object(fields) => Ok(vec![Event::from_fields(fields)]),
        Value::Array(items) => {
            let mut events = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(fields) => events.push(Event::from_fields(fields)),
                    other => return Err(DecodeError::UnexpectedShape(kind_of(&other))),
                }
            }
            Ok(events)
        }
        other => Err(DecodeError::UnexpectedShape(kind_of(&other))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
