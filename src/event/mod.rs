//! Decoded event records.
//!
//! An [`Event`] is the structured record a codec produces from a request
//! body. It is a flat mapping of field names to JSON values. The gateway
//! attaches a `host` field with the remote address of the originating
//! request before the event is handed to the sink; the `plain` codec
//! stores the decoded body text under `message`.

use serde::Serialize;
use serde_json::{Map, Value};

/// Field carrying the remote address of the originating request.
pub const HOST_FIELD: &str = "host";

/// Field carrying the body text produced by the `plain` codec.
pub const MESSAGE_FIELD: &str = "message";

/// A decoded record: field name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    /// Create an empty event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event from an already-decoded field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Create an event whose `message` field holds the given text.
    pub fn with_message(text: impl Into<String>) -> Self {
        let mut event = Self::new();
        event.insert(MESSAGE_FIELD, text.into());
        event
    }

    /// Set a field, replacing any existing value under the same name.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Set the `host` field to the remote address of the request.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.insert(HOST_FIELD, host.into());
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields, in insertion order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Number of fields set on this event.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
