//! Body decoding codecs.
//!
//! # Data Flow
//! ```text
//! request content-type
//!     → CodecRegistry::resolve (built-in mappings merged with overrides)
//!     → Codec::decode (raw bytes → zero or more Events)
//! ```
//!
//! # Design Decisions
//! - Mappings are merged once at startup and read-only afterwards
//! - An override for a MIME type replaces the built-in mapping for it
//! - No content-type, or no match, falls back to the instance default codec
//! - Decode failures are typed; the handler maps them to a 400 response

pub mod json;
pub mod json_lines;
pub mod plain;

pub use json::JsonCodec;
pub use json_lines::JsonLinesCodec;
pub use plain::PlainCodec;

use crate::event::Event;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Error produced when a body cannot be decoded into events.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The body parsed, but its shape cannot become events.
    #[error("expected a JSON object or array of objects, got {0}")]
    UnexpectedShape(&'static str),
}

/// A body decoding strategy producing structured events from raw bytes.
pub trait Codec: Send + Sync {
    /// Codec name for configuration and logging.
    fn name(&self) -> &'static str;

    /// Decode a request body into zero or more events.
    fn decode(&self, data: &[u8]) -> Result<Vec<Event>, DecodeError>;
}

/// A codec name that does not match any known codec.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown codec '{0}'")]
pub struct UnknownCodec(pub String);

/// Look up a codec implementation by its configured name.
pub fn by_name(name: &str) -> Result<Arc<dyn Codec>, UnknownCodec> {
    match name {
        "plain" => Ok(Arc::new(PlainCodec)),
        "json" => Ok(Arc::new(JsonCodec)),
        "json_lines" => Ok(Arc::new(JsonLinesCodec)),
        other => Err(UnknownCodec(other.to_string())),
    }
}

/// True when `name` refers to a codec this gateway ships.
pub fn is_known(name: &str) -> bool {
    by_name(name).is_ok()
}

/// Resolved MIME-type to codec table for one gateway instance.
///
/// Built from the default mappings (`application/json` → `json`,
/// `text/plain` → `plain`) with user overrides applied on top. Resolution
/// is case-insensitive on the bare MIME type; content-type parameters such
/// as `charset` are ignored.
pub struct CodecRegistry {
    by_mime: HashMap<String, Arc<dyn Codec>>,
    default_codec: Arc<dyn Codec>,
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("mime_types", &self.by_mime.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CodecRegistry {
    /// Build the registry from the configured default codec name and the
    /// MIME-type override table.
    pub fn build(
        default: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<Self, UnknownCodec> {
        let default_codec = by_name(default)?;

        let mut by_mime: HashMap<String, Arc<dyn Codec>> = HashMap::new();
        by_mime.insert("application/json".to_string(), Arc::new(JsonCodec));
        by_mime.insert("text/plain".to_string(), Arc::new(PlainCodec));

        for (mime, name) in overrides {
            let codec = by_name(name)?;
            by_mime.insert(mime.trim().to_ascii_lowercase(), codec);
        }

        Ok(Self {
            by_mime,
            default_codec,
        })
    }

    /// Resolve the codec for a request's content-type header value.
    pub fn resolve(&self, content_type: Option<&str>) -> &dyn Codec {
        content_type
            .map(normalize_mime)
            .and_then(|mime| self.by_mime.get(&mime))
            .map(Arc::as_ref)
            .unwrap_or_else(|| self.default_codec.as_ref())
    }

    /// Name of the fallback codec used when no mapping matches.
    pub fn default_codec_name(&self) -> &'static str {
        self.default_codec.name()
    }

    /// Number of MIME-type mappings in the table.
    pub fn mapping_count(&self) -> usize {
        self.by_mime.len()
    }
}

/// Strip content-type parameters and normalize case: `Text/Plain; charset=x`
/// becomes `text/plain`.
fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}
