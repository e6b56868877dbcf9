//! Downstream event delivery.
//!
//! # Data Flow
//! ```text
//! handler (per request)
//!     → EventSink::push          ← awaits while the queue is full
//!     → bounded mpsc channel
//!     → drain task (StdoutWriter in the binary, test capture in tests)
//! ```
//!
//! # Design Decisions
//! - Push blocks on a full queue instead of failing; a stalled worker keeps
//!   its admission slot, which is what eventually saturates admission
//! - Push has no timeout at this layer
//! - Push only errors once the receiving side is gone (shutdown)

use crate::event::Event;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;

/// Error delivering an event downstream.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The queue's receiving side has been dropped.
    #[error("downstream queue closed")]
    Closed,
}

/// Destination for decoded events.
///
/// Implementations must apply backpressure by awaiting in `push` when the
/// destination is at capacity, never by dropping or rejecting.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Sink name for logging.
    fn name(&self) -> &'static str;

    /// Deliver one event. Awaits while the destination is full.
    async fn push(&self, event: Event) -> Result<(), SinkError>;
}

/// Sink backed by a bounded in-process channel.
pub struct ChannelSink {
    tx: mpsc::Sender<Event>,
}

impl ChannelSink {
    /// Create a sink and its receiving half with the given queue depth.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    fn name(&self) -> &'static str {
        "channel"
    }

    async fn push(&self, event: Event) -> Result<(), SinkError> {
        self.tx.send(event).await.map_err(|_| SinkError::Closed)
    }
}

/// Drains the queue and writes one JSON object per line to stdout.
pub struct StdoutWriter {
    written: AtomicU64,
}

impl StdoutWriter {
    pub fn new() -> Self {
        Self {
            written: AtomicU64::new(0),
        }
    }

    /// Total events written so far.
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Consume events until the sending side closes.
    pub async fn run(&self, mut rx: mpsc::Receiver<Event>) {
        use std::io::Write;

        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => {
                    let mut stdout = std::io::stdout().lock();
                    if writeln!(stdout, "{line}").is_err() {
                        tracing::warn!("Failed to write event to stdout");
                        continue;
                    }
                    self.written.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to serialize event");
                }
            }
        }
        tracing::info!(written = self.written(), "Event queue drained, writer stopping");
    }
}

impl Default for StdoutWriter {
    fn default() -> Self {
        Self::new()
    }
}
