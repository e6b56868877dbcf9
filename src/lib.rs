//! HTTP Event Ingestion Gateway
//!
//! Accepts pushed events over HTTP on any method and path, decodes request
//! bodies into structured records via configurable codecs, and forwards
//! them into a bounded downstream queue.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────┐
//!                  │                  INGESTION GATEWAY                    │
//!                  │                                                       │
//!   HTTP request   │  ┌───────────┐   ┌───────────┐   ┌────────────────┐  │
//!   ───────────────┼─▶│ admission │──▶│ auth gate │──▶│  decompress +  │  │
//!                  │  │ (429 on   │   │ (401 on   │   │  codec decode  │  │
//!                  │  │  overflow)│   │  mismatch)│   │  (400 on error)│  │
//!                  │  └───────────┘   └───────────┘   └───────┬────────┘  │
//!                  │                                           │           │
//!                  │                                           ▼           │
//!   HTTP response  │                                   ┌──────────────┐   │
//!   ◀──────────────┼───────────────────────────────────│ bounded sink │   │
//!                  │                                   │ (blocks when │   │
//!                  │                                   │    full)     │   │
//!                  │                                   └──────────────┘   │
//!                  │                                                       │
//!                  │  Cross-cutting: config · lifecycle · tracing · tls    │
//!                  └──────────────────────────────────────────────────────┘
//! ```
//!
//! Overload protection is two-tier. Admission is non-blocking and bounds
//! in-flight requests at `threads + max_pending_requests`; excess load gets
//! an immediate 429. The downstream push is the opposite: an admitted
//! worker facing a full queue waits, holding its admission slot, which is
//! what eventually drives admission into rejecting.

// Core subsystems
pub mod codec;
pub mod config;
pub mod event;
pub mod http;

// Overload protection and delivery
pub mod admission;
pub mod sink;

// Cross-cutting concerns
pub mod auth;
pub mod lifecycle;
pub mod net;

pub use config::GatewayConfig;
pub use event::Event;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
