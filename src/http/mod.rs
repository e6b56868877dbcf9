//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, bind, shutdown)
//!     → handler.rs (admission → auth → decompress → decode → emit)
//!     → decompress.rs (gzip/deflate body handling)
//!     → sink (bounded downstream queue)
//! ```

pub mod decompress;
pub mod handler;
pub mod server;

pub use handler::IngestError;
pub use server::HttpServer;
