//! Network layer subsystem.
//!
//! TLS certificate/key loading for the listener. The TCP accept loop and
//! connection handling live in the HTTP layer; TLS material loading is the
//! only network concern handled here.

pub mod tls;
