//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from config
//! files, and every section has defaults so an empty file is valid.

use crate::auth::BasicCredentials;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

/// Root configuration for the ingestion gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener settings (bind address, worker pool, admission headroom).
    pub listener: ListenerConfig,

    /// TLS settings for the listener.
    pub ssl: SslConfig,

    /// Optional HTTP Basic credentials.
    pub auth: AuthConfig,

    /// Codec selection: default codec and MIME-type overrides.
    pub codec: CodecConfig,

    /// Downstream queue settings.
    pub queue: QueueConfig,

    /// Response customization.
    pub response: ResponseConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Total admission capacity: worker threads plus pending headroom.
    pub fn admission_capacity(&self) -> usize {
        self.listener.threads + self.listener.max_pending_requests
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (IP, e.g. "0.0.0.0").
    pub host: String,

    /// Listen port.
    pub port: u16,

    /// Worker threads processing requests.
    pub threads: usize,

    /// Extra requests admitted beyond the worker count before the gateway
    /// starts rejecting with 429.
    pub max_pending_requests: usize,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            threads: 4,
            max_pending_requests: 200,
            max_body_size: 2 * 1024 * 1024,
        }
    }
}

impl ListenerConfig {
    /// The socket address to bind, from `host` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SslConfig {
    /// Serve TLS instead of plaintext.
    pub enabled: bool,

    /// Path to the certificate file (PEM). Required when enabled.
    pub certificate: Option<PathBuf>,

    /// Path to the private key file (PEM). Required when enabled.
    pub key: Option<PathBuf>,
}

/// HTTP Basic authentication configuration.
///
/// Both fields must be set together; a lone user or password is a
/// validation error. With neither set, authentication is disabled.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl AuthConfig {
    /// The configured credential pair, when authentication is enabled.
    pub fn credentials(&self) -> Option<BasicCredentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(BasicCredentials::new(user, password)),
            _ => None,
        }
    }
}

/// Codec selection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Codec used when no MIME-type mapping matches.
    pub default: String,

    /// MIME type to codec name overrides, applied over the built-in
    /// mappings. An entry replaces the built-in codec for that MIME type.
    pub additional_codecs: HashMap<String, String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default: "plain".to_string(),
            additional_codecs: HashMap::new(),
        }
    }
}

/// Downstream queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Queue depth. Once full, admitted requests block until the consumer
    /// drains.
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// Response customization.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResponseConfig {
    /// Extra headers merged into every successful response.
    pub headers: HashMap<String, String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
