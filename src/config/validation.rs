//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce TLS completeness: enabled implies certificate and key paths
//! - Validate value ranges (non-zero pools, bind address parses)
//! - Reject half-configured credentials and unknown codec names
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<_>>
//! - Runs before the config is accepted into the system

use crate::codec;
use crate::config::schema::GatewayConfig;
use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

/// One semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.host '{0}' is not a valid IP address")]
    InvalidHost(String),

    #[error("listener.threads must be at least 1")]
    ZeroThreads,

    #[error("listener.max_body_size must be at least 1 byte")]
    ZeroBodySize,

    #[error("queue.capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("ssl.enabled requires ssl.certificate")]
    MissingCertificate,

    #[error("ssl.enabled requires ssl.key")]
    MissingKey,

    #[error("auth.user and auth.password must be configured together")]
    PartialCredentials,

    #[error("unknown codec '{0}'")]
    UnknownCodec(String),

    #[error("invalid response header '{0}'")]
    InvalidResponseHeader(String),
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.socket_addr().is_err() {
        errors.push(ValidationError::InvalidHost(config.listener.host.clone()));
    }
    if config.listener.threads == 0 {
        errors.push(ValidationError::ZeroThreads);
    }
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodySize);
    }
    if config.queue.capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    }

    if config.ssl.enabled {
        if config.ssl.certificate.is_none() {
            errors.push(ValidationError::MissingCertificate);
        }
        if config.ssl.key.is_none() {
            errors.push(ValidationError::MissingKey);
        }
    }

    if config.auth.user.is_some() != config.auth.password.is_some() {
        errors.push(ValidationError::PartialCredentials);
    }

    if !codec::is_known(&config.codec.default) {
        errors.push(ValidationError::UnknownCodec(config.codec.default.clone()));
    }
    for name in config.codec.additional_codecs.values() {
        if !codec::is_known(name) {
            errors.push(ValidationError::UnknownCodec(name.clone()));
        }
    }

    for (name, value) in &config.response.headers {
        let name_ok = HeaderName::from_bytes(name.as_bytes()).is_ok();
        let value_ok = HeaderValue::from_str(value).is_ok();
        if !name_ok || !value_ok {
            errors.push(ValidationError::InvalidResponseHeader(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
