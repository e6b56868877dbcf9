//! Configuration loading from disk.

use crate::codec::UnknownCodec;
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

impl From<UnknownCodec> for ConfigError {
    fn from(err: UnknownCodec) -> Self {
        ConfigError::Validation(vec![ValidationError::UnknownCodec(err.0)])
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/gateway.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let errors = vec![
            ValidationError::ZeroThreads,
            ValidationError::MissingCertificate,
        ];
        let message = ConfigError::Validation(errors).to_string();
        assert!(message.contains("listener.threads"));
        assert!(message.contains("ssl.certificate"));
    }
}
