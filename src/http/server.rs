//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router: every method on every path hits the ingest
//!   handler
//! - Resolve startup state from the configuration (codec table, parsed
//!   response headers, admission capacity, credentials)
//! - Bind and serve, plaintext or TLS, with graceful shutdown
//!
//! Startup state that cannot be resolved (unknown codec name, malformed
//! response header) is a configuration error: the server refuses to
//! construct rather than failing requests later.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::routing::any;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::admission::AdmissionController;
use crate::auth::BasicCredentials;
use crate::codec::CodecRegistry;
use crate::config::{validate_config, ConfigError, GatewayConfig, ValidationError};
use crate::http::handler;
use crate::net::tls::load_tls_config;
use crate::sink::EventSink;

/// Application state injected into the ingest handler.
pub struct AppState {
    pub admission: AdmissionController,
    pub credentials: Option<BasicCredentials>,
    pub codecs: CodecRegistry,
    pub sink: Arc<dyn EventSink>,
    pub response_headers: HeaderMap,
    pub max_body_size: usize,
}

/// HTTP server for the ingestion gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer").finish_non_exhaustive()
    }
}

impl HttpServer {
    /// Build a server from a configuration and a downstream sink.
    ///
    /// Validates the configuration and resolves all startup state; any
    /// problem surfaces here as a `ConfigError`, before a socket is bound.
    pub fn new(config: GatewayConfig, sink: Arc<dyn EventSink>) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let codecs = CodecRegistry::build(&config.codec.default, &config.codec.additional_codecs)?;
        let response_headers = build_response_headers(&config.response.headers)?;

        let state = Arc::new(AppState {
            admission: AdmissionController::new(config.admission_capacity()),
            credentials: config.auth.credentials(),
            codecs,
            sink,
            response_headers,
            max_body_size: config.listener.max_body_size,
        });

        let router = Router::new()
            .route("/", any(handler::ingest))
            .route("/{*path}", any(handler::ingest))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Ok(Self { router, config })
    }

    /// Run the server on an already-bound plaintext listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admission_capacity = self.config.admission_capacity(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Bind and run the server with TLS.
    pub async fn run_tls(
        self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = self
            .config
            .listener
            .socket_addr()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let (Some(certificate), Some(key)) =
            (&self.config.ssl.certificate, &self.config.ssl.key)
        else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "TLS enabled without certificate and key",
            ));
        };

        let tls = load_tls_config(certificate, key).await?;

        tracing::info!(
            address = %addr,
            admission_capacity = self.config.admission_capacity(),
            "HTTPS server starting"
        );

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            shutdown_handle.graceful_shutdown(None);
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app)
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

fn build_response_headers(configured: &HashMap<String, String>) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    for (name, value) in configured {
        let parsed_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| invalid_header(name))?;
        let parsed_value = HeaderValue::from_str(value).map_err(|_| invalid_header(name))?;
        headers.insert(parsed_name, parsed_value);
    }
    Ok(headers)
}

fn invalid_header(name: &str) -> ConfigError {
    ConfigError::Validation(vec![ValidationError::InvalidResponseHeader(
        name.to_string(),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ChannelSink;
    use std::path::PathBuf;

    fn sink() -> Arc<dyn EventSink> {
        let (sink, _rx) = ChannelSink::bounded(8);
        Arc::new(sink)
    }

    #[test]
    fn test_construction_with_defaults() {
        assert!(HttpServer::new(GatewayConfig::default(), sink()).is_ok());
    }

    #[test]
    fn test_ssl_without_cert_fails_construction() {
        let mut config = GatewayConfig::default();
        config.ssl.enabled = true;

        let err = HttpServer::new(config, sink()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_ssl_with_paths_constructs() {
        let mut config = GatewayConfig::default();
        config.ssl.enabled = true;
        config.ssl.certificate = Some(PathBuf::from("/tls/cert.pem"));
        config.ssl.key = Some(PathBuf::from("/tls/key.pem"));

        assert!(HttpServer::new(config, sink()).is_ok());
    }

    #[test]
    fn test_unknown_codec_fails_construction() {
        let mut config = GatewayConfig::default();
        config.codec.default = "avro".into();

        assert!(HttpServer::new(config, sink()).is_err());
    }

    #[test]
    fn test_response_headers_parsed_at_startup() {
        let mut config = GatewayConfig::default();
        config
            .response
            .headers
            .insert("X-Served-By".into(), "gateway".into());

        let server = HttpServer::new(config, sink()).unwrap();
        assert_eq!(server.config().response.headers.len(), 1);
    }
}
