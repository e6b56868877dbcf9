//! Ingest request handling.
//!
//! # Request Pipeline
//! ```text
//! request
//!     → admission check        reject → 429 (body untouched)
//!     → auth gate              reject → 401 (no event)
//!     → read body (bounded)    failure → 400
//!     → decompress             failure → 400
//!     → resolve codec, decode  failure → 400
//!     → push events to sink    awaits while the queue is full
//!     → 200 "ok" + configured response headers
//! ```
//!
//! The admission permit is held across the whole pipeline and released by
//! drop, so every exit path gives the slot back exactly once.

use axum::body::Body;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::codec::DecodeError;
use crate::http::decompress::{decompress, DecompressError};
use crate::http::server::AppState;
use crate::sink::SinkError;

/// Per-request failure, mapped to an HTTP response.
///
/// Every variant is isolated to its own request; none of them propagate to
/// other in-flight requests or take the server down.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("server is at capacity")]
    CapacityExceeded,

    #[error("unauthorized")]
    Unauthorized,

    #[error("failed to read request body: {0}")]
    BodyRead(String),

    #[error(transparent)]
    Decompress(#[from] DecompressError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("event delivery unavailable")]
    Delivery(#[from] SinkError),
}

impl IngestError {
    fn status(&self) -> StatusCode {
        match self {
            IngestError::CapacityExceeded => StatusCode::TOO_MANY_REQUESTS,
            IngestError::Unauthorized => StatusCode::UNAUTHORIZED,
            IngestError::BodyRead(_) => StatusCode::BAD_REQUEST,
            IngestError::Decompress(_) => StatusCode::BAD_REQUEST,
            IngestError::Decode(_) => StatusCode::BAD_REQUEST,
            IngestError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.to_string()).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"ingest\""),
            );
        }
        response
    }
}

/// Handle one ingestion request end-to-end.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Result<Response, IngestError> {
    let request_id = Uuid::new_v4();

    let Some(_permit) = state.admission.try_accept() else {
        tracing::warn!(
            request_id = %request_id,
            peer = %addr,
            capacity = state.admission.capacity(),
            "Admission capacity exhausted, rejecting"
        );
        return Err(IngestError::CapacityExceeded);
    };

    if let Some(credentials) = &state.credentials {
        if !credentials.check(request.headers()) {
            tracing::warn!(
                request_id = %request_id,
                peer = %addr,
                "Rejected request with missing or invalid credentials"
            );
            return Err(IngestError::Unauthorized);
        }
    }

    let content_encoding = header_value(&request, header::CONTENT_ENCODING);
    let content_type = header_value(&request, header::CONTENT_TYPE);

    let body = axum::body::to_bytes(request.into_body(), state.max_body_size)
        .await
        .map_err(|e| IngestError::BodyRead(e.to_string()))?;

    let body = decompress(&body, content_encoding.as_deref()).map_err(|e| {
        tracing::warn!(request_id = %request_id, peer = %addr, error = %e, "Bad request body");
        e
    })?;

    let codec = state.codecs.resolve(content_type.as_deref());
    let events = codec.decode(&body).map_err(|e| {
        tracing::warn!(
            request_id = %request_id,
            peer = %addr,
            codec = codec.name(),
            error = %e,
            "Failed to decode request body"
        );
        e
    })?;

    tracing::debug!(
        request_id = %request_id,
        peer = %addr,
        codec = codec.name(),
        count = events.len(),
        "Decoded request body"
    );

    let host = addr.ip().to_string();
    for mut event in events {
        event.set_host(host.clone());
        state.sink.push(event).await?;
    }

    let mut response = (StatusCode::OK, "ok").into_response();
    for (name, value) in state.response_headers.iter() {
        response.headers_mut().insert(name.clone(), value.clone());
    }
    Ok(response)
}

fn header_value(request: &Request<Body>, name: header::HeaderName) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
