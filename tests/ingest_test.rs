//! End-to-end ingestion tests: codecs, compression, auth, response shaping.

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use ingest_gateway::config::GatewayConfig;
use reqwest::StatusCode;
use serde_json::json;
use std::io::Write;

mod common;

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_plain_body_becomes_event_with_host() {
    let mut gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = gateway.next_event().await;
    assert_eq!(event.get("message"), Some(&json!("hello")));
    assert_eq!(event.get("host"), Some(&json!("127.0.0.1")));

    gateway.stop();
}

#[tokio::test]
async fn test_any_method_and_path_accepted() {
    let mut gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .put(gateway.url_for("/some/deep/path"))
        .body("via put")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = gateway.next_event().await;
    assert_eq!(event.get("message"), Some(&json!("via put")));

    gateway.stop();
}

#[tokio::test]
async fn test_gzip_body_roundtrip() {
    let mut gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .header("content-type", "text/plain")
        .header("content-encoding", "gzip")
        .body(gzip(b"hello"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = gateway.next_event().await;
    assert_eq!(event.get("message"), Some(&json!("hello")));

    gateway.stop();
}

#[tokio::test]
async fn test_deflate_body_roundtrip() {
    let mut gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .header("content-type", "text/plain")
        .header("content-encoding", "deflate")
        .body(zlib(b"hello"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = gateway.next_event().await;
    assert_eq!(event.get("message"), Some(&json!("hello")));

    gateway.stop();
}

#[tokio::test]
async fn test_mislabeled_compression_is_bad_request() {
    let mut gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .header("content-encoding", "gzip")
        .body("definitely not gzip")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    gateway.expect_no_event().await;
    gateway.stop();
}

#[tokio::test]
async fn test_json_body_fields_become_event_fields() {
    let mut gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .header("content-type", "application/json")
        .body(r#"{"message_body":"Hello"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let event = gateway.next_event().await;
    assert_eq!(event.get("message_body"), Some(&json!("Hello")));
    assert_eq!(event.get("host"), Some(&json!("127.0.0.1")));

    gateway.stop();
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let mut gateway = common::start_gateway(GatewayConfig::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    gateway.expect_no_event().await;
    gateway.stop();
}

#[tokio::test]
async fn test_json_lines_keeps_final_record_without_newline() {
    let mut config = GatewayConfig::default();
    config.codec.default = "json_lines".to_string();
    let mut gateway = common::start_gateway(config).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .body("{\"foo\":1}\n{\"foo\":2}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let first = gateway.next_event().await;
    let second = gateway.next_event().await;
    assert_eq!(first.get("foo"), Some(&json!(1)));
    assert_eq!(second.get("foo"), Some(&json!(2)));
    gateway.expect_no_event().await;

    gateway.stop();
}

#[tokio::test]
async fn test_additional_codecs_override_wins() {
    let raw = r#"{"message_body":"Hello"}"#;

    let mut config = GatewayConfig::default();
    config
        .codec
        .additional_codecs
        .insert("application/json".to_string(), "plain".to_string());
    let mut gateway = common::start_gateway(config).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .header("content-type", "application/json")
        .body(raw)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // treated as raw text, not parsed
    let event = gateway.next_event().await;
    assert_eq!(event.get("message"), Some(&json!(raw)));
    assert!(event.get("message_body").is_none());

    gateway.stop();
}

#[tokio::test]
async fn test_basic_auth_gate() {
    let mut config = GatewayConfig::default();
    config.auth.user = Some("ingest".to_string());
    config.auth.password = Some("secret".to_string());
    let mut gateway = common::start_gateway(config).await;
    let client = reqwest::Client::new();

    // no credentials
    let response = client
        .post(gateway.url())
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
    gateway.expect_no_event().await;

    // wrong credentials
    let response = client
        .post(gateway.url())
        .basic_auth("ingest", Some("wrong"))
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    gateway.expect_no_event().await;

    // correct credentials
    let response = client
        .post(gateway.url())
        .basic_auth("ingest", Some("secret"))
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let event = gateway.next_event().await;
    assert_eq!(event.get("message"), Some(&json!("hello")));
    gateway.expect_no_event().await;

    gateway.stop();
}

#[tokio::test]
async fn test_configured_response_headers_on_success() {
    let mut config = GatewayConfig::default();
    config
        .response
        .headers
        .insert("X-Served-By".to_string(), "gateway".to_string());
    let mut gateway = common::start_gateway(config).await;
    let client = reqwest::Client::new();

    let response = client
        .post(gateway.url())
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Served-By").unwrap(),
        "gateway"
    );

    let _ = gateway.next_event().await;
    gateway.stop();
}
