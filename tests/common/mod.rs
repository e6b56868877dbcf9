//! Shared utilities for integration tests.

use ingest_gateway::config::GatewayConfig;
use ingest_gateway::event::Event;
use ingest_gateway::http::HttpServer;
use ingest_gateway::lifecycle::Shutdown;
use ingest_gateway::sink::ChannelSink;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A gateway running on an ephemeral local port with a capturing sink.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub events: mpsc::Receiver<Event>,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[allow(dead_code)]
    pub fn url_for(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Receive the next captured event, failing the test on timeout.
    #[allow(dead_code)]
    pub async fn next_event(&mut self) -> Event {
        tokio::time::timeout(Duration::from_secs(2), self.events.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("event channel closed")
    }

    /// Assert that no event arrives within a short window.
    #[allow(dead_code)]
    pub async fn expect_no_event(&mut self) {
        let outcome =
            tokio::time::timeout(Duration::from_millis(200), self.events.recv()).await;
        assert!(outcome.is_err(), "unexpected event: {:?}", outcome);
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway with the given configuration, bound to 127.0.0.1 on an
/// ephemeral port. The queue capacity comes from `config.queue.capacity`.
pub async fn start_gateway(mut config: GatewayConfig) -> TestGateway {
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;

    let (sink, events) = ChannelSink::bounded(config.queue.capacity);
    let server = HttpServer::new(config, Arc::new(sink)).expect("server construction failed");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestGateway {
        addr,
        events,
        shutdown,
    }
}
