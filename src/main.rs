//! Gateway binary: CLI parsing, logging, runtime construction, startup.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ingest_gateway::config::{load_config, GatewayConfig};
use ingest_gateway::http::HttpServer;
use ingest_gateway::lifecycle::Shutdown;
use ingest_gateway::sink::{ChannelSink, StdoutWriter};

#[derive(Parser, Debug)]
#[command(name = "ingest-gateway", about = "HTTP event ingestion gateway")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config = match args.config {
        Some(path) => load_config(&path),
        None => Ok(GatewayConfig::default()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ingest_gateway={}", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // worker count is a config value, so the runtime is built by hand
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.listener.threads)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build runtime");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(config)) {
        tracing::error!(error = %e, "Gateway exited with error");
        std::process::exit(1);
    }
}

async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        threads = config.listener.threads,
        max_pending_requests = config.listener.max_pending_requests,
        admission_capacity = config.admission_capacity(),
        queue_capacity = config.queue.capacity,
        default_codec = %config.codec.default,
        ssl = config.ssl.enabled,
        auth = config.auth.credentials().is_some(),
        "Configuration loaded"
    );

    let (sink, events) = ChannelSink::bounded(config.queue.capacity);
    tokio::spawn(async move {
        StdoutWriter::new().run(events).await;
    });

    let shutdown = Arc::new(Shutdown::new());
    let signal_shutdown = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            signal_shutdown.trigger();
        }
    });

    let server = HttpServer::new(config.clone(), Arc::new(sink))?;

    if config.ssl.enabled {
        server.run_tls(shutdown.subscribe()).await?;
    } else {
        let addr = config.listener.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        server.run(listener, shutdown.subscribe()).await?;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
