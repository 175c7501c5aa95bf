//! Beacon API gateway.
//!
//! Serves the REST beacon node API in front of an RPC backend that speaks
//! JSON over HTTP with different field encodings.
//!
//! ```text
//!     Client ──REST──▶ http server ──▶ endpoint registry
//!                          │
//!                          ├─ binary override ──┐
//!                          ├─ event override ───┼──▶ backend
//!                          └─ proxy pipeline ───┘
//!                               (transform ⇄)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use beacon_gateway::config::{load_config, validate_config, GatewayConfig};
use beacon_gateway::lifecycle::{signals, Shutdown};
use beacon_gateway::observability::{logging, metrics};
use beacon_gateway::GatewayServer;

#[derive(Debug, Parser)]
#[command(name = "beacon-gateway", version, about = "REST gateway for beacon node RPC backends")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener address, overrides `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Backend address, overrides `backend.address`.
    #[arg(long)]
    backend: Option<String>,

    /// Log level, overrides `observability.log_level`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_config(self) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(backend) = self.backend {
            config.backend.address = backend;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        validate_config(&config).map_err(|errors| {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config()?;

    logging::init_tracing(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "beacon-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.address,
        backend_timeout_secs = config.timeouts.backend_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let server = GatewayServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
