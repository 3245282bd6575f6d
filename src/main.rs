//! Forwarding gateway
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request  ?url=...&method=...&headers=...
//!     ──────────────────────────────┐
//!                                   ▼
//!     ┌──────────┐   ┌───────────────────────────────┐   ┌──────────┐
//!     │  http    │──▶│ forward: url → method →       │──▶│ upstream │──▶ Target
//!     │  server  │   │ domain → headers → body       │   │  client  │    Server
//!     └──────────┘   └───────────────────────────────┘   └────┬─────┘
//!                                                             │
//!     Client Response ◀── response: status, filtered headers ◀┘
//!                         streamed body
//!
//!     Cross-cutting: config, security (allow-lists), observability,
//!     lifecycle (graceful shutdown)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use forward_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use forward_gateway::http::HttpServer;
use forward_gateway::lifecycle::{signals, Shutdown};
use forward_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "forward-gateway")]
#[command(about = "HTTP forwarding gateway with domain and method allow-lists", long_about = None)]
struct Cli {
    /// TOML configuration file; compiled-in defaults apply without one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(cli: &Cli) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("forward-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let server = HttpServer::new(config)?;
    let forwarding = &server.config().forwarding;
    tracing::info!(
        bind_address = %server.config().listener.bind_address,
        domains = ?forwarding.domain_allow_list,
        methods = ?forwarding.method_allow_list,
        timeout_ms = forwarding.timeout_ms,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
