//! Resource gateway.
//!
//! Serves in-memory demo resources through the resource dispatch core.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌──────────────────────────────────────────────────────┐
//!     ──────────────────────┼─▶ transport (axum | hyper)                           │
//!                           │      │ strip prefix, buffer body, parse query        │
//!                           │      ▼                                               │
//!                           │   routing::tree ── no match ──▶ 404                  │
//!                           │      │ handler, id, ancestor ids                     │
//!                           │      ▼                                               │
//!                           │   dispatch::middleware ── error ──▶ 500              │
//!                           │      │                                               │
//!                           │      ▼                                               │
//!                           │   dispatch::method ──▶ ResourceHandler               │
//!                           │      │ (status, payload, error)                      │
//!     Client Response       │      ▼                                               │
//!     ◀─────────────────────┼── http::response (encode)                            │
//!                           └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use resource_gateway::config::{self, GatewayConfig};
use resource_gateway::dispatch::RequestLogger;
use resource_gateway::observability::{logging, metrics};
use resource_gateway::resource::MemoryResource;
use resource_gateway::transport::{self, TransportKind};

#[derive(Parser)]
#[command(name = "resource-gateway")]
#[command(about = "Serve nested CRUD resources over HTTP", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listening port (overrides the config file).
    #[arg(short, long)]
    port: Option<u16>,

    /// Path prefix (overrides the config file).
    #[arg(long)]
    prefix: Option<String>,

    /// HTTP stack (overrides the config file).
    #[arg(short, long, value_enum)]
    transport: Option<TransportKind>,

    /// Resource pattern to serve, repeatable (replaces the configured list).
    #[arg(short, long = "resource")]
    resources: Vec<String>,
}

impl Cli {
    fn apply(self, config: &mut GatewayConfig) {
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(prefix) = self.prefix {
            config.api.prefix = prefix;
        }
        if let Some(kind) = self.transport {
            config.api.transport = kind;
        }
        if !self.resources.is_empty() {
            config.api.resources = self.resources;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };
    cli.apply(&mut config);
    config::validate_config(&config).map_err(config::ConfigError::Validation)?;

    logging::init(&config.observability.log_level);
    tracing::info!("resource-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        port = config.listener.port,
        prefix = %config.api.prefix,
        transport = %config.api.transport,
        resources = ?config.api.resources,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut server = transport::build(&config);
    for pattern in &config.api.resources {
        server.add_resource(pattern, Arc::new(MemoryResource::new(pattern.as_str())))?;
    }
    if config.api.log_requests {
        server.add_middleware(Arc::new(RequestLogger));
    }

    let listener = transport::bind(&config.listener).await?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
