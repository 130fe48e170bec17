//! Edge router service.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌───────────────────────────────────────────────┐
//!                   │                 EDGE ROUTER                    │
//!   Client Request  │  ┌────────┐    ┌──────────────┐    ┌────────┐ │
//!   ────────────────┼─▶│  http  │───▶│   routing    │───▶│response│─┼──▶ decision
//!                   │  │ server │    │ RouteTable   │    │        │ │    (filesystem,
//!                   │  └────────┘    └──────▲───────┘    └────────┘ │     backend, url)
//!                   │                       │ ArcSwap               │
//!                   │  ┌────────────────────┴───────────────────┐   │
//!                   │  │ config: build output → compile → watch │   │
//!                   │  └────────────────────────────────────────┘   │
//!                   └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use edge_router::config::watcher::TableWatcher;
use edge_router::config::{load_route_table, load_server_config, ServerConfig};
use edge_router::observability::{init_logging, init_metrics, MetricsObserver};
use edge_router::routing::{RouteObserver, TracingObserver};
use edge_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "edge-router")]
#[command(about = "Routes requests to static assets, compute backends, or redirects", long_about = None)]
struct Cli {
    /// Service configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Build output JSON; overrides `routes.build_output`.
    #[arg(short, long)]
    build_output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_server_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(path) = cli.build_output {
        config.routes.build_output = path;
    }

    init_logging(&config.observability.log_level);
    tracing::info!("edge-router v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let observer: Arc<dyn RouteObserver> = Arc::new(MetricsObserver::new(TracingObserver));
    let table = load_route_table(&config.routes.build_output)?.with_observer(observer.clone());

    tracing::info!(
        bind_address = %config.listener.bind_address,
        build_output = ?config.routes.build_output,
        watch = config.routes.watch,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let (watcher, table_updates) = TableWatcher::new(&config.routes.build_output, observer);
    // Dropping the handle stops the watch, so keep it for the process lifetime.
    let _watch_handle = if config.routes.watch {
        Some(watcher.run()?)
    } else {
        None
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        edge_router::lifecycle::signals::wait_for_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(&config, Arc::new(table));
    server.run(listener, table_updates, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
