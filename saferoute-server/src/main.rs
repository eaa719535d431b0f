//! HTTP service answering safety-aware alternative route requests.
//!
//! # Endpoints
//!
//! - `POST /route` - up to `k` diverse routes as a `GeoJSON` FeatureCollection
//! - `GET /health` - liveness probe with the loaded graph size
//!
//! Log verbosity follows `RUST_LOG` (default: info).

mod config;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use saferoute_core::{NetworkConfig, create_road_graph};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::{AppState, app};

#[derive(Debug, Parser)]
#[command(version, about = "Safety-aware alternative routing service")]
struct Args {
    /// CSV edge table with WKT geometry, length and safety columns
    #[arg(long)]
    dataset: PathBuf,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Upper bound of the safety scale, overrides the config file
    #[arg(long)]
    safety_max: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(safety_max) = args.safety_max {
        config.router.cost.safety_max = safety_max;
    }
    config.router.validate()?;

    info!(dataset = %args.dataset.display(), "loading road network");
    let network = NetworkConfig {
        dataset_path: args.dataset.clone(),
        coordinate_precision: config.coordinate_precision,
    };
    let graph = tokio::task::spawn_blocking(move || create_road_graph(&network))
        .await?
        .map_err(|e| {
            error!(error = %e, "failed to load road network");
            e
        })?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "road network loaded"
    );

    let state = AppState {
        graph: Arc::new(graph),
        config: Arc::new(config),
    };

    info!(addr = %args.bind, "listening on");
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
