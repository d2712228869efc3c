//! hitboard-srv - Top-N streaming dashboard server
//!
//! Loads the catalog once at startup, then serves the derived views and
//! accepts control events over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use hitboard_common::config::{resolve_dataset_path, ConfigResolver, DATASET_ENV_VAR};
use hitboard_common::events::EventBus;
use hitboard_core::{AxisChoice, SelectionStore, Session};
use hitboard_srv::loader::load_universe;
use hitboard_srv::{build_router, logging, AppState};
use tokio::signal;
use tracing::{info, warn};

/// Capacity of the SSE event broadcast channel
const EVENT_BUS_CAPACITY: usize = 256;

/// Command-line arguments for hitboard-srv
#[derive(Parser, Debug)]
#[command(name = "hitboard-srv")]
#[command(about = "Top-N streaming dashboard server")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "HITBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Catalog CSV file
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "HITBOARD_PORT")]
    port: Option<u16>,

    /// Initial top-N window (overrides config)
    #[arg(short, long)]
    window: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing first, so config loading is logged
    let (filter, env_override) = logging::bootstrap_filter();
    let filter_handle = logging::init(filter);

    info!("Starting hitboard-srv v{}", env!("CARGO_PKG_VERSION"));

    let config = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;
    logging::apply_config_level(&filter_handle, &config.logging.level, env_override)?;

    let dataset = resolve_dataset_path(args.dataset.as_deref(), &config).ok_or_else(|| {
        anyhow!(
            "No dataset configured: pass --dataset, set {} or set dataset_path in the config file",
            DATASET_ENV_VAR
        )
    })?;

    let universe = load_universe(&dataset, config.encoding, config.universe_size)
        .with_context(|| format!("Failed to load catalog {}", dataset.display()))?;
    if universe.is_empty() {
        warn!("Catalog {} produced an empty universe", dataset.display());
    }

    let axes = match AxisChoice::parse(&config.default_x_axis, &config.default_y_axis) {
        Ok(axes) => axes,
        Err(e) => {
            warn!("Invalid default axes ({}), using danceability/energy", e);
            AxisChoice::default()
        }
    };

    let window = args.window.unwrap_or(config.default_window);
    let session = Session::new(Arc::new(universe), window, axes, SelectionStore::new());
    let state = AppState::new(session, EventBus::new(EVENT_BUS_CAPACITY));
    let app = build_router(state);

    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", config.host, port);
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
