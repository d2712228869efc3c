//! Tracing setup in two steps
//!
//! The subscriber is installed before the config file is read so config
//! loading itself is logged. The configured level is applied afterwards,
//! unless `RUST_LOG` already chose one.

use anyhow::{Context, Result};
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Level used until the config file has been read
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Handle for swapping the active filter after startup
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Filter from `RUST_LOG`, or [`BOOTSTRAP_LEVEL`]
///
/// The flag is true when `RUST_LOG` supplied the filter.
pub fn bootstrap_filter() -> (EnvFilter, bool) {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(BOOTSTRAP_LEVEL), false),
    }
}

/// Install the global subscriber with a reloadable filter
pub fn init(filter: EnvFilter) -> FilterHandle {
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    handle
}

/// Switch to the configured level unless `RUST_LOG` is in charge
///
/// Returns whether the filter changed.
pub fn apply_config_level(handle: &FilterHandle, level: &str, env_override: bool) -> Result<bool> {
    if env_override {
        return Ok(false);
    }
    handle
        .reload(EnvFilter::new(level))
        .context("Failed to apply configured log level")?;
    Ok(true)
}
