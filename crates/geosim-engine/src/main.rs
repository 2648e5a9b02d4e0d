//! Location simulator binary.
//!
//! Wires the `PostgreSQL` record store to the location simulator and
//! runs the tick loop until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `geosim-config.yaml` (or `GEOSIM_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the `PostgreSQL` record store
//! 4. Start the simulator (connect, initialization pass, tick task)
//! 5. Wait for Ctrl-C, then stop and close the store

mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geosim_core::config::{LogFormat, LoggingConfig};
use geosim_core::{LocationSimulator, SimulationConfig};
use geosim_db::{PgRecordStore, PostgresConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file used when `GEOSIM_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "geosim-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the record store cannot
/// be reached at start, or the shutdown signal cannot be installed.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let config_path = std::env::var_os("GEOSIM_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    init_tracing(&config.logging);
    info!("geosim-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        tick_interval_ms = config.simulator.tick_interval_ms,
        store_call_timeout_ms = config.simulator.store_call_timeout_ms,
        max_concurrent_writes = config.simulator.max_concurrent_writes,
        regions = config.regions.len(),
        seeded = config.simulator.seed.is_some(),
        "Simulator configuration"
    );

    let store = Arc::new(PgRecordStore::new(PostgresConfig::from_infrastructure(
        &config.infrastructure,
    )));
    let mut simulator = LocationSimulator::from_config(store, &config)?;
    simulator.start().await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    simulator.stop().await;
    info!("geosim-engine shutdown complete");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the
/// file does not exist. Returns whether the file was read.
///
/// `DATABASE_URL` overrides the store URL in both cases.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        return Ok((SimulationConfig::from_file(path)?, true));
    }
    let mut config = SimulationConfig::default();
    config
        .infrastructure
        .apply_env_overrides_with(|key| std::env::var(key).ok());
    Ok((config, false))
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
