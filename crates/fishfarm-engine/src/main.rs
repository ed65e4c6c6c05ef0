//! Simulation binary for the fish farm.
//!
//! Loads configuration, builds the farm, runs the day cycle for the
//! configured number of days, and reports the result.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `fishfarm-config.yaml` (or `FISHFARM_CONFIG`)
//! 3. Build the facilities, warehouse and ledger
//! 4. Run the simulation loop
//! 5. Audit the ledger and log the result
//! 6. Optionally write a JSON snapshot to `FISHFARM_SNAPSHOT`

mod error;
mod report_callback;

use std::path::{Path, PathBuf};

use fishfarm_core::config::SimulationConfig;
use fishfarm_core::runner;
use fishfarm_core::snapshot::StateSnapshot;
use fishfarm_core::tick::SimulationState;
use fishfarm_ledger::{AuditResult, CoinLedger};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report_callback::ReportCallback;

/// Environment variable naming the config file.
const CONFIG_ENV_VAR: &str = "FISHFARM_CONFIG";

/// Environment variable naming where to write the final snapshot.
const SNAPSHOT_ENV_VAR: &str = "FISHFARM_SNAPSHOT";

/// Default config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "fishfarm-config.yaml";

/// Days between per-facility status lines.
const DETAIL_EVERY_DAYS: u64 = 7;

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("fishfarm-engine starting");

    let config = load_config()?;
    info!(
        farm = config.world.name,
        seed = config.world.seed,
        days = config.simulation.days,
        facilities = config.facilities.len(),
        warehouse = config.warehouse.enabled,
        "Configuration loaded"
    );

    let mut state = SimulationState::from_config(&config)?;

    let mut callback = ReportCallback::new(DETAIL_EVERY_DAYS);
    let result = runner::run_simulation(&mut state, config.simulation.days, &mut callback)?;
    runner::log_simulation_end(&result);

    match state.ledger.audit() {
        AuditResult::Balanced => info!(
            balance = state.ledger.balance(),
            earned = state.ledger.total_earned(),
            spent = state.ledger.total_spent(),
            entries = state.ledger.len(),
            "Ledger balanced"
        ),
        AuditResult::Anomaly(anomaly) => {
            warn!(%anomaly, "Ledger audit failed");
            return Err(EngineError::Audit { anomaly });
        }
    }

    if let Some(path) = std::env::var_os(SNAPSHOT_ENV_VAR).map(PathBuf::from) {
        write_snapshot(&state, &path)?;
    }

    info!("fishfarm-engine finished");
    Ok(())
}

/// Load configuration from the file named by `FISHFARM_CONFIG`, or
/// `fishfarm-config.yaml`. A missing file falls back to defaults.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let path = std::env::var_os(CONFIG_ENV_VAR)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(SimulationConfig::from_file(&path)?)
    } else {
        info!(path = %path.display(), "Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

fn write_snapshot(state: &SimulationState, path: &Path) -> Result<(), EngineError> {
    let json = StateSnapshot::capture(state).to_json()?;
    std::fs::write(path, json).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), day = state.clock.day(), "Snapshot written");
    Ok(())
}
