//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error so `main` can propagate
/// everything with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: fishfarm_core::config::ConfigError,
    },

    /// Building the farm or running a day failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: fishfarm_core::tick::SimulationError,
    },

    /// Encoding the final snapshot failed.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: fishfarm_core::snapshot::SnapshotError,
    },

    /// Writing the snapshot file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The final ledger audit found an inconsistency.
    #[error("ledger audit failed: {anomaly}")]
    Audit {
        /// What the audit found.
        anomaly: fishfarm_ledger::LedgerAnomaly,
    },
}
