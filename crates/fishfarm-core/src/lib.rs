//! Simulation clock, configuration, daily driver, and snapshots for the
//! fish farm simulation.
//!
//! This crate owns the day cycle that drives the farm: advance the clock,
//! run every facility's day, sweep the dead, and redistribute warehouse
//! stock.
//!
//! # Modules
//!
//! - [`clock`] -- Day counter with week derivation.
//! - [`config`] -- Configuration loading from `fishfarm-config.yaml` into
//!   strongly-typed structs.
//! - [`tick`] -- [`SimulationState`] and the single-day [`run_day`] driver.
//! - [`runner`] -- The bounded multi-day loop with per-day callbacks.
//! - [`snapshot`] -- Flat, serializable save and restore.
//!
//! [`SimulationState`]: tick::SimulationState
//! [`run_day`]: tick::run_day

pub mod clock;
pub mod config;
pub mod runner;
pub mod snapshot;
pub mod tick;
