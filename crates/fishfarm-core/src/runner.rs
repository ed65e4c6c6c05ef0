//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`run_day`] for a fixed number of days and
//! stops early on extinction when the state asks it to. A [`DayCallback`]
//! sees every summary as it is produced.
//!
//! [`run_day`]: crate::tick::run_day

use fishfarm_ledger::CoinLedger;
use tracing::{info, warn};

use crate::tick::{self, DaySummary, SimulationError, SimulationState};

/// Why the simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The requested number of days ran.
    DayLimitReached,
    /// No living fish remained and the state was set to stop on extinction.
    Extinction,
}

/// Farm-wide totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Fish harvested.
    pub fish_sold: u64,
    /// Coins earned from harvests.
    pub coins_earned: u64,
    /// Fish that died.
    pub fish_died: u64,
    /// Offspring born.
    pub births: u64,
    /// Coins spent restocking food.
    pub restock_spent: u64,
}

impl RunTotals {
    fn add(&mut self, summary: &DaySummary) {
        self.fish_sold = self.fish_sold.saturating_add(u64::from(summary.fish_sold));
        self.coins_earned = self.coins_earned.saturating_add(summary.coins_earned);
        self.fish_died = self.fish_died.saturating_add(u64::from(summary.fish_died));
        self.births = self.births.saturating_add(u64::from(summary.births));
        self.restock_spent = self.restock_spent.saturating_add(summary.restock_spent);
    }
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last day summary, if any day ran.
    pub final_summary: Option<DaySummary>,
    /// Number of days executed.
    pub total_days: u64,
    /// Totals across all days.
    pub totals: RunTotals,
}

/// Callback invoked after each day completes.
pub trait DayCallback {
    /// Called after a day completes successfully.
    fn on_day(&mut self, summary: &DaySummary, state: &SimulationState);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl DayCallback for NoOpCallback {
    fn on_day(&mut self, _summary: &DaySummary, _state: &SimulationState) {}
}

/// Run up to `days` days.
///
/// # Errors
///
/// Returns [`SimulationError`] if a day fails unrecoverably (the day
/// counter overflowing is the only such case).
pub fn run_simulation(
    state: &mut SimulationState,
    days: u64,
    callback: &mut dyn DayCallback,
) -> Result<SimulationResult, SimulationError> {
    let mut final_summary: Option<DaySummary> = None;
    let mut total_days: u64 = 0;
    let mut totals = RunTotals::default();

    info!(
        start_day = state.clock.day(),
        days,
        facilities = state.facilities.len(),
        living_fish = state.living_fish(),
        balance = state.ledger.balance(),
        "Simulation starting"
    );

    while total_days < days {
        let summary = tick::run_day(state)?;
        total_days = total_days.saturating_add(1);
        totals.add(&summary);

        callback.on_day(&summary, state);

        if state.clock.is_end_of_week() {
            info!(
                week = state.clock.week(),
                fish_sold = totals.fish_sold,
                births = totals.births,
                living_fish = summary.living_fish,
                balance = summary.balance,
                "Week complete"
            );
        }

        let extinct = summary.living_fish == 0;
        final_summary = Some(summary);

        if extinct && state.options.stop_on_extinction {
            info!(day = state.clock.day(), "No living fish left -- extinction");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Extinction,
                final_summary,
                total_days,
                totals,
            });
        }
    }

    Ok(SimulationResult {
        end_reason: SimulationEndReason::DayLimitReached,
        final_summary,
        total_days,
        totals,
    })
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_days = result.total_days,
        fish_sold = result.totals.fish_sold,
        coins_earned = result.totals.coins_earned,
        fish_died = result.totals.fish_died,
        births = result.totals.births,
        restock_spent = result.totals.restock_spent,
        "Simulation ended"
    );

    if let Some(summary) = &result.final_summary {
        info!(
            day = summary.day,
            living_fish = summary.living_fish,
            balance = summary.balance,
            "Final day summary"
        );
    } else {
        warn!("Simulation ended with no days executed");
    }
}
