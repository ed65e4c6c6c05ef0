//! Day callback that logs farm activity as the run progresses.

use fishfarm_core::runner::DayCallback;
use fishfarm_core::tick::{DaySummary, SimulationState};
use fishfarm_types::FoodKind;
use tracing::{debug, info};

/// Logs one line per day and a per-facility breakdown every `detail_every`
/// days.
pub struct ReportCallback {
    detail_every: u64,
}

impl ReportCallback {
    /// Create a callback. A `detail_every` of zero disables the breakdown.
    pub const fn new(detail_every: u64) -> Self {
        Self { detail_every }
    }

    fn wants_detail(&self, day: u64) -> bool {
        day.checked_rem(self.detail_every) == Some(0)
    }
}

impl DayCallback for ReportCallback {
    fn on_day(&mut self, summary: &DaySummary, state: &SimulationState) {
        info!(
            day = summary.day,
            living_fish = summary.living_fish,
            births = summary.births,
            died = summary.fish_died,
            sold = summary.fish_sold,
            earned = summary.coins_earned,
            balance = summary.balance,
            "Day"
        );

        for report in &summary.reports {
            let delivered = |kind| {
                summary
                    .distribution
                    .as_ref()
                    .map_or(0, |d| d.delivered_to(report.facility, kind))
            };
            debug!(
                facility = %report.facility,
                fed = report.fed,
                starved = report.starved,
                food_eaten = report.food_eaten,
                delivered_animal = delivered(FoodKind::Animal),
                delivered_vegetal = delivered(FoodKind::Vegetal),
                "Facility day"
            );
        }

        if !self.wants_detail(summary.day) {
            return;
        }
        for facility in &state.facilities {
            let stats = facility.stats();
            info!(
                facility = %stats.name,
                kind = %stats.kind,
                tanks = stats.tanks.len(),
                alive = stats.alive,
                males = stats.males,
                females = stats.females,
                mature = stats.mature,
                fertile = stats.fertile,
                food_animal = stats.food_animal,
                food_vegetal = stats.food_vegetal,
                food_capacity = stats.food_capacity,
                "Facility status"
            );
        }
    }
}
