//! The daily tick: one simulated day across the whole farm.
//!
//! Each day runs these phases in order:
//!
//! 1. **Clock** -- advance the day counter and stamp it on the ledger.
//! 2. **Restock** -- (optional) buy food for facilities running low.
//! 3. **Facilities** -- every facility runs its day: feed, grow, reproduce,
//!    harvest. Fish fall back to the warehouse when local food runs out.
//! 4. **Sweep** -- (optional) remove dead fish.
//! 5. **Distribution** -- (optional) the warehouse shares its stock out.
//!
//! The day is deterministic given the same initial state and seed.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use fishfarm_farm::{CentralWarehouse, DayReport, DistributionReport, Facility, FarmError, LifecycleConfig};
use fishfarm_ledger::{CoinLedger, Ledger};
use fishfarm_types::{FoodKind, SpeciesCatalog};

use crate::clock::{ClockError, SimulationClock};
use crate::config::{ConfigError, FacilityConfig, SimulationConfig};

/// Errors that can occur while building or running the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The configuration could not be used.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A facility could not be set up.
    #[error("facility {facility}: {source}")]
    Farm {
        /// The facility being built.
        facility: String,
        /// The underlying farm error.
        source: FarmError,
    },

    /// A species name is not in the catalog.
    #[error("unknown species: {name}")]
    UnknownSpecies {
        /// The name that was looked up.
        name: String,
    },
}

/// Switches for the optional day phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DayOptions {
    /// Run warehouse distribution at the end of the day.
    pub distribute_daily: bool,
    /// Remove dead fish at the end of the day.
    pub clear_dead_daily: bool,
    /// Stop the runner once no living fish remain.
    pub stop_on_extinction: bool,
    /// Buy food for facilities below half capacity at the start of the day.
    pub auto_restock: bool,
    /// Price of one food unit when restocking.
    pub food_cost_per_unit: u64,
}

impl Default for DayOptions {
    fn default() -> Self {
        Self {
            distribute_daily: true,
            clear_dead_daily: true,
            stop_on_extinction: false,
            auto_restock: false,
            food_cost_per_unit: 1,
        }
    }
}

/// Summary of a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    /// The day that ran.
    pub day: u64,
    /// Per-facility reports, in facility order.
    pub reports: Vec<DayReport>,
    /// Fish harvested across the farm.
    pub fish_sold: u32,
    /// Coins earned from harvests.
    pub coins_earned: u64,
    /// Fish that died.
    pub fish_died: u32,
    /// Offspring born.
    pub births: u32,
    /// Dead fish removed by the sweep.
    pub dead_removed: u32,
    /// Coins spent on restocking.
    pub restock_spent: u64,
    /// Warehouse distribution, if it ran.
    pub distribution: Option<DistributionReport>,
    /// Living fish at the end of the day.
    pub living_fish: u32,
    /// Ledger balance at the end of the day.
    pub balance: u64,
}

/// The mutable simulation state passed through the daily tick.
#[derive(Debug)]
pub struct SimulationState {
    /// The day counter.
    pub clock: SimulationClock,
    /// Facilities, in order.
    pub facilities: Vec<Facility>,
    /// The shared warehouse, if the farm has one.
    pub warehouse: Option<CentralWarehouse>,
    /// The coin ledger.
    pub ledger: Ledger,
    /// Seed the random stream was created from.
    pub seed: u64,
    /// The random stream.
    pub rng: StdRng,
    /// Lifecycle probabilities.
    pub lifecycle: LifecycleConfig,
    /// Known species.
    pub catalog: SpeciesCatalog,
    /// Optional day phases.
    pub options: DayOptions,
}

impl SimulationState {
    /// Build the day-0 state described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::UnknownSpecies`] for stock naming a species
    /// not in the catalog, and [`SimulationError::Farm`] when stock or food
    /// does not fit its facility.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut catalog = SpeciesCatalog::builtin();
        for species in &config.species {
            if catalog.insert(species.clone()).is_some() {
                debug!(species = %species.name, "built-in species overridden");
            }
        }

        let facilities = config
            .facilities
            .iter()
            .map(|fc| build_facility(fc, &catalog))
            .collect::<Result<Vec<_>, _>>()?;

        let warehouse = if config.warehouse.enabled {
            let mut warehouse = CentralWarehouse::new(config.warehouse.capacity);
            let setup = |source| SimulationError::Farm {
                facility: "warehouse".to_owned(),
                source,
            };
            warehouse
                .set_stored(FoodKind::Animal, config.warehouse.animal)
                .map_err(setup)?;
            warehouse
                .set_stored(FoodKind::Vegetal, config.warehouse.vegetal)
                .map_err(setup)?;
            Some(warehouse)
        } else {
            None
        };

        let options = DayOptions {
            distribute_daily: config.simulation.distribute_daily,
            clear_dead_daily: config.simulation.clear_dead_daily,
            stop_on_extinction: config.simulation.stop_on_extinction,
            auto_restock: config.economy.auto_restock,
            food_cost_per_unit: config.economy.food_cost_per_unit,
        };

        info!(
            name = %config.world.name,
            seed = config.world.seed,
            facilities = facilities.len(),
            warehouse = warehouse.is_some(),
            starting_coins = config.economy.starting_coins,
            "Farm built"
        );

        Ok(Self {
            clock: SimulationClock::new(),
            facilities,
            warehouse,
            ledger: Ledger::new(config.economy.starting_coins),
            seed: config.world.seed,
            rng: StdRng::seed_from_u64(config.world.seed),
            lifecycle: config.lifecycle.clone(),
            catalog,
            options,
        })
    }

    /// Living fish across all facilities.
    pub fn living_fish(&self) -> u32 {
        self.facilities
            .iter()
            .fold(0_u32, |acc, f| acc.saturating_add(f.living_count()))
    }
}

/// Build one facility from its config entry.
fn build_facility(config: &FacilityConfig, catalog: &SpeciesCatalog) -> Result<Facility, SimulationError> {
    let farm_err = |source| SimulationError::Farm {
        facility: config.name.clone(),
        source,
    };

    let mut facility = Facility::new(config.name.clone(), config.kind);
    for _ in 1..config.tanks {
        facility.add_tank();
    }
    if let Some(capacity) = config.tank_capacity {
        for index in 0..facility.tanks().len() {
            if let Some(tank) = facility.tank_mut(index) {
                tank.set_capacity(capacity).map_err(farm_err)?;
            }
        }
    }
    if let Some(capacity) = config.food_capacity {
        facility.food_mut().set_capacity(capacity).map_err(farm_err)?;
    }
    facility
        .food_mut()
        .set_stored(FoodKind::Animal, config.food_animal)
        .map_err(farm_err)?;
    facility
        .food_mut()
        .set_stored(FoodKind::Vegetal, config.food_vegetal)
        .map_err(farm_err)?;

    for stock in &config.stock {
        let species = catalog
            .get(&stock.species)
            .ok_or_else(|| SimulationError::UnknownSpecies {
                name: stock.species.clone(),
            })?;
        for sex in stock.sexes() {
            facility
                .stock_fish(stock.tank, Arc::clone(&species), sex)
                .map_err(farm_err)?;
        }
    }

    Ok(facility)
}

/// Execute one complete day of the simulation.
///
/// # Errors
///
/// Returns [`SimulationError::Clock`] if the day counter overflows. Nothing
/// else aborts a day: rejected purchases and failed feedings are part of
/// normal play.
pub fn run_day(state: &mut SimulationState) -> Result<DaySummary, SimulationError> {
    // --- Phase 1: Clock ---
    let day = state.clock.advance()?;
    state.ledger.set_day(day);

    // --- Phase 2: Restock ---
    let restock_spent = if state.options.auto_restock {
        phase_restock(state)
    } else {
        0
    };

    // --- Phase 3: Facilities ---
    let mut reports = Vec::with_capacity(state.facilities.len());
    for facility in &mut state.facilities {
        let report = facility.advance_day(
            state.warehouse.as_mut(),
            &mut state.ledger,
            &mut state.rng,
            &state.lifecycle,
        );
        reports.push(report);
    }

    // --- Phase 4: Sweep ---
    let dead_removed = if state.options.clear_dead_daily {
        state
            .facilities
            .iter_mut()
            .fold(0_u32, |acc, f| acc.saturating_add(f.remove_dead()))
    } else {
        0
    };

    // --- Phase 5: Distribution ---
    let distribution = match (&mut state.warehouse, state.options.distribute_daily) {
        (Some(warehouse), true) => Some(warehouse.distribute(&mut state.facilities)),
        _ => None,
    };

    let mut summary = DaySummary {
        day,
        fish_sold: 0,
        coins_earned: 0,
        fish_died: 0,
        births: 0,
        dead_removed,
        restock_spent,
        distribution,
        living_fish: state.living_fish(),
        balance: state.ledger.balance(),
        reports: Vec::new(),
    };
    for report in &reports {
        summary.fish_sold = summary.fish_sold.saturating_add(report.fish_sold);
        summary.coins_earned = summary.coins_earned.saturating_add(report.coins_earned);
        summary.fish_died = summary.fish_died.saturating_add(report.fish_died);
        summary.births = summary.births.saturating_add(report.births);
    }
    summary.reports = reports;

    info!(
        day,
        fish_sold = summary.fish_sold,
        coins_earned = summary.coins_earned,
        fish_died = summary.fish_died,
        births = summary.births,
        living_fish = summary.living_fish,
        balance = summary.balance,
        "Day complete"
    );

    Ok(summary)
}

/// Phase 2: buy food for every facility whose stock of a kind is below half
/// its capacity, filling it up as far as the balance allows.
///
/// Returns the coins spent.
fn phase_restock(state: &mut SimulationState) -> u64 {
    let price = state.options.food_cost_per_unit;
    let mut spent = 0_u64;

    for facility in &mut state.facilities {
        for kind in FoodKind::ALL {
            let capacity = facility.food().capacity();
            if facility.food().stored(kind).saturating_mul(2) >= capacity {
                continue;
            }
            let wanted = facility.food_headroom(kind);
            let affordable = state
                .ledger
                .balance()
                .checked_div(price)
                .map_or(wanted, |units| u32::try_from(units).unwrap_or(u32::MAX));
            let amount = wanted.min(affordable);
            if amount == 0 {
                continue;
            }
            match facility.buy_food(kind, amount, price, &mut state.ledger) {
                Ok(cost) => spent = spent.saturating_add(cost),
                Err(error) => {
                    warn!(facility = %facility.id(), %kind, amount, %error, "restock failed");
                }
            }
        }
    }

    spent
}
