//! Tanks: fixed-capacity, single-species fish containers.
//!
//! The first fish to enter a tank binds it to that fish's species. Every
//! later fish must be of the same species, and the tank never holds more
//! fish (living or dead) than its capacity.
//!
//! One day in a tank runs in this order:
//!
//! 1. Reset `fed` on every fish.
//! 2. Feed each living fish from the pantry.
//! 3. Grow each living fish.
//! 4. Reproduce.
//! 5. Harvest fish that reached sale age.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fishfarm_ledger::CoinLedger;
use fishfarm_types::{Sex, Species, TankId};

use crate::config::LifecycleConfig;
use crate::diet;
use crate::error::FarmError;
use crate::fish::Fish;
use crate::food::Pantry;

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Outcome of the feeding phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingReport {
    /// Living fish that ended up fed.
    pub fed: u32,
    /// Living fish that found no food.
    pub starved: u32,
    /// Food units consumed.
    pub units_eaten: u32,
}

/// Outcome of the harvest phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestReport {
    /// Fish removed from the tank for sale.
    pub fish_sold: u32,
    /// Coins credited for them.
    pub coins_earned: u64,
}

/// Everything that happened in one tank during one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankDayReport {
    /// Feeding outcome.
    pub feeding: FeedingReport,
    /// Fish that died while growing.
    pub fish_died: u32,
    /// Fish that became fertile.
    pub became_fertile: u32,
    /// Offspring born.
    pub births: u32,
    /// Harvest outcome.
    pub harvest: HarvestReport,
}

/// Point-in-time counts for a tank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankStats {
    /// Tank capacity.
    pub capacity: u32,
    /// Bound species name, if any.
    pub species: Option<String>,
    /// Living fish.
    pub alive: u32,
    /// Dead fish not yet removed.
    pub dead: u32,
    /// Living males.
    pub males: u32,
    /// Living females.
    pub females: u32,
    /// Living fertile fish.
    pub fertile: u32,
    /// Living mature fish.
    pub mature: u32,
    /// Living fed fish.
    pub fed: u32,
}

// ---------------------------------------------------------------------------
// Tank
// ---------------------------------------------------------------------------

/// A single-species fish container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tank {
    id: TankId,
    capacity: u32,
    species: Option<Arc<Species>>,
    fish: Vec<Fish>,
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl Tank {
    /// Create an empty, unbound tank.
    pub fn new(capacity: u32) -> Self {
        Self::with_id(TankId::new(), capacity)
    }

    /// Create an empty, unbound tank with a known ID.
    pub const fn with_id(id: TankId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            species: None,
            fish: Vec::new(),
        }
    }

    /// Rebuild a tank from saved parts, checking capacity and homogeneity.
    pub fn from_parts(
        id: TankId,
        capacity: u32,
        species: Option<Arc<Species>>,
        fish: Vec<Fish>,
    ) -> Result<Self, FarmError> {
        if count(fish.len()) > capacity {
            return Err(FarmError::TankFull { tank: id, capacity });
        }
        if let Some(bound) = &species {
            if let Some(stray) = fish.iter().find(|f| !f.species().same_species(bound)) {
                return Err(FarmError::SpeciesMismatch {
                    tank: id,
                    expected: bound.name.clone(),
                    actual: stray.species().name.clone(),
                });
            }
        } else if !fish.is_empty() {
            return Err(FarmError::TankNotEmpty { tank: id });
        }
        Ok(Self {
            id,
            capacity,
            species,
            fish,
        })
    }

    /// Tank ID.
    pub const fn id(&self) -> TankId {
        self.id
    }

    /// Maximum number of fish.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Change the capacity. Fails if the current fish would not fit.
    pub fn set_capacity(&mut self, capacity: u32) -> Result<(), FarmError> {
        if self.occupancy() > capacity {
            return Err(FarmError::TankFull {
                tank: self.id,
                capacity,
            });
        }
        self.capacity = capacity;
        Ok(())
    }

    /// The species this tank is bound to.
    pub const fn species(&self) -> Option<&Arc<Species>> {
        self.species.as_ref()
    }

    /// All fish, living and dead, in insertion order.
    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    /// Number of fish held, including dead ones.
    pub fn occupancy(&self) -> u32 {
        count(self.fish.len())
    }

    /// Whether no more fish fit.
    pub fn is_full(&self) -> bool {
        self.occupancy() >= self.capacity
    }

    /// Whether the tank holds no fish.
    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    /// Number of living fish.
    pub fn living_count(&self) -> u32 {
        count(self.fish.iter().filter(|f| f.is_alive()).count())
    }

    /// Number of dead fish awaiting removal.
    pub fn dead_count(&self) -> u32 {
        count(self.fish.iter().filter(|f| !f.is_alive()).count())
    }

    /// Number of living fish of the given sex.
    pub fn living_of_sex(&self, sex: Sex) -> u32 {
        count(
            self.fish
                .iter()
                .filter(|f| f.is_alive() && f.sex() == sex)
                .count(),
        )
    }

    /// Check whether a fish of `species` could be added right now.
    pub fn can_accept(&self, species: &Species) -> Result<(), FarmError> {
        if self.is_full() {
            return Err(FarmError::TankFull {
                tank: self.id,
                capacity: self.capacity,
            });
        }
        if let Some(bound) = &self.species {
            if !bound.same_species(species) {
                return Err(FarmError::SpeciesMismatch {
                    tank: self.id,
                    expected: bound.name.clone(),
                    actual: species.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Add a fish, binding the tank's species if it is unbound.
    pub fn add_fish(&mut self, fish: Fish) -> Result<(), FarmError> {
        self.can_accept(fish.species())?;
        if self.species.is_none() {
            self.species = Some(Arc::clone(fish.species()));
        }
        self.fish.push(fish);
        Ok(())
    }

    /// Unbind the species of an empty tank.
    pub fn reset_species(&mut self) -> Result<(), FarmError> {
        if !self.fish.is_empty() {
            return Err(FarmError::TankNotEmpty { tank: self.id });
        }
        self.species = None;
        Ok(())
    }

    /// Remove dead fish, returning how many were removed.
    pub fn remove_dead(&mut self) -> u32 {
        let before = self.fish.len();
        self.fish.retain(Fish::is_alive);
        count(before.saturating_sub(self.fish.len()))
    }

    /// Mark every fish unfed. Runs at the start of each day.
    pub fn reset_feeding(&mut self) {
        for fish in &mut self.fish {
            fish.set_fed(false);
        }
    }

    /// Feed every living fish according to its diet.
    pub fn feed_all(
        &mut self,
        pantry: &mut Pantry<'_>,
        rng: &mut impl Rng,
        config: &LifecycleConfig,
    ) -> FeedingReport {
        let mut report = FeedingReport::default();
        for fish in self.fish.iter_mut().filter(|f| f.is_alive()) {
            let meal = diet::feed(fish.species().diet_class, pantry, rng, config);
            fish.set_fed(meal.is_fed());
            if meal.is_fed() {
                report.fed = report.fed.saturating_add(1);
            } else {
                report.starved = report.starved.saturating_add(1);
            }
            report.units_eaten = report.units_eaten.saturating_add(meal.units());
        }
        report
    }

    /// Grow every living fish. Returns `(deaths, newly_fertile)`.
    pub fn grow_all(&mut self, rng: &mut impl Rng, config: &LifecycleConfig) -> (u32, u32) {
        let mut deaths = 0_u32;
        let mut fertile = 0_u32;
        for fish in self.fish.iter_mut().filter(|f| f.is_alive()) {
            let result = fish.grow(rng, config);
            if let Some(cause) = result.death {
                debug!(tank = %self.id, species = %fish.species().name, age = fish.age(), %cause, "fish died");
                deaths = deaths.saturating_add(1);
            }
            if result.became_fertile {
                fertile = fertile.saturating_add(1);
            }
        }
        (deaths, fertile)
    }

    /// Spawn offspring from fertile females, if a fertile male is present.
    ///
    /// Each fertile female produces up to `eggs_per_reproduction` young,
    /// stopping when the tank fills. Each newborn takes whichever sex is
    /// not ahead among living fish, with ties going to male. Every female
    /// that spawned then loses fertility and restarts her cycle.
    ///
    /// Returns the number of births.
    pub fn reproduce(&mut self) -> u32 {
        let Some(species) = self.species.clone() else {
            return 0;
        };

        let has_father = self
            .fish
            .iter()
            .any(|f| f.is_alive() && f.is_fertile() && f.sex() == Sex::Male);
        if !has_father {
            return 0;
        }

        let mothers: Vec<usize> = self
            .fish
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_alive() && f.is_fertile() && f.sex() == Sex::Female)
            .map(|(index, _)| index)
            .collect();

        let mut males = self.living_of_sex(Sex::Male);
        let mut females = self.living_of_sex(Sex::Female);
        let mut births = 0_u32;

        for index in mothers {
            for _ in 0..species.eggs_per_reproduction {
                if self.is_full() {
                    break;
                }
                let sex = if males <= females {
                    males = males.saturating_add(1);
                    Sex::Male
                } else {
                    females = females.saturating_add(1);
                    Sex::Female
                };
                self.fish.push(Fish::new(Arc::clone(&species), sex));
                births = births.saturating_add(1);
            }
            if let Some(mother) = self.fish.get_mut(index) {
                mother.finish_spawning();
            }
        }

        if births > 0 {
            debug!(tank = %self.id, species = %species.name, births, "fish spawned");
        }
        births
    }

    /// Sell every fish that reached its sale age.
    ///
    /// Sold fish leave the tank even if the ledger rejects the credit; such
    /// sales earn nothing and are logged.
    pub fn harvest(&mut self, ledger: &mut dyn CoinLedger) -> HarvestReport {
        let (sold, kept): (Vec<Fish>, Vec<Fish>) = std::mem::take(&mut self.fish)
            .into_iter()
            .partition(Fish::is_harvestable);
        self.fish = kept;

        let mut report = HarvestReport::default();
        for fish in sold {
            let species = fish.species();
            report.fish_sold = report.fish_sold.saturating_add(1);
            match ledger.record_sale(species.sale_value, &species.name) {
                Ok(_) => {
                    report.coins_earned = report.coins_earned.saturating_add(species.sale_value);
                }
                Err(error) => {
                    warn!(tank = %self.id, species = %species.name, %error, "sale not credited");
                }
            }
        }
        report
    }

    /// Run one full day in this tank.
    pub fn advance_day(
        &mut self,
        pantry: &mut Pantry<'_>,
        ledger: &mut dyn CoinLedger,
        rng: &mut impl Rng,
        config: &LifecycleConfig,
    ) -> TankDayReport {
        self.reset_feeding();
        let feeding = self.feed_all(pantry, rng, config);
        let (fish_died, became_fertile) = self.grow_all(rng, config);
        let births = self.reproduce();
        let harvest = self.harvest(ledger);

        TankDayReport {
            feeding,
            fish_died,
            became_fertile,
            births,
            harvest,
        }
    }

    /// Current counts.
    pub fn stats(&self) -> TankStats {
        let mut stats = TankStats {
            capacity: self.capacity,
            species: self.species.as_ref().map(|s| s.name.clone()),
            ..TankStats::default()
        };
        for fish in &self.fish {
            if !fish.is_alive() {
                stats.dead = stats.dead.saturating_add(1);
                continue;
            }
            stats.alive = stats.alive.saturating_add(1);
            match fish.sex() {
                Sex::Male => stats.males = stats.males.saturating_add(1),
                Sex::Female => stats.females = stats.females.saturating_add(1),
            }
            if fish.is_fertile() {
                stats.fertile = stats.fertile.saturating_add(1);
            }
            if fish.is_mature() {
                stats.mature = stats.mature.saturating_add(1);
            }
            if fish.is_fed() {
                stats.fed = stats.fed.saturating_add(1);
            }
        }
        stats
    }
}
