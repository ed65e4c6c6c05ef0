//! A single fish and its daily lifecycle.
//!
//! Lifecycle: `Immature -> Mature (non-fertile) -> Mature (fertile) -> Dead`.
//!
//! [`Fish::grow`] runs once per day for every living fish, after feeding:
//!
//! 1. An unfed fish dies with `unfed_death_chance`. A fish that dies stops here.
//! 2. The survivor ages by one day.
//! 3. Once `age >= maturity_age` the fish is mature. While not fertile its
//!    cycle counter ticks down; at zero it becomes fertile and stays fertile
//!    until it spawns.
//! 4. An immature fish is never fertile.
//! 5. An immature fish on an even age dies with `juvenile_death_chance`,
//!    rolled independently of step 1.
//!
//! Harvesting is not a state: sold fish simply leave their tank.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use fishfarm_types::{Sex, Species};

use crate::config::{LifecycleConfig, chance};

/// The cause of a fish's death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// The fish went unfed and did not survive the day.
    Starvation,
    /// Early-life mortality of an immature fish.
    Juvenile,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::Juvenile => write!(f, "juvenile"),
        }
    }
}

/// Result of one day of growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthResult {
    /// If the fish died during this day, the cause.
    pub death: Option<DeathCause>,
    /// Whether the fish became fertile during this day.
    pub became_fertile: bool,
}

/// The mutable lifecycle fields of a fish, without its species.
///
/// This is the flat form used to save and restore fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishState {
    /// Age in days.
    pub age: u32,
    /// Biological sex.
    pub sex: Sex,
    /// Whether the fish is alive.
    pub alive: bool,
    /// Whether the fish has eaten today.
    pub fed: bool,
    /// Whether the fish can spawn.
    pub fertile: bool,
    /// Whether the fish has reached maturity.
    pub mature: bool,
    /// Days left until the next fertility event.
    pub cycle_counter: u32,
}

/// A single fish owned by a tank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fish {
    species: Arc<Species>,
    age: u32,
    sex: Sex,
    alive: bool,
    fed: bool,
    fertile: bool,
    mature: bool,
    cycle_counter: u32,
}

impl Fish {
    /// Create a newborn fish: age 0, alive, unfed, immature, not fertile,
    /// with a full reproduction cycle ahead of it.
    pub fn new(species: Arc<Species>, sex: Sex) -> Self {
        let cycle_counter = species.reproduction_cycle_length;
        Self {
            species,
            age: 0,
            sex,
            alive: true,
            fed: false,
            fertile: false,
            mature: false,
            cycle_counter,
        }
    }

    /// Rebuild a fish from its saved state.
    pub fn from_state(species: Arc<Species>, state: FishState) -> Self {
        Self {
            species,
            age: state.age,
            sex: state.sex,
            alive: state.alive,
            fed: state.fed,
            fertile: state.fertile,
            mature: state.mature,
            cycle_counter: state.cycle_counter,
        }
    }

    /// Flatten the mutable fields for saving.
    pub const fn state(&self) -> FishState {
        FishState {
            age: self.age,
            sex: self.sex,
            alive: self.alive,
            fed: self.fed,
            fertile: self.fertile,
            mature: self.mature,
            cycle_counter: self.cycle_counter,
        }
    }

    /// The fish's species.
    pub const fn species(&self) -> &Arc<Species> {
        &self.species
    }

    /// Age in days.
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Biological sex.
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// Whether the fish is alive.
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the fish has eaten today.
    pub const fn is_fed(&self) -> bool {
        self.fed
    }

    /// Whether the fish can spawn.
    pub const fn is_fertile(&self) -> bool {
        self.fertile
    }

    /// Whether the fish has reached maturity.
    pub const fn is_mature(&self) -> bool {
        self.mature
    }

    /// Days left until the next fertility event.
    pub const fn cycle_counter(&self) -> u32 {
        self.cycle_counter
    }

    /// Whether the fish is old enough to be sold.
    pub fn is_harvestable(&self) -> bool {
        self.alive && self.age >= self.species.sale_age_threshold
    }

    /// Set the age in days.
    pub const fn set_age(&mut self, age: u32) {
        self.age = age;
    }

    /// Set whether the fish is alive.
    pub const fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Set whether the fish has eaten today.
    pub const fn set_fed(&mut self, fed: bool) {
        self.fed = fed;
    }

    /// Set whether the fish can spawn.
    pub const fn set_fertile(&mut self, fertile: bool) {
        self.fertile = fertile;
    }

    /// Set whether the fish has reached maturity.
    pub const fn set_mature(&mut self, mature: bool) {
        self.mature = mature;
    }

    /// Set the days left until the next fertility event.
    pub const fn set_cycle_counter(&mut self, cycle_counter: u32) {
        self.cycle_counter = cycle_counter;
    }

    /// Mark the fish dead.
    pub const fn kill(&mut self) {
        self.alive = false;
        self.fertile = false;
    }

    /// Apply one day of growth.
    ///
    /// Dead fish are left untouched. See the module docs for the order of
    /// operations.
    pub fn grow(&mut self, rng: &mut impl Rng, config: &LifecycleConfig) -> GrowthResult {
        let mut result = GrowthResult {
            death: None,
            became_fertile: false,
        };

        if !self.alive {
            return result;
        }

        // 1. Starvation
        if !self.fed && chance(rng, config.unfed_death_chance) {
            self.kill();
            result.death = Some(DeathCause::Starvation);
            return result;
        }

        // 2. Aging
        self.age = self.age.saturating_add(1);

        // 3-4. Maturity and the fertility cycle
        if self.age >= self.species.maturity_age {
            self.mature = true;
            if !self.fertile {
                self.cycle_counter = self.cycle_counter.saturating_sub(1);
                if self.cycle_counter == 0 {
                    self.fertile = true;
                    result.became_fertile = true;
                }
            }
        } else {
            self.fertile = false;

            // 5. Juvenile mortality
            if self.age % 2 == 0 && chance(rng, config.juvenile_death_chance) {
                self.kill();
                result.death = Some(DeathCause::Juvenile);
            }
        }

        result
    }

    /// End a fertile period after spawning: the fish loses fertility and
    /// its cycle counter restarts from the species cycle length.
    pub fn finish_spawning(&mut self) {
        self.fertile = false;
        self.cycle_counter = self.species.reproduction_cycle_length;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use fishfarm_types::{DietClass, Habitat};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    /// Carpa-like test species: matures at 5, cycle 3, 4 eggs, sold at 12.
    pub(crate) fn carpa() -> Arc<Species> {
        Arc::new(Species {
            name: "Carpa".to_owned(),
            scientific_name: "Cyprinus carpio".to_owned(),
            maturity_age: 5,
            reproduction_cycle_length: 3,
            eggs_per_reproduction: 4,
            diet_class: DietClass::Omnivore,
            purchase_cost: 20,
            sale_value: 40,
            sale_age_threshold: 12,
            habitat: Habitat::River,
        })
    }

    fn fed_grow(fish: &mut Fish, rng: &mut SmallRng, cfg: &LifecycleConfig) -> GrowthResult {
        fish.set_fed(true);
        fish.grow(rng, cfg)
    }

    #[test]
    fn newborn_defaults() {
        let fish = Fish::new(carpa(), Sex::Female);
        assert_eq!(fish.age(), 0);
        assert!(fish.is_alive());
        assert!(!fish.is_fed());
        assert!(!fish.is_fertile());
        assert!(!fish.is_mature());
        assert_eq!(fish.cycle_counter(), 3);
    }

    #[test]
    fn fed_fish_ages_one_day() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cfg = LifecycleConfig::deterministic();
        let mut fish = Fish::new(carpa(), Sex::Male);
        let result = fed_grow(&mut fish, &mut rng, &cfg);
        assert_eq!(result.death, None);
        assert_eq!(fish.age(), 1);
    }

    #[test]
    fn matures_at_maturity_age_and_becomes_fertile_after_cycle() {
        let mut rng = SmallRng::seed_from_u64(2);
        let cfg = LifecycleConfig::deterministic();
        let mut fish = Fish::new(carpa(), Sex::Female);

        for _ in 0..4 {
            let _ = fed_grow(&mut fish, &mut rng, &cfg);
        }
        assert_eq!(fish.age(), 4);
        assert!(!fish.is_mature());
        assert_eq!(fish.cycle_counter(), 3);

        // Day 5: mature, counter 3 -> 2
        let _ = fed_grow(&mut fish, &mut rng, &cfg);
        assert!(fish.is_mature());
        assert!(!fish.is_fertile());
        assert_eq!(fish.cycle_counter(), 2);

        // Day 6: counter 1
        let _ = fed_grow(&mut fish, &mut rng, &cfg);
        assert!(!fish.is_fertile());

        // Day 7: counter 0 -> fertile
        let result = fed_grow(&mut fish, &mut rng, &cfg);
        assert!(result.became_fertile);
        assert!(fish.is_fertile());
    }

    #[test]
    fn fertility_persists_until_spawning() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cfg = LifecycleConfig::deterministic();
        let mut fish = Fish::new(carpa(), Sex::Female);
        fish.set_age(10);
        fish.set_mature(true);
        fish.set_fertile(true);
        fish.set_cycle_counter(0);

        let result = fed_grow(&mut fish, &mut rng, &cfg);
        assert!(!result.became_fertile);
        assert!(fish.is_fertile());
        assert_eq!(fish.cycle_counter(), 0);

        fish.finish_spawning();
        assert!(!fish.is_fertile());
        assert_eq!(fish.cycle_counter(), 3);
    }

    #[test]
    fn immature_fish_is_never_fertile() {
        let mut rng = SmallRng::seed_from_u64(4);
        let cfg = LifecycleConfig::deterministic();
        let mut fish = Fish::new(carpa(), Sex::Female);
        fish.set_fertile(true);
        let _ = fed_grow(&mut fish, &mut rng, &cfg);
        assert!(!fish.is_fertile());
    }

    #[test]
    fn unfed_fish_dies_when_chance_is_certain() {
        let mut rng = SmallRng::seed_from_u64(5);
        let cfg = LifecycleConfig {
            unfed_death_chance: 1.0,
            ..LifecycleConfig::deterministic()
        };
        let mut fish = Fish::new(carpa(), Sex::Male);
        let result = fish.grow(&mut rng, &cfg);
        assert_eq!(result.death, Some(DeathCause::Starvation));
        assert!(!fish.is_alive());
        assert_eq!(fish.age(), 0, "a fish that starves does not age");
    }

    #[test]
    fn unfed_survivor_still_ages() {
        let mut rng = SmallRng::seed_from_u64(6);
        let cfg = LifecycleConfig::deterministic();
        let mut fish = Fish::new(carpa(), Sex::Male);
        let result = fish.grow(&mut rng, &cfg);
        assert_eq!(result.death, None);
        assert_eq!(fish.age(), 1);
    }

    #[test]
    fn juvenile_death_only_on_even_age() {
        let mut rng = SmallRng::seed_from_u64(7);
        let cfg = LifecycleConfig {
            juvenile_death_chance: 1.0,
            ..LifecycleConfig::deterministic()
        };
        let mut fish = Fish::new(carpa(), Sex::Female);

        // Age 0 -> 1: odd, survives.
        let result = fed_grow(&mut fish, &mut rng, &cfg);
        assert_eq!(result.death, None);

        // Age 1 -> 2: even and immature, dies.
        let result = fed_grow(&mut fish, &mut rng, &cfg);
        assert_eq!(result.death, Some(DeathCause::Juvenile));
        assert!(!fish.is_alive());
    }

    #[test]
    fn mature_fish_escapes_juvenile_mortality() {
        let mut rng = SmallRng::seed_from_u64(8);
        let cfg = LifecycleConfig {
            juvenile_death_chance: 1.0,
            ..LifecycleConfig::deterministic()
        };
        let mut fish = Fish::new(carpa(), Sex::Female);
        fish.set_age(5);
        let result = fed_grow(&mut fish, &mut rng, &cfg);
        assert_eq!(fish.age(), 6);
        assert_eq!(result.death, None);
    }

    #[test]
    fn dead_fish_does_not_grow() {
        let mut rng = SmallRng::seed_from_u64(9);
        let cfg = LifecycleConfig::deterministic();
        let mut fish = Fish::new(carpa(), Sex::Male);
        fish.kill();
        let result = fed_grow(&mut fish, &mut rng, &cfg);
        assert_eq!(result.death, None);
        assert_eq!(fish.age(), 0);
    }

    #[test]
    fn unfed_death_rate_is_about_half() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        let cfg = LifecycleConfig {
            juvenile_death_chance: 0.0,
            ..LifecycleConfig::default()
        };
        let species = carpa();
        let trials = 100_000_u32;
        let mut deaths = 0_u32;
        for _ in 0..trials {
            let mut fish = Fish::new(Arc::clone(&species), Sex::Male);
            if fish.grow(&mut rng, &cfg).death.is_some() {
                deaths = deaths.saturating_add(1);
            }
        }
        let rate = f64::from(deaths) / f64::from(trials);
        assert!((rate - 0.5).abs() < 0.01, "death rate {rate} too far from 0.5");
    }

    #[test]
    fn harvestable_at_sale_age() {
        let mut fish = Fish::new(carpa(), Sex::Male);
        fish.set_age(11);
        assert!(!fish.is_harvestable());
        fish.set_age(12);
        assert!(fish.is_harvestable());
        fish.kill();
        assert!(!fish.is_harvestable());
    }

    #[test]
    fn state_roundtrip() {
        let mut fish = Fish::new(carpa(), Sex::Female);
        fish.set_age(8);
        fish.set_mature(true);
        fish.set_cycle_counter(1);
        let restored = Fish::from_state(carpa(), fish.state());
        assert_eq!(restored, fish);
    }
}
