//! Facilities: a site's tanks plus its local food reserve.
//!
//! A facility is either a river or a sea site. Its kind fixes the default
//! capacities, the food-capacity upgrade path and which species it can
//! stock. Tanks are kept in order and addressed by position.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use fishfarm_ledger::CoinLedger;
use fishfarm_types::{FacilityId, FacilityKind, FoodKind, Sex, Species, TankId};

use crate::config::LifecycleConfig;
use crate::error::FarmError;
use crate::fish::Fish;
use crate::food::{FoodReserve, Pantry};
use crate::tank::{Tank, TankDayReport, TankStats};
use crate::warehouse::CentralWarehouse;

/// Outcome of one facility day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    /// The facility.
    pub facility: FacilityId,
    /// Fish harvested and removed.
    pub fish_sold: u32,
    /// Coins credited for them.
    pub coins_earned: u64,
    /// Fish that died.
    pub fish_died: u32,
    /// Offspring born.
    pub births: u32,
    /// Living fish that ended up fed.
    pub fed: u32,
    /// Living fish that found no food.
    pub starved: u32,
    /// Food units consumed from either source.
    pub food_eaten: u32,
}

impl DayReport {
    const fn empty(facility: FacilityId) -> Self {
        Self {
            facility,
            fish_sold: 0,
            coins_earned: 0,
            fish_died: 0,
            births: 0,
            fed: 0,
            starved: 0,
            food_eaten: 0,
        }
    }

    fn absorb(&mut self, tank: &TankDayReport) {
        self.fish_sold = self.fish_sold.saturating_add(tank.harvest.fish_sold);
        self.coins_earned = self.coins_earned.saturating_add(tank.harvest.coins_earned);
        self.fish_died = self.fish_died.saturating_add(tank.fish_died);
        self.births = self.births.saturating_add(tank.births);
        self.fed = self.fed.saturating_add(tank.feeding.fed);
        self.starved = self.starved.saturating_add(tank.feeding.starved);
        self.food_eaten = self.food_eaten.saturating_add(tank.feeding.units_eaten);
    }
}

/// Point-in-time summary of a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityStats {
    /// The facility.
    pub facility: FacilityId,
    /// Display name.
    pub name: String,
    /// River or sea.
    pub kind: FacilityKind,
    /// Per-tank counts, in tank order.
    pub tanks: Vec<TankStats>,
    /// Living fish across all tanks.
    pub alive: u32,
    /// Dead fish awaiting removal.
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
    /// Animal food stored.
    pub food_animal: u32,
    /// Vegetal food stored.
    pub food_vegetal: u32,
    /// Food capacity per kind.
    pub food_capacity: u32,
}

/// A farm site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facility {
    id: FacilityId,
    name: String,
    kind: FacilityKind,
    food: FoodReserve,
    tanks: Vec<Tank>,
}

impl Facility {
    /// Create a facility with one empty default-sized tank and an empty
    /// default-sized food reserve.
    pub fn new(name: impl Into<String>, kind: FacilityKind) -> Self {
        Self {
            id: FacilityId::new(),
            name: name.into(),
            kind,
            food: FoodReserve::new(kind.default_food_capacity()),
            tanks: vec![Tank::new(kind.default_tank_capacity())],
        }
    }

    /// Rebuild a facility from saved parts.
    pub const fn from_parts(
        id: FacilityId,
        name: String,
        kind: FacilityKind,
        food: FoodReserve,
        tanks: Vec<Tank>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            food,
            tanks,
        }
    }

    /// Facility ID.
    pub const fn id(&self) -> FacilityId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// River or sea.
    pub const fn kind(&self) -> FacilityKind {
        self.kind
    }

    /// The local food reserve.
    pub const fn food(&self) -> &FoodReserve {
        &self.food
    }

    /// Mutable access to the local food reserve.
    pub const fn food_mut(&mut self) -> &mut FoodReserve {
        &mut self.food
    }

    /// Units of `kind` that still fit in the local reserve.
    pub const fn food_headroom(&self, kind: FoodKind) -> u32 {
        self.food.headroom(kind)
    }

    /// Add food to the local reserve. Fails without mutation if it would
    /// exceed capacity.
    pub fn add_food(&mut self, kind: FoodKind, amount: u32) -> Result<(), FarmError> {
        self.food.add(kind, amount)
    }

    /// Tanks in order.
    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// The tank at `index` (0-based).
    pub fn tank(&self, index: usize) -> Option<&Tank> {
        self.tanks.get(index)
    }

    /// Mutable access to the tank at `index` (0-based).
    pub fn tank_mut(&mut self, index: usize) -> Option<&mut Tank> {
        self.tanks.get_mut(index)
    }

    /// Append an empty tank of the default size for this facility kind.
    pub fn add_tank(&mut self) -> TankId {
        self.add_tank_with_capacity(self.kind.default_tank_capacity())
    }

    /// Append an empty tank with the given capacity.
    pub fn add_tank_with_capacity(&mut self, capacity: u32) -> TankId {
        let tank = Tank::new(capacity);
        let id = tank.id();
        self.tanks.push(tank);
        id
    }

    /// Check that a fish of `species` could enter the tank at `tank_index`:
    /// the habitat suits this facility, the tank exists, has room and holds
    /// the same species (or none yet).
    pub fn can_accept(&self, tank_index: usize, species: &Species) -> Result<(), FarmError> {
        if !self.kind.accepts(species.habitat) {
            return Err(FarmError::HabitatMismatch {
                facility: self.kind,
                species: species.name.clone(),
                habitat: species.habitat,
            });
        }
        self.tanks
            .get(tank_index)
            .ok_or(FarmError::TankNotFound(tank_index))?
            .can_accept(species)
    }

    /// Place a newborn-state fish into the tank at `tank_index` without
    /// paying for it. Used for initial stocking.
    pub fn stock_fish(&mut self, tank_index: usize, species: Arc<Species>, sex: Sex) -> Result<(), FarmError> {
        self.can_accept(tank_index, &species)?;
        self.tanks
            .get_mut(tank_index)
            .ok_or(FarmError::TankNotFound(tank_index))?
            .add_fish(Fish::new(species, sex))
    }

    /// Buy one fish into the tank at `tank_index`.
    ///
    /// Habitat, capacity and species are checked before any coins move.
    pub fn buy_fish(
        &mut self,
        tank_index: usize,
        species: Arc<Species>,
        sex: Sex,
        ledger: &mut dyn CoinLedger,
    ) -> Result<(), FarmError> {
        self.can_accept(tank_index, &species)?;

        if species.purchase_cost > 0 {
            ledger.record_purchase(species.purchase_cost, &species.name)?;
        }
        debug!(facility = %self.id, tank = tank_index, species = %species.name, %sex, "fish bought");
        self.stock_fish(tank_index, species, sex)
    }

    /// Buy `amount` units of food at `cost_per_unit` each.
    ///
    /// Returns the coins spent. Nothing changes unless the food fits and
    /// the ledger covers the cost.
    pub fn buy_food(
        &mut self,
        kind: FoodKind,
        amount: u32,
        cost_per_unit: u64,
        ledger: &mut dyn CoinLedger,
    ) -> Result<u64, FarmError> {
        if amount == 0 {
            return Err(FarmError::ZeroAmount);
        }
        if amount > self.food.headroom(kind) {
            return Err(FarmError::FoodOverCapacity {
                kind,
                attempted: amount,
                stored: self.food.stored(kind),
                capacity: self.food.capacity(),
            });
        }
        let cost = u64::from(amount)
            .checked_mul(cost_per_unit)
            .ok_or_else(|| FarmError::ArithmeticOverflow {
                context: "food purchase cost".to_owned(),
            })?;

        if cost > 0 {
            ledger.record_purchase(cost, &format!("{kind} food"))?;
        }
        self.food.add(kind, amount)?;
        debug!(facility = %self.id, %kind, amount, cost, "food bought");
        Ok(cost)
    }

    /// Raise the food capacity by one step for this facility kind, up to
    /// its ceiling. Returns the new capacity.
    pub fn upgrade_food_capacity(&mut self, cost: u64, ledger: &mut dyn CoinLedger) -> Result<u32, FarmError> {
        let max = self.kind.max_food_capacity();
        let current = self.food.capacity();
        if current >= max {
            return Err(FarmError::UpgradeUnavailable { max });
        }
        let capacity = current
            .saturating_add(self.kind.food_capacity_step())
            .min(max);

        if cost > 0 {
            ledger.spend(cost, "UPGRADE food capacity")?;
        }
        self.food.set_capacity(capacity)?;
        debug!(facility = %self.id, capacity, cost, "food capacity upgraded");
        Ok(capacity)
    }

    /// Run one day in every tank, in order.
    ///
    /// Fish eat from the local reserve first and from `warehouse` when the
    /// local stock runs out.
    pub fn advance_day(
        &mut self,
        warehouse: Option<&mut CentralWarehouse>,
        ledger: &mut dyn CoinLedger,
        rng: &mut impl Rng,
        config: &LifecycleConfig,
    ) -> DayReport {
        let mut report = DayReport::empty(self.id);
        let mut pantry = Pantry::new(&mut self.food, warehouse);

        for tank in &mut self.tanks {
            let tank_report = tank.advance_day(&mut pantry, ledger, rng, config);
            report.absorb(&tank_report);
        }

        debug!(
            facility = %self.id,
            name = %self.name,
            fish_sold = report.fish_sold,
            coins_earned = report.coins_earned,
            fish_died = report.fish_died,
            births = report.births,
            starved = report.starved,
            "facility day complete"
        );
        report
    }

    /// Remove dead fish from every tank, returning how many were removed.
    pub fn remove_dead(&mut self) -> u32 {
        self.tanks
            .iter_mut()
            .fold(0_u32, |acc, tank| acc.saturating_add(tank.remove_dead()))
    }

    /// Living fish across all tanks.
    pub fn living_count(&self) -> u32 {
        self.tanks
            .iter()
            .fold(0_u32, |acc, tank| acc.saturating_add(tank.living_count()))
    }

    /// Current counts for the facility and each tank.
    pub fn stats(&self) -> FacilityStats {
        let tanks: Vec<TankStats> = self.tanks.iter().map(Tank::stats).collect();
        let sum = |field: fn(&TankStats) -> u32| {
            tanks
                .iter()
                .fold(0_u32, |acc, t| acc.saturating_add(field(t)))
        };

        FacilityStats {
            facility: self.id,
            name: self.name.clone(),
            kind: self.kind,
            alive: sum(|t| t.alive),
            dead: sum(|t| t.dead),
            males: sum(|t| t.males),
            females: sum(|t| t.females),
            fertile: sum(|t| t.fertile),
            mature: sum(|t| t.mature),
            fed: sum(|t| t.fed),
            food_animal: self.food.stored(FoodKind::Animal),
            food_vegetal: self.food.stored(FoodKind::Vegetal),
            food_capacity: self.food.capacity(),
            tanks,
        }
    }
}

#[cfg(test)]
mod tests {
    use fishfarm_ledger::{Ledger, LedgerError};
    use fishfarm_types::{DietClass, Habitat};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::fish::tests::carpa;

    fn lucio() -> Arc<Species> {
        Arc::new(Species {
            name: "Lucio del norte".to_owned(),
            scientific_name: "Esox lucius".to_owned(),
            maturity_age: 6,
            reproduction_cycle_length: 4,
            eggs_per_reproduction: 3,
            diet_class: DietClass::Carnivore,
            purchase_cost: 25,
            sale_value: 50,
            sale_age_threshold: 14,
            habitat: Habitat::River,
        })
    }

    fn dorada() -> Arc<Species> {
        Arc::new(Species {
            name: "Dorada".to_owned(),
            scientific_name: "Sparus aurata".to_owned(),
            maturity_age: 6,
            reproduction_cycle_length: 4,
            eggs_per_reproduction: 4,
            diet_class: DietClass::Carnivore,
            purchase_cost: 30,
            sale_value: 60,
            sale_age_threshold: 14,
            habitat: Habitat::Sea,
        })
    }

    #[test]
    fn new_facility_uses_kind_defaults() {
        let river = Facility::new("Rio", FacilityKind::River);
        assert_eq!(river.tanks().len(), 1);
        assert_eq!(river.tank(0).map(Tank::capacity), Some(25));
        assert_eq!(river.food().capacity(), 25);

        let sea = Facility::new("Mar", FacilityKind::Sea);
        assert_eq!(sea.tank(0).map(Tank::capacity), Some(100));
        assert_eq!(sea.food().capacity(), 100);
    }

    #[test]
    fn add_food_over_capacity_is_rejected() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        assert!(facility.add_food(FoodKind::Animal, 20).is_ok());
        assert!(facility.add_food(FoodKind::Animal, 6).is_err());
        assert_eq!(facility.food().stored(FoodKind::Animal), 20);
    }

    #[test]
    fn buy_fish_spends_purchase_cost() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        assert!(facility.buy_fish(0, carpa(), Sex::Male, &mut ledger).is_ok());
        assert_eq!(ledger.balance(), 80);
        assert_eq!(
            ledger.all_entries().first().map(|e| e.reason.as_str()),
            Some("BUY Carpa")
        );
        assert_eq!(facility.tank(0).map(Tank::occupancy), Some(1));
    }

    #[test]
    fn buy_fish_wrong_habitat_changes_nothing() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        let result = facility.buy_fish(0, dorada(), Sex::Male, &mut ledger);
        assert!(matches!(result, Err(FarmError::HabitatMismatch { .. })));
        assert_eq!(ledger.balance(), 100);
        assert_eq!(facility.tank(0).map(Tank::occupancy), Some(0));
    }

    #[test]
    fn stocking_is_free_but_checked() {
        let mut facility = Facility::new("Mar", FacilityKind::Sea);
        assert!(facility.stock_fish(0, dorada(), Sex::Female).is_ok());
        assert!(matches!(
            facility.stock_fish(0, carpa(), Sex::Male),
            Err(FarmError::HabitatMismatch { .. })
        ));
        assert_eq!(facility.living_count(), 1);
    }

    #[test]
    fn buy_fish_into_missing_tank() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        let result = facility.buy_fish(3, carpa(), Sex::Male, &mut ledger);
        assert_eq!(result.err(), Some(FarmError::TankNotFound(3)));
    }

    #[test]
    fn buy_fish_species_mismatch_keeps_coins() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        assert!(facility.buy_fish(0, carpa(), Sex::Male, &mut ledger).is_ok());
        let result = facility.buy_fish(0, lucio(), Sex::Male, &mut ledger);
        assert!(matches!(result, Err(FarmError::SpeciesMismatch { .. })));
        assert_eq!(ledger.balance(), 80);
    }

    #[test]
    fn buy_fish_unaffordable_adds_nothing() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(5);
        let result = facility.buy_fish(0, carpa(), Sex::Female, &mut ledger);
        assert!(matches!(
            result,
            Err(FarmError::Ledger {
                source: LedgerError::InsufficientFunds { .. }
            })
        ));
        assert_eq!(facility.tank(0).map(Tank::occupancy), Some(0));
        assert_eq!(facility.tank(0).and_then(Tank::species), None);
    }

    #[test]
    fn buy_food_spends_and_stores() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        assert_eq!(facility.buy_food(FoodKind::Vegetal, 10, 2, &mut ledger).ok(), Some(20));
        assert_eq!(ledger.balance(), 80);
        assert_eq!(
            ledger.all_entries().first().map(|e| e.reason.as_str()),
            Some("BUY vegetal food")
        );
        assert_eq!(facility.food().stored(FoodKind::Vegetal), 10);
    }

    #[test]
    fn buy_food_over_capacity_spends_nothing() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        let result = facility.buy_food(FoodKind::Animal, 26, 1, &mut ledger);
        assert!(matches!(result, Err(FarmError::FoodOverCapacity { .. })));
        assert_eq!(ledger.balance(), 100);
    }

    #[test]
    fn food_capacity_upgrades_stop_at_ceiling() {
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(1_000);
        let mut capacity = facility.food().capacity();
        while capacity < 250 {
            capacity = facility
                .upgrade_food_capacity(10, &mut ledger)
                .unwrap_or(u32::MAX);
        }
        assert_eq!(capacity, 250);
        assert_eq!(ledger.balance(), 1_000 - 9 * 10);
        assert_eq!(
            facility.upgrade_food_capacity(10, &mut ledger).err(),
            Some(FarmError::UpgradeUnavailable { max: 250 })
        );
    }

    #[test]
    fn carnivore_without_food_goes_unfed() {
        let mut rng = SmallRng::seed_from_u64(1);
        let cfg = LifecycleConfig::deterministic();
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        assert!(facility.buy_fish(0, lucio(), Sex::Male, &mut ledger).is_ok());

        let report = facility.advance_day(None, &mut ledger, &mut rng, &cfg);

        assert_eq!(report.starved, 1);
        assert_eq!(report.fed, 0);
        let fish = facility.tank(0).and_then(|t| t.fish().first());
        assert_eq!(fish.map(Fish::is_fed), Some(false));
        assert_eq!(fish.map(Fish::is_alive), Some(true));
    }

    #[test]
    fn unfed_carnivore_dies_when_roll_is_certain() {
        let mut rng = SmallRng::seed_from_u64(2);
        let cfg = LifecycleConfig {
            unfed_death_chance: 1.0,
            ..LifecycleConfig::deterministic()
        };
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        assert!(facility.buy_fish(0, lucio(), Sex::Male, &mut ledger).is_ok());

        let report = facility.advance_day(None, &mut ledger, &mut rng, &cfg);
        assert_eq!(report.fish_died, 1);
        assert_eq!(facility.stats().dead, 1);
        assert_eq!(facility.remove_dead(), 1);
        assert_eq!(facility.stats().dead, 0);
    }

    #[test]
    fn fish_fall_back_to_warehouse() {
        let mut rng = SmallRng::seed_from_u64(3);
        let cfg = LifecycleConfig::deterministic();
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let mut ledger = Ledger::new(100);
        let mut warehouse = CentralWarehouse::new(100);
        assert!(warehouse.add_food(FoodKind::Animal, 10).is_ok());
        assert!(facility.buy_fish(0, lucio(), Sex::Male, &mut ledger).is_ok());
        assert!(facility.buy_fish(0, lucio(), Sex::Female, &mut ledger).is_ok());
        assert!(facility.add_food(FoodKind::Animal, 1).is_ok());

        let report = facility.advance_day(Some(&mut warehouse), &mut ledger, &mut rng, &cfg);

        assert_eq!(report.fed, 2);
        assert_eq!(report.food_eaten, 2);
        assert_eq!(facility.food().stored(FoodKind::Animal), 0);
        assert_eq!(warehouse.stored(FoodKind::Animal), 9);
    }

    #[test]
    fn day_report_aggregates_tanks() {
        let mut rng = SmallRng::seed_from_u64(4);
        let cfg = LifecycleConfig::deterministic();
        let mut facility = Facility::new("Rio", FacilityKind::River);
        let second = facility.add_tank_with_capacity(10);
        assert_eq!(facility.tank(1).map(Tank::id), Some(second));

        let mut ledger = Ledger::new(0);
        for index in 0..2 {
            if let Some(tank) = facility.tank_mut(index) {
                let mut fish = Fish::new(carpa(), Sex::Male);
                fish.set_age(11);
                assert!(tank.add_fish(fish).is_ok());
            }
        }
        assert!(facility.add_food(FoodKind::Animal, 5).is_ok());

        let report = facility.advance_day(None, &mut ledger, &mut rng, &cfg);
        assert_eq!(report.fish_sold, 2);
        assert_eq!(report.coins_earned, 80);
        assert_eq!(ledger.balance(), 80);
        assert_eq!(facility.living_count(), 0);
    }
}
