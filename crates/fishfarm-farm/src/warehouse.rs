//! The central warehouse: a shared overflow food store.
//!
//! No facility owns the warehouse. Feeding borrows it through a
//! [`Pantry`](crate::food::Pantry) when a facility's own reserve runs out,
//! and [`CentralWarehouse::distribute`] pushes stock out to facilities that
//! have room for it.
//!
//! # Distribution
//!
//! For each food kind independently, the stock at the start of the pass is
//! split into equal shares among the facilities with headroom for that kind.
//! Each of them receives `min(headroom, share)` in order, in a single pass.
//! Whatever does not divide evenly (or does not fit) stays in the warehouse.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use fishfarm_ledger::CoinLedger;
use fishfarm_types::{FacilityId, FoodKind};

use crate::error::FarmError;
use crate::facility::Facility;
use crate::food::FoodReserve;

/// One transfer made during distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// The receiving facility.
    pub facility: FacilityId,
    /// Food kind delivered.
    pub kind: FoodKind,
    /// Units delivered. Always positive.
    pub amount: u32,
}

/// Everything a distribution pass moved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReport {
    /// Transfers in the order they were made.
    pub deliveries: Vec<Delivery>,
}

impl DistributionReport {
    /// Total units of `kind` delivered.
    pub fn total(&self, kind: FoodKind) -> u32 {
        self.deliveries
            .iter()
            .filter(|d| d.kind == kind)
            .fold(0_u32, |acc, d| acc.saturating_add(d.amount))
    }

    /// Units of `kind` delivered to `facility`.
    pub fn delivered_to(&self, facility: FacilityId, kind: FoodKind) -> u32 {
        self.deliveries
            .iter()
            .filter(|d| d.facility == facility && d.kind == kind)
            .fold(0_u32, |acc, d| acc.saturating_add(d.amount))
    }

    /// Whether nothing was moved.
    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

/// The shared warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentralWarehouse {
    stock: FoodReserve,
}

impl CentralWarehouse {
    /// Create an empty warehouse with the given per-kind capacity.
    pub const fn new(capacity: u32) -> Self {
        Self {
            stock: FoodReserve::new(capacity),
        }
    }

    /// Per-kind capacity.
    pub const fn capacity(&self) -> u32 {
        self.stock.capacity()
    }

    /// Units of `kind` stored.
    pub const fn stored(&self, kind: FoodKind) -> u32 {
        self.stock.stored(kind)
    }

    /// The underlying reserve.
    pub const fn stock(&self) -> &FoodReserve {
        &self.stock
    }

    /// Add food. Fails without mutation if it would exceed capacity.
    pub fn add_food(&mut self, kind: FoodKind, amount: u32) -> Result<(), FarmError> {
        self.stock.add(kind, amount)
    }

    /// Remove food. Fails without mutation if not enough is stored.
    pub fn take(&mut self, kind: FoodKind, amount: u32) -> Result<(), FarmError> {
        self.stock.take(kind, amount)
    }

    /// Overwrite the stored amount of `kind`.
    pub fn set_stored(&mut self, kind: FoodKind, amount: u32) -> Result<(), FarmError> {
        self.stock.set_stored(kind, amount)
    }

    /// Overwrite the capacity. Fails if stored food would not fit.
    pub fn set_capacity(&mut self, capacity: u32) -> Result<(), FarmError> {
        self.stock.set_capacity(capacity)
    }

    /// Raise the capacity by `step`, paying `cost` coins.
    ///
    /// A zero cost is free. Returns the new capacity.
    pub fn upgrade_capacity(
        &mut self,
        step: u32,
        cost: u64,
        ledger: &mut dyn CoinLedger,
    ) -> Result<u32, FarmError> {
        if step == 0 {
            return Err(FarmError::ZeroAmount);
        }
        let capacity = self
            .capacity()
            .checked_add(step)
            .ok_or_else(|| FarmError::ArithmeticOverflow {
                context: "warehouse capacity upgrade".to_owned(),
            })?;

        if cost > 0 {
            ledger.spend(cost, "UPGRADE warehouse")?;
        }
        self.stock.set_capacity(capacity)?;

        debug!(capacity, cost, "warehouse capacity upgraded");
        Ok(capacity)
    }

    /// Share the stock out among facilities with room for it.
    ///
    /// See the module docs for the rule. Facilities are served in slice
    /// order.
    pub fn distribute(&mut self, facilities: &mut [Facility]) -> DistributionReport {
        let mut report = DistributionReport::default();

        for kind in FoodKind::ALL {
            let stock = self.stored(kind);
            let needy = facilities
                .iter()
                .filter(|f| f.food_headroom(kind) > 0)
                .count();
            let Some(share) = u32::try_from(needy)
                .ok()
                .and_then(|n| stock.checked_div(n))
            else {
                continue;
            };
            if share == 0 {
                continue;
            }

            for facility in facilities.iter_mut() {
                let amount = facility.food_headroom(kind).min(share).min(self.stored(kind));
                if amount == 0 {
                    continue;
                }
                if let Err(error) = self.stock.take(kind, amount) {
                    warn!(%kind, amount, %error, "warehouse stock short during distribution");
                    break;
                }
                if let Err(error) = facility.add_food(kind, amount) {
                    warn!(facility = %facility.id(), %error, "distribution transfer rejected");
                    if let Err(error) = self.stock.add(kind, amount) {
                        error!(%kind, amount, %error, "undelivered food could not be returned to the warehouse");
                    }
                    continue;
                }
                report.deliveries.push(Delivery {
                    facility: facility.id(),
                    kind,
                    amount,
                });
            }

            debug!(
                %kind,
                needy,
                share,
                delivered = report.total(kind),
                remaining = self.stored(kind),
                "warehouse distribution"
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use fishfarm_ledger::{Ledger, LedgerError};
    use fishfarm_types::FacilityKind;

    use super::*;

    fn river(name: &str) -> Facility {
        Facility::new(name, FacilityKind::River)
    }

    #[test]
    fn split_evenly_with_remainder_kept() {
        let mut warehouse = CentralWarehouse::new(100);
        assert!(warehouse.add_food(FoodKind::Animal, 10).is_ok());
        let mut facilities = vec![river("a"), river("b"), river("c")];

        let report = warehouse.distribute(&mut facilities);

        for facility in &facilities {
            assert_eq!(facility.food().stored(FoodKind::Animal), 3);
        }
        assert_eq!(report.total(FoodKind::Animal), 9);
        assert_eq!(warehouse.stored(FoodKind::Animal), 1);
    }

    #[test]
    fn distribution_conserves_food() {
        let mut warehouse = CentralWarehouse::new(200);
        assert!(warehouse.add_food(FoodKind::Animal, 37).is_ok());
        assert!(warehouse.add_food(FoodKind::Vegetal, 200).is_ok());
        let mut facilities = vec![river("a"), river("b"), river("c"), river("d")];
        if let Some(b) = facilities.get_mut(1) {
            assert!(b.add_food(FoodKind::Animal, 24).is_ok());
        }

        let animal_total = |facilities: &[Facility], warehouse: &CentralWarehouse| {
            facilities
                .iter()
                .fold(warehouse.stored(FoodKind::Animal), |acc, f| {
                    acc.saturating_add(f.food().stored(FoodKind::Animal))
                })
        };
        let before = animal_total(&facilities, &warehouse);
        let report = warehouse.distribute(&mut facilities);
        let after = animal_total(&facilities, &warehouse);

        assert_eq!(before, after);
        for facility in &facilities {
            assert!(facility.food().stored(FoodKind::Vegetal) <= facility.food().capacity());
            assert_eq!(
                report.delivered_to(facility.id(), FoodKind::Vegetal),
                facility.food().stored(FoodKind::Vegetal)
            );
        }
        // share = 37 / 4 = 9; "b" only has room for 1.
        assert_eq!(
            facilities.get(1).map(|b| report.delivered_to(b.id(), FoodKind::Animal)),
            Some(1)
        );
    }

    #[test]
    fn full_facilities_are_skipped() {
        let mut warehouse = CentralWarehouse::new(100);
        assert!(warehouse.add_food(FoodKind::Vegetal, 8).is_ok());
        let mut facilities = vec![river("full"), river("empty")];
        if let Some(full) = facilities.first_mut() {
            assert!(full.add_food(FoodKind::Vegetal, 25).is_ok());
        }

        let report = warehouse.distribute(&mut facilities);

        let empty_id = facilities.get(1).map(Facility::id);
        assert_eq!(report.deliveries.len(), 1);
        assert_eq!(report.deliveries.first().map(|d| d.facility), empty_id);
        assert_eq!(report.total(FoodKind::Vegetal), 8);
        assert_eq!(warehouse.stored(FoodKind::Vegetal), 0);
    }

    #[test]
    fn headroom_caps_each_share() {
        let mut warehouse = CentralWarehouse::new(100);
        assert!(warehouse.add_food(FoodKind::Animal, 40).is_ok());
        let mut facilities = vec![river("nearly-full"), river("empty")];
        if let Some(first) = facilities.first_mut() {
            assert!(first.add_food(FoodKind::Animal, 20).is_ok());
        }

        let report = warehouse.distribute(&mut facilities);

        // share = 20; the first facility only has room for 5.
        assert_eq!(report.total(FoodKind::Animal), 25);
        assert_eq!(warehouse.stored(FoodKind::Animal), 15);
    }

    #[test]
    fn nothing_to_share_is_a_no_op() {
        let mut warehouse = CentralWarehouse::new(100);
        assert!(warehouse.add_food(FoodKind::Animal, 1).is_ok());
        let mut facilities = vec![river("a"), river("b")];
        let report = warehouse.distribute(&mut facilities);
        assert!(report.is_empty());
        assert_eq!(warehouse.stored(FoodKind::Animal), 1);

        let report = warehouse.distribute(&mut []);
        assert!(report.is_empty());
    }

    #[test]
    fn upgrade_spends_and_raises_capacity() {
        let mut warehouse = CentralWarehouse::new(100);
        let mut ledger = Ledger::new(50);
        let result = warehouse.upgrade_capacity(100, 30, &mut ledger);
        assert_eq!(result.ok(), Some(200));
        assert_eq!(ledger.balance(), 20);
    }

    #[test]
    fn unaffordable_upgrade_changes_nothing() {
        let mut warehouse = CentralWarehouse::new(100);
        let mut ledger = Ledger::new(10);
        let result = warehouse.upgrade_capacity(100, 30, &mut ledger);
        assert_eq!(
            result.err(),
            Some(FarmError::Ledger {
                source: LedgerError::InsufficientFunds {
                    requested: 30,
                    available: 10,
                },
            })
        );
        assert_eq!(warehouse.capacity(), 100);
        assert_eq!(ledger.balance(), 10);
    }
}
