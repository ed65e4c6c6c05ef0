//! Food stores and the pantry fish eat from.
//!
//! A [`FoodReserve`] holds animal and vegetal feed, each bounded by one
//! shared capacity. Facilities and the central warehouse both store their
//! food this way.
//!
//! A [`Pantry`] is the view a tank feeds from during a day: the owning
//! facility's reserve first, then the central warehouse if there is one.

use serde::{Deserialize, Serialize};

use fishfarm_types::FoodKind;

use crate::error::FarmError;
use crate::warehouse::CentralWarehouse;

// ---------------------------------------------------------------------------
// FoodReserve
// ---------------------------------------------------------------------------

/// Animal and vegetal feed, each kept within `0..=capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodReserve {
    animal: u32,
    vegetal: u32,
    capacity: u32,
}

impl FoodReserve {
    /// Create an empty reserve.
    pub const fn new(capacity: u32) -> Self {
        Self {
            animal: 0,
            vegetal: 0,
            capacity,
        }
    }

    /// Per-kind capacity.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units of `kind` stored.
    pub const fn stored(&self, kind: FoodKind) -> u32 {
        match kind {
            FoodKind::Animal => self.animal,
            FoodKind::Vegetal => self.vegetal,
        }
    }

    /// Units of `kind` that still fit.
    pub const fn headroom(&self, kind: FoodKind) -> u32 {
        self.capacity.saturating_sub(self.stored(kind))
    }

    /// Whether no food of `kind` is left.
    pub const fn is_empty(&self, kind: FoodKind) -> bool {
        self.stored(kind) == 0
    }

    const fn slot(&mut self, kind: FoodKind) -> &mut u32 {
        match kind {
            FoodKind::Animal => &mut self.animal,
            FoodKind::Vegetal => &mut self.vegetal,
        }
    }

    /// Add `amount` units of `kind`.
    ///
    /// Fails without changing anything if the result would exceed capacity.
    pub fn add(&mut self, kind: FoodKind, amount: u32) -> Result<(), FarmError> {
        let stored = self.stored(kind);
        let capacity = self.capacity;
        let over = FarmError::FoodOverCapacity {
            kind,
            attempted: amount,
            stored,
            capacity,
        };
        let total = stored.checked_add(amount).ok_or_else(|| over.clone())?;
        if total > capacity {
            return Err(over);
        }
        *self.slot(kind) = total;
        Ok(())
    }

    /// Remove `amount` units of `kind`.
    ///
    /// Fails without changing anything if not enough is stored.
    pub fn take(&mut self, kind: FoodKind, amount: u32) -> Result<(), FarmError> {
        let available = self.stored(kind);
        let remaining = available
            .checked_sub(amount)
            .ok_or(FarmError::InsufficientFood {
                kind,
                requested: amount,
                available,
            })?;
        *self.slot(kind) = remaining;
        Ok(())
    }

    /// Overwrite the stored amount of `kind`, as when restoring a save.
    pub fn set_stored(&mut self, kind: FoodKind, amount: u32) -> Result<(), FarmError> {
        if amount > self.capacity {
            return Err(FarmError::FoodOverCapacity {
                kind,
                attempted: amount,
                stored: 0,
                capacity: self.capacity,
            });
        }
        *self.slot(kind) = amount;
        Ok(())
    }

    /// Change the capacity. Fails if either stock would no longer fit.
    pub fn set_capacity(&mut self, capacity: u32) -> Result<(), FarmError> {
        let stored = self.animal.max(self.vegetal);
        if capacity < stored {
            return Err(FarmError::CapacityBelowStock { capacity, stored });
        }
        self.capacity = capacity;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Portions
// ---------------------------------------------------------------------------

/// Food handed to one fish, split by where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portion {
    /// Kind of food eaten.
    pub kind: FoodKind,
    /// Units taken from the facility's own reserve.
    pub local: u32,
    /// Units taken from the central warehouse.
    pub warehouse: u32,
}

impl Portion {
    /// Total units in the portion.
    pub const fn units(&self) -> u32 {
        self.local.saturating_add(self.warehouse)
    }
}

// ---------------------------------------------------------------------------
// Pantry
// ---------------------------------------------------------------------------

/// The food sources one facility's fish can reach during a day.
#[derive(Debug)]
pub struct Pantry<'a> {
    local: &'a mut FoodReserve,
    warehouse: Option<&'a mut CentralWarehouse>,
}

impl<'a> Pantry<'a> {
    /// Combine a facility reserve with an optional warehouse.
    pub const fn new(local: &'a mut FoodReserve, warehouse: Option<&'a mut CentralWarehouse>) -> Self {
        Self { local, warehouse }
    }

    /// Units of `kind` in the local reserve.
    pub const fn local(&self, kind: FoodKind) -> u32 {
        self.local.stored(kind)
    }

    /// Units of `kind` in the warehouse (zero without one).
    pub fn warehouse(&self, kind: FoodKind) -> u32 {
        self.warehouse.as_ref().map_or(0, |w| w.stored(kind))
    }

    /// Units of `kind` reachable from either source.
    pub fn available(&self, kind: FoodKind) -> u32 {
        self.local(kind).saturating_add(self.warehouse(kind))
    }

    /// Take `units` of `kind`, local reserve first and the warehouse for
    /// the rest.
    ///
    /// Returns `None` and takes nothing if both sources together hold less
    /// than `units`.
    pub fn take(&mut self, kind: FoodKind, units: u32) -> Option<Portion> {
        if units == 0 || self.available(kind) < units {
            return None;
        }

        let local = self.local(kind).min(units);
        let rest = units.saturating_sub(local);

        if rest > 0 {
            let warehouse = self.warehouse.as_deref_mut()?;
            warehouse.take(kind, rest).ok()?;
        }
        if local > 0 {
            self.local.take(kind, local).ok()?;
        }

        Some(Portion {
            kind,
            local,
            warehouse: rest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_within_capacity() {
        let mut reserve = FoodReserve::new(25);
        assert!(reserve.add(FoodKind::Animal, 20).is_ok());
        assert_eq!(reserve.stored(FoodKind::Animal), 20);
        assert_eq!(reserve.headroom(FoodKind::Animal), 5);
        assert_eq!(reserve.stored(FoodKind::Vegetal), 0);
    }

    #[test]
    fn add_over_capacity_rejected_without_mutation() {
        let mut reserve = FoodReserve::new(25);
        assert!(reserve.add(FoodKind::Vegetal, 20).is_ok());
        let result = reserve.add(FoodKind::Vegetal, 6);
        assert!(matches!(result, Err(FarmError::FoodOverCapacity { .. })));
        assert_eq!(reserve.stored(FoodKind::Vegetal), 20);
    }

    #[test]
    fn kinds_are_bounded_independently() {
        let mut reserve = FoodReserve::new(10);
        assert!(reserve.add(FoodKind::Animal, 10).is_ok());
        assert!(reserve.add(FoodKind::Vegetal, 10).is_ok());
    }

    #[test]
    fn take_more_than_stored_rejected() {
        let mut reserve = FoodReserve::new(10);
        assert!(reserve.add(FoodKind::Animal, 3).is_ok());
        assert!(reserve.take(FoodKind::Animal, 4).is_err());
        assert_eq!(reserve.stored(FoodKind::Animal), 3);
        assert!(reserve.take(FoodKind::Animal, 3).is_ok());
        assert!(reserve.is_empty(FoodKind::Animal));
    }

    #[test]
    fn capacity_cannot_drop_below_stock() {
        let mut reserve = FoodReserve::new(50);
        assert!(reserve.add(FoodKind::Animal, 30).is_ok());
        assert!(reserve.set_capacity(29).is_err());
        assert!(reserve.set_capacity(30).is_ok());
        assert_eq!(reserve.capacity(), 30);
    }

    #[test]
    fn pantry_prefers_local_stock() {
        let mut local = FoodReserve::new(10);
        let mut warehouse = CentralWarehouse::new(10);
        assert!(local.add(FoodKind::Animal, 2).is_ok());
        assert!(warehouse.add_food(FoodKind::Animal, 5).is_ok());

        let mut pantry = Pantry::new(&mut local, Some(&mut warehouse));
        let portion = pantry.take(FoodKind::Animal, 1);
        assert_eq!(
            portion,
            Some(Portion {
                kind: FoodKind::Animal,
                local: 1,
                warehouse: 0,
            })
        );
        assert_eq!(local.stored(FoodKind::Animal), 1);
        assert_eq!(warehouse.stored(FoodKind::Animal), 5);
    }

    #[test]
    fn pantry_falls_back_to_warehouse() {
        let mut local = FoodReserve::new(10);
        let mut warehouse = CentralWarehouse::new(10);
        assert!(warehouse.add_food(FoodKind::Vegetal, 5).is_ok());

        let mut pantry = Pantry::new(&mut local, Some(&mut warehouse));
        let portion = pantry.take(FoodKind::Vegetal, 1);
        assert_eq!(portion.map(|p| p.warehouse), Some(1));
        assert_eq!(warehouse.stored(FoodKind::Vegetal), 4);
        assert_eq!(local.stored(FoodKind::Vegetal), 0);
    }

    #[test]
    fn pantry_splits_across_sources() {
        let mut local = FoodReserve::new(10);
        let mut warehouse = CentralWarehouse::new(10);
        assert!(local.add(FoodKind::Animal, 1).is_ok());
        assert!(warehouse.add_food(FoodKind::Animal, 1).is_ok());

        let mut pantry = Pantry::new(&mut local, Some(&mut warehouse));
        let portion = pantry.take(FoodKind::Animal, 2);
        assert_eq!(portion.map(|p| (p.local, p.warehouse)), Some((1, 1)));
        assert!(local.is_empty(FoodKind::Animal));
        assert_eq!(warehouse.stored(FoodKind::Animal), 0);
    }

    #[test]
    fn pantry_without_food_takes_nothing() {
        let mut local = FoodReserve::new(10);
        assert!(local.add(FoodKind::Animal, 1).is_ok());
        let mut pantry = Pantry::new(&mut local, None);
        assert_eq!(pantry.take(FoodKind::Animal, 2), None);
        assert_eq!(pantry.take(FoodKind::Vegetal, 1), None);
        assert_eq!(local.stored(FoodKind::Animal), 1);
    }
}
