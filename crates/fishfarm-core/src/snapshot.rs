//! Flat, serializable snapshots of the simulation state.
//!
//! A [`StateSnapshot`] holds every mutable field of a [`SimulationState`]
//! with species referenced by name. Restoring resolves the names against a
//! [`SpeciesCatalog`]; a name the catalog does not know is an error.
//!
//! The random stream itself is not saved. A restored state reseeds from
//! `seed ^ day`, so a day-0 snapshot replays exactly and later snapshots
//! replay deterministically from the point they were taken.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use fishfarm_farm::{
    CentralWarehouse, Facility, FarmError, Fish, FishState, FoodReserve, LifecycleConfig, Tank,
};
use fishfarm_ledger::{AuditResult, Ledger, LedgerAnomaly};
use fishfarm_types::{FacilityId, FacilityKind, FoodKind, SpeciesCatalog, TankId};

use crate::clock::SimulationClock;
use crate::tick::{DayOptions, SimulationState};

/// Errors that can occur when saving or restoring a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// A tank references a species the catalog does not know.
    #[error("unknown species in snapshot: {name}")]
    UnknownSpecies {
        /// The unresolved name.
        name: String,
    },

    /// A saved tank, facility or warehouse violates a farm invariant.
    #[error("invalid snapshot contents: {source}")]
    Farm {
        /// The underlying farm error.
        #[from]
        source: FarmError,
    },

    /// The saved ledger does not balance.
    #[error("ledger does not balance: {anomaly}")]
    Ledger {
        /// What the audit found.
        anomaly: LedgerAnomaly,
    },

    /// JSON encoding or decoding failed.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// A saved tank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankSnapshot {
    /// Tank ID.
    pub id: TankId,
    /// Capacity.
    pub capacity: u32,
    /// Bound species name.
    pub species: Option<String>,
    /// Fish in order, all of the bound species.
    pub fish: Vec<FishState>,
}

/// A saved facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySnapshot {
    /// Facility ID.
    pub id: FacilityId,
    /// Display name.
    pub name: String,
    /// River or sea.
    pub kind: FacilityKind,
    /// Local food reserve.
    pub food: FoodReserve,
    /// Tanks in order.
    pub tanks: Vec<TankSnapshot>,
}

/// Everything needed to rebuild a [`SimulationState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Day the snapshot was taken on.
    pub day: u64,
    /// Seed of the original random stream.
    pub seed: u64,
    /// Optional day phases.
    pub options: DayOptions,
    /// Lifecycle probabilities in force.
    pub lifecycle: LifecycleConfig,
    /// Facilities in order.
    pub facilities: Vec<FacilitySnapshot>,
    /// The warehouse, if any.
    pub warehouse: Option<CentralWarehouse>,
    /// The full coin ledger.
    pub ledger: Ledger,
}

impl StateSnapshot {
    /// Capture the current state.
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            day: state.clock.day(),
            seed: state.seed,
            options: state.options,
            lifecycle: state.lifecycle.clone(),
            facilities: state.facilities.iter().map(capture_facility).collect(),
            warehouse: state.warehouse.clone(),
            ledger: state.ledger.clone(),
        }
    }

    /// Rebuild a state, resolving species names against `catalog`.
    ///
    /// `lifecycle` replaces the saved probabilities, which lets a saved
    /// farm be replayed under different odds.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::UnknownSpecies`] for unresolvable names,
    /// [`SnapshotError::Farm`] when a tank breaks capacity or homogeneity
    /// or a food store holds more than its capacity,
    /// and [`SnapshotError::Ledger`] when the ledger fails its audit.
    pub fn restore(
        &self,
        catalog: SpeciesCatalog,
        lifecycle: LifecycleConfig,
    ) -> Result<SimulationState, SnapshotError> {
        if let AuditResult::Anomaly(anomaly) = self.ledger.audit() {
            return Err(SnapshotError::Ledger { anomaly });
        }

        let facilities = self
            .facilities
            .iter()
            .map(|f| restore_facility(f, &catalog))
            .collect::<Result<Vec<_>, _>>()?;
        let warehouse = self.warehouse.as_ref().map(restore_warehouse).transpose()?;

        Ok(SimulationState {
            clock: SimulationClock::from_day(self.day),
            facilities,
            warehouse,
            ledger: self.ledger.clone(),
            seed: self.seed,
            rng: StdRng::seed_from_u64(self.seed ^ self.day),
            lifecycle,
            catalog,
            options: self.options,
        })
    }

    /// Encode as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if the input is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn capture_facility(facility: &Facility) -> FacilitySnapshot {
    FacilitySnapshot {
        id: facility.id(),
        name: facility.name().to_owned(),
        kind: facility.kind(),
        food: facility.food().clone(),
        tanks: facility
            .tanks()
            .iter()
            .map(|tank| TankSnapshot {
                id: tank.id(),
                capacity: tank.capacity(),
                species: tank.species().map(|s| s.name.clone()),
                fish: tank.fish().iter().map(Fish::state).collect(),
            })
            .collect(),
    }
}

fn restore_facility(saved: &FacilitySnapshot, catalog: &SpeciesCatalog) -> Result<Facility, SnapshotError> {
    let tanks = saved
        .tanks
        .iter()
        .map(|t| restore_tank(t, catalog))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Facility::from_parts(
        saved.id,
        saved.name.clone(),
        saved.kind,
        restore_reserve(&saved.food)?,
        tanks,
    ))
}

/// Rebuild a food store through its checked setters so stock over capacity
/// is rejected.
fn restore_reserve(saved: &FoodReserve) -> Result<FoodReserve, FarmError> {
    let mut reserve = FoodReserve::new(saved.capacity());
    for kind in FoodKind::ALL {
        reserve.set_stored(kind, saved.stored(kind))?;
    }
    Ok(reserve)
}

fn restore_warehouse(saved: &CentralWarehouse) -> Result<CentralWarehouse, FarmError> {
    let mut warehouse = CentralWarehouse::new(saved.capacity());
    for kind in FoodKind::ALL {
        warehouse.set_stored(kind, saved.stored(kind))?;
    }
    Ok(warehouse)
}

fn restore_tank(saved: &TankSnapshot, catalog: &SpeciesCatalog) -> Result<Tank, SnapshotError> {
    let species = saved
        .species
        .as_deref()
        .map(|name| {
            catalog.get(name).ok_or_else(|| SnapshotError::UnknownSpecies {
                name: name.to_owned(),
            })
        })
        .transpose()?;

    let fish = match &species {
        Some(species) => saved
            .fish
            .iter()
            .map(|state| Fish::from_state(Arc::clone(species), *state))
            .collect(),
        None if saved.fish.is_empty() => Vec::new(),
        None => return Err(FarmError::TankNotEmpty { tank: saved.id }.into()),
    };

    Ok(Tank::from_parts(saved.id, saved.capacity, species, fish)?)
}
