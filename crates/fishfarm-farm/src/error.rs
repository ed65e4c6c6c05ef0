//! Error types for the fishfarm-farm crate.
//!
//! Every variant describes a local, recoverable rejection: the operation
//! that produced it left all state untouched. Nothing here aborts a day.

use fishfarm_ledger::LedgerError;
use fishfarm_types::{FacilityKind, FoodKind, Habitat, TankId};

/// Errors that can occur during farm operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FarmError {
    /// The tank already holds as many fish as it can.
    #[error("tank {tank} is full (capacity {capacity})")]
    TankFull {
        /// The full tank.
        tank: TankId,
        /// Its capacity.
        capacity: u32,
    },

    /// The tank is bound to a different species.
    #[error("tank {tank} holds {expected}, cannot add {actual}")]
    SpeciesMismatch {
        /// The tank.
        tank: TankId,
        /// Species the tank already holds.
        expected: String,
        /// Species the caller tried to add.
        actual: String,
    },

    /// The species cannot live in this kind of facility.
    #[error("{species} ({habitat:?}) cannot live in a {facility} facility")]
    HabitatMismatch {
        /// The facility kind.
        facility: FacilityKind,
        /// The rejected species.
        species: String,
        /// The species' habitat.
        habitat: Habitat,
    },

    /// The tank still holds fish, so its species cannot change.
    #[error("tank {tank} is not empty")]
    TankNotEmpty {
        /// The tank.
        tank: TankId,
    },

    /// No tank exists at the given position.
    #[error("tank number {0} does not exist")]
    TankNotFound(usize),

    /// Adding food would exceed the store's capacity.
    #[error("adding {attempted} {kind} food would exceed capacity (stored: {stored}, capacity: {capacity})")]
    FoodOverCapacity {
        /// Food kind being added.
        kind: FoodKind,
        /// Units the caller attempted to add.
        attempted: u32,
        /// Units already stored.
        stored: u32,
        /// Store capacity.
        capacity: u32,
    },

    /// Not enough food of the requested kind is stored.
    #[error("insufficient {kind} food: wanted {requested} but only have {available}")]
    InsufficientFood {
        /// Food kind being removed.
        kind: FoodKind,
        /// Units requested.
        requested: u32,
        /// Units available.
        available: u32,
    },

    /// A capacity change would leave stored food above the new capacity.
    #[error("capacity {capacity} is below the {stored} units already stored")]
    CapacityBelowStock {
        /// The requested capacity.
        capacity: u32,
        /// The largest stock currently held.
        stored: u32,
    },

    /// The store is already at its upgrade ceiling.
    #[error("food capacity is already at its maximum of {max}")]
    UpgradeUnavailable {
        /// The ceiling.
        max: u32,
    },

    /// A purchase or transfer was requested for zero units.
    #[error("amount must be non-zero")]
    ZeroAmount,

    /// The coin ledger rejected a payment.
    #[error("payment failed: {source}")]
    Ledger {
        /// The underlying ledger error.
        #[from]
        source: LedgerError,
    },

    /// An arithmetic overflow occurred.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
