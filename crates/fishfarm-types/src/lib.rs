//! Shared type definitions for the fish farm simulation.
//!
//! This crate holds the vocabulary every other crate speaks: typed IDs,
//! enumerations, and the species catalog. It has no simulation logic.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for facilities, tanks, and ledger entries
//! - [`enums`] -- Sex, food kinds, diet classes, habitats, facility kinds
//! - [`species`] -- The immutable [`Species`] descriptor and [`SpeciesCatalog`]

pub mod enums;
pub mod ids;
pub mod species;

// Re-export all public types at crate root for convenience.
pub use enums::{DietClass, FacilityKind, FoodKind, Habitat, Sex};
pub use ids::{FacilityId, LedgerEntryId, TankId};
pub use species::{Species, SpeciesCatalog};
