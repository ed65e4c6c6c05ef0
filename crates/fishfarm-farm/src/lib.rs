//! Fish farm domain logic: fish, feeding, tanks, facilities, and the
//! central warehouse.
//!
//! Everything here is synchronous and operates on `&mut` state. Randomness,
//! the coin ledger and the warehouse are passed in explicitly; nothing in
//! this crate owns them.
//!
//! # Modules
//!
//! - [`fish`] -- A single fish and its daily growth
//! - [`diet`] -- Feeding policies per diet class
//! - [`food`] -- Food reserves and the pantry fish eat from
//! - [`tank`] -- Single-species tanks: feeding, growth, reproduction, harvest
//! - [`facility`] -- Tank aggregation, purchases, and the facility day
//! - [`warehouse`] -- The shared overflow food store and its distribution
//! - [`config`] -- Lifecycle probabilities
//! - [`error`] -- Error types

pub mod config;
pub mod diet;
pub mod error;
pub mod facility;
pub mod fish;
pub mod food;
pub mod tank;
pub mod warehouse;

pub use config::LifecycleConfig;
pub use diet::Meal;
pub use error::FarmError;
pub use facility::{DayReport, Facility, FacilityStats};
pub use fish::{DeathCause, Fish, FishState, GrowthResult};
pub use food::{FoodReserve, Pantry, Portion};
pub use tank::{FeedingReport, HarvestReport, Tank, TankDayReport, TankStats};
pub use warehouse::{CentralWarehouse, Delivery, DistributionReport};
