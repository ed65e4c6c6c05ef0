//! Enumeration types for the fish farm simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

/// Biological sex of a fish. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Male fish. At least one fertile male is needed for a tank to spawn.
    Male,
    /// Female fish. Each fertile female lays one batch of eggs per cycle.
    Female,
}

impl core::fmt::Display for Sex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
        }
    }
}

// ---------------------------------------------------------------------------
// Food
// ---------------------------------------------------------------------------

/// The two kinds of feed stored by facilities and the central warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Animal feed (meat, krill, fish meal).
    Animal,
    /// Vegetal feed (algae, plankton substitutes, grain pellets).
    Vegetal,
}

impl FoodKind {
    /// Both food kinds, in the order distribution processes them.
    pub const ALL: [Self; 2] = [Self::Animal, Self::Vegetal];
}

impl core::fmt::Display for FoodKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Animal => write!(f, "animal"),
            Self::Vegetal => write!(f, "vegetal"),
        }
    }
}

// ---------------------------------------------------------------------------
// Diet
// ---------------------------------------------------------------------------

/// Feeding behavior of a species.
///
/// The per-tick consumption rules for each class live in the farm crate's
/// `diet` module; this enum only names the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DietClass {
    /// Eats one unit of animal feed per day.
    Carnivore,
    /// Eats one unit of vegetal feed on half of the days.
    FilterFeeder,
    /// Eats one unit of either feed on most days.
    Omnivore,
    /// Eats one or two units of animal feed per day.
    ActiveCarnivore,
}

impl core::fmt::Display for DietClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Carnivore => write!(f, "carnivore"),
            Self::FilterFeeder => write!(f, "filter_feeder"),
            Self::Omnivore => write!(f, "omnivore"),
            Self::ActiveCarnivore => write!(f, "active_carnivore"),
        }
    }
}

// ---------------------------------------------------------------------------
// Habitat
// ---------------------------------------------------------------------------

/// Water a species can be farmed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Habitat {
    /// Freshwater only.
    River,
    /// Saltwater only.
    Sea,
    /// Tolerates both fresh and salt water.
    Both,
}

// ---------------------------------------------------------------------------
// Facility kind
// ---------------------------------------------------------------------------

/// Kind of facility. Fixes tank sizes, food capacity limits, and which
/// habitats are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FacilityKind {
    /// Freshwater facility with small tanks.
    River,
    /// Saltwater facility with large tanks.
    Sea,
}

impl FacilityKind {
    /// Capacity of a newly added tank.
    pub const fn default_tank_capacity(self) -> u32 {
        match self {
            Self::River => 25,
            Self::Sea => 100,
        }
    }

    /// Per-kind food capacity of a new facility.
    pub const fn default_food_capacity(self) -> u32 {
        match self {
            Self::River => 25,
            Self::Sea => 100,
        }
    }

    /// Food capacity added by one upgrade.
    pub const fn food_capacity_step(self) -> u32 {
        match self {
            Self::River => 25,
            Self::Sea => 100,
        }
    }

    /// Highest food capacity reachable through upgrades.
    pub const fn max_food_capacity(self) -> u32 {
        match self {
            Self::River => 250,
            Self::Sea => 1000,
        }
    }

    /// Whether fish of the given habitat can live in this facility.
    pub const fn accepts(self, habitat: Habitat) -> bool {
        matches!(
            (self, habitat),
            (Self::River, Habitat::River | Habitat::Both) | (Self::Sea, Habitat::Sea | Habitat::Both)
        )
    }
}

impl core::fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::River => write!(f, "river"),
            Self::Sea => write!(f, "sea"),
        }
    }
}
