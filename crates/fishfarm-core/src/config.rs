//! Configuration loading and typed config structures for the fish farm
//! simulation.
//!
//! The configuration lives in `fishfarm-config.yaml` at the project root.
//! This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::Deserialize;

use fishfarm_farm::LifecycleConfig;
use fishfarm_types::{FacilityKind, Sex, Species};

/// Environment variable that overrides `world.seed`.
pub const SEED_ENV_VAR: &str = "FISHFARM_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but describes an impossible setup.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `fishfarm-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed).
    #[serde(default)]
    pub world: WorldConfig,

    /// Run length and daily housekeeping.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Lifecycle probabilities.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Coins and prices.
    #[serde(default)]
    pub economy: EconomyConfig,

    /// The shared central warehouse.
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Facilities to build at startup, in order.
    #[serde(default = "default_facilities")]
    pub facilities: Vec<FacilityConfig>,

    /// Extra species added to (or replacing entries in) the built-in catalog.
    #[serde(default)]
    pub species: Vec<Species>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            simulation: SimulationBoundsConfig::default(),
            lifecycle: LifecycleConfig::default(),
            economy: EconomyConfig::default(),
            warehouse: WarehouseConfig::default(),
            facilities: default_facilities(),
            species: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `FISHFARM_SEED` overrides `world.seed` when set to a valid `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // A blank file means all defaults.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.world.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Check the settings that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = self.lifecycle.invalid_chances();
        if !bad.is_empty() {
            return Err(ConfigError::Invalid {
                reason: format!("lifecycle chances outside 0..=1: {}", bad.join(", ")),
            });
        }

        for facility in &self.facilities {
            if facility.tanks == 0 {
                return Err(ConfigError::Invalid {
                    reason: format!("facility {} needs at least one tank", facility.name),
                });
            }
            if let Some(stock) = facility
                .stock
                .iter()
                .find(|s| usize::try_from(facility.tanks).is_ok_and(|n| s.tank >= n))
            {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "facility {} stocks {} into tank {} but has only {} tanks",
                        facility.name, stock.species, stock.tank, facility.tanks
                    ),
                });
            }
        }

        if self.warehouse.enabled
            && (self.warehouse.animal > self.warehouse.capacity
                || self.warehouse.vegetal > self.warehouse.capacity)
        {
            return Err(ConfigError::Invalid {
                reason: "warehouse initial stock exceeds its capacity".to_owned(),
            });
        }

        Ok(())
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable farm name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl WorldConfig {
    /// Override the seed with `FISHFARM_SEED` when it is set and parses.
    pub fn apply_env_overrides(&mut self) {
        if let Some(seed) = std::env::var(SEED_ENV_VAR)
            .ok()
            .and_then(|val| val.trim().parse().ok())
        {
            self.seed = seed;
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
        }
    }
}

/// Run length and per-day housekeeping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Number of days to run.
    #[serde(default = "default_days")]
    pub days: u64,

    /// Run warehouse distribution at the end of every day.
    #[serde(default = "default_true")]
    pub distribute_daily: bool,

    /// Remove dead fish at the end of every day.
    #[serde(default = "default_true")]
    pub clear_dead_daily: bool,

    /// Stop early once no living fish remain anywhere.
    #[serde(default)]
    pub stop_on_extinction: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            days: default_days(),
            distribute_daily: true,
            clear_dead_daily: true,
            stop_on_extinction: false,
        }
    }
}

/// Coins and prices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EconomyConfig {
    /// Coins in the ledger at day 0.
    #[serde(default = "default_starting_coins")]
    pub starting_coins: u64,

    /// Price of one unit of either food kind.
    #[serde(default = "default_food_cost_per_unit")]
    pub food_cost_per_unit: u64,

    /// Buy food at the start of each day for any facility whose stock of a
    /// kind has fallen below half its capacity.
    #[serde(default)]
    pub auto_restock: bool,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_coins: default_starting_coins(),
            food_cost_per_unit: default_food_cost_per_unit(),
            auto_restock: false,
        }
    }
}

/// The central warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WarehouseConfig {
    /// Whether the farm has a warehouse at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Capacity per food kind.
    #[serde(default = "default_warehouse_capacity")]
    pub capacity: u32,

    /// Initial animal food.
    #[serde(default = "default_warehouse_stock")]
    pub animal: u32,

    /// Initial vegetal food.
    #[serde(default = "default_warehouse_stock")]
    pub vegetal: u32,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: default_warehouse_capacity(),
            animal: default_warehouse_stock(),
            vegetal: default_warehouse_stock(),
        }
    }
}

/// One facility to build at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacilityConfig {
    /// Display name.
    pub name: String,

    /// River or sea.
    pub kind: FacilityKind,

    /// Number of tanks.
    #[serde(default = "default_tanks")]
    pub tanks: u32,

    /// Capacity of every tank (kind default when absent).
    #[serde(default)]
    pub tank_capacity: Option<u32>,

    /// Food capacity per kind (kind default when absent).
    #[serde(default)]
    pub food_capacity: Option<u32>,

    /// Initial animal food.
    #[serde(default)]
    pub food_animal: u32,

    /// Initial vegetal food.
    #[serde(default)]
    pub food_vegetal: u32,

    /// Initial fish.
    #[serde(default)]
    pub stock: Vec<StockConfig>,
}

/// Initial fish for one tank.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockConfig {
    /// Species name as listed in the catalog.
    pub species: String,

    /// Tank position (0-based).
    #[serde(default)]
    pub tank: usize,

    /// Number of males.
    #[serde(default)]
    pub males: u32,

    /// Number of females.
    #[serde(default)]
    pub females: u32,
}

impl StockConfig {
    /// Sexes of the fish to place, males first.
    pub fn sexes(&self) -> impl Iterator<Item = Sex> {
        std::iter::repeat_n(Sex::Male, usize::try_from(self.males).unwrap_or(usize::MAX)).chain(
            std::iter::repeat_n(Sex::Female, usize::try_from(self.females).unwrap_or(usize::MAX)),
        )
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Piscifactoria".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_days() -> u64 {
    30
}

const fn default_starting_coins() -> u64 {
    200
}

const fn default_food_cost_per_unit() -> u64 {
    1
}

const fn default_warehouse_capacity() -> u32 {
    200
}

const fn default_warehouse_stock() -> u32 {
    50
}

const fn default_tanks() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

fn default_facilities() -> Vec<FacilityConfig> {
    vec![
        FacilityConfig {
            name: "Rio".to_owned(),
            kind: FacilityKind::River,
            tanks: 1,
            tank_capacity: None,
            food_capacity: None,
            food_animal: 25,
            food_vegetal: 25,
            stock: vec![StockConfig {
                species: "Carpa".to_owned(),
                tank: 0,
                males: 1,
                females: 1,
            }],
        },
        FacilityConfig {
            name: "Costa".to_owned(),
            kind: FacilityKind::Sea,
            tanks: 1,
            tank_capacity: None,
            food_capacity: None,
            food_animal: 50,
            food_vegetal: 50,
            stock: vec![StockConfig {
                species: "Dorada".to_owned(),
                tank: 0,
                males: 2,
                females: 2,
            }],
        },
    ]
}
