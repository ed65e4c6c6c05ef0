//! Probabilities that drive the daily lifecycle.
//!
//! The [`LifecycleConfig`] struct bundles every tunable chance so that
//! callers (the day driver, tests) can override the defaults. A chance of
//! `0.0` never fires and `1.0` always fires, which is how tests make the
//! simulation deterministic.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for the random parts of feeding and growth.
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Chance an unfed fish dies during growth (default: 0.5).
    pub unfed_death_chance: f64,

    /// Chance an immature fish dies on an even age (default: 0.05).
    pub juvenile_death_chance: f64,

    /// Chance a filter feeder needs no food today (default: 0.5).
    pub filter_feeder_skip_chance: f64,

    /// Chance an omnivore eats today instead of grazing for free (default: 0.75).
    pub omnivore_eat_chance: f64,

    /// Chance an active carnivore wants a double portion (default: 0.5).
    pub active_double_chance: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            unfed_death_chance: 0.5,
            juvenile_death_chance: 0.05,
            filter_feeder_skip_chance: 0.5,
            omnivore_eat_chance: 0.75,
            active_double_chance: 0.5,
        }
    }
}

impl LifecycleConfig {
    /// A config where nothing random ever happens: no deaths, every
    /// filter feeder and omnivore eats, and active carnivores eat one unit.
    pub const fn deterministic() -> Self {
        Self {
            unfed_death_chance: 0.0,
            juvenile_death_chance: 0.0,
            filter_feeder_skip_chance: 0.0,
            omnivore_eat_chance: 1.0,
            active_double_chance: 0.0,
        }
    }

    /// Names of any chances outside `0.0..=1.0`.
    pub fn invalid_chances(&self) -> Vec<&'static str> {
        [
            ("unfed_death_chance", self.unfed_death_chance),
            ("juvenile_death_chance", self.juvenile_death_chance),
            ("filter_feeder_skip_chance", self.filter_feeder_skip_chance),
            ("omnivore_eat_chance", self.omnivore_eat_chance),
            ("active_double_chance", self.active_double_chance),
        ]
        .into_iter()
        .filter(|(_, p)| !(0.0..=1.0).contains(p))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Roll a single chance.
///
/// Values at or below zero (and NaN) never fire, values at or above one
/// always fire. Neither extreme consumes randomness.
pub(crate) fn chance(rng: &mut impl Rng, probability: f64) -> bool {
    if probability.is_nan() || probability <= 0.0 {
        return false;
    }
    if probability >= 1.0 {
        return true;
    }
    rng.random_bool(probability)
}
