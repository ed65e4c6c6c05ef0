//! Diet policies: how much a fish eats and of what.
//!
//! | Diet class | Daily need |
//! |------------|------------|
//! | Carnivore | 1 animal unit |
//! | Filter feeder | nothing with `filter_feeder_skip_chance`, otherwise 1 vegetal unit |
//! | Omnivore | 1 unit of either kind with `omnivore_eat_chance`, otherwise nothing |
//! | Active carnivore | 2 animal units with `active_double_chance`, otherwise 1 |
//!
//! Food always comes from the [`Pantry`]: local reserve first, warehouse
//! second. A fish whose need cannot be met is [`Meal::Starved`].

use rand::Rng;

use fishfarm_types::{DietClass, FoodKind};

use crate::config::{LifecycleConfig, chance};
use crate::food::{Pantry, Portion};

/// Outcome of feeding one fish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meal {
    /// The fish needed nothing today and counts as fed.
    Free,
    /// The fish ate the given portion.
    Ate(Portion),
    /// No food could be found. The fish stays unfed.
    Starved,
}

impl Meal {
    /// Whether the fish ends up fed.
    pub const fn is_fed(&self) -> bool {
        !matches!(self, Self::Starved)
    }

    /// Units consumed (zero unless the fish ate).
    pub const fn units(&self) -> u32 {
        match self {
            Self::Ate(portion) => portion.units(),
            Self::Free | Self::Starved => 0,
        }
    }
}

/// Feed one fish of the given diet class from `pantry`.
pub fn feed(
    diet: DietClass,
    pantry: &mut Pantry<'_>,
    rng: &mut impl Rng,
    config: &LifecycleConfig,
) -> Meal {
    match diet {
        DietClass::Carnivore => eat(pantry, FoodKind::Animal, 1),
        DietClass::FilterFeeder => {
            if chance(rng, config.filter_feeder_skip_chance) {
                Meal::Free
            } else {
                eat(pantry, FoodKind::Vegetal, 1)
            }
        }
        DietClass::Omnivore => {
            if chance(rng, config.omnivore_eat_chance) {
                eat(pantry, omnivore_choice(pantry), 1)
            } else {
                Meal::Free
            }
        }
        DietClass::ActiveCarnivore => {
            if chance(rng, config.active_double_chance) {
                if let Some(portion) = pantry.take(FoodKind::Animal, 2) {
                    return Meal::Ate(portion);
                }
            }
            eat(pantry, FoodKind::Animal, 1)
        }
    }
}

fn eat(pantry: &mut Pantry<'_>, kind: FoodKind, units: u32) -> Meal {
    pantry.take(kind, units).map_or(Meal::Starved, Meal::Ate)
}

/// Pick the food kind an omnivore reaches for.
///
/// Local stock wins over the warehouse. Within a source the larger stock
/// wins, with ties going to animal.
fn omnivore_choice(pantry: &Pantry<'_>) -> FoodKind {
    let (animal, vegetal) = if pantry.local(FoodKind::Animal) > 0 || pantry.local(FoodKind::Vegetal) > 0 {
        (pantry.local(FoodKind::Animal), pantry.local(FoodKind::Vegetal))
    } else {
        (pantry.warehouse(FoodKind::Animal), pantry.warehouse(FoodKind::Vegetal))
    };

    if vegetal > animal {
        FoodKind::Vegetal
    } else {
        FoodKind::Animal
    }
}
