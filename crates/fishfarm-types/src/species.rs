//! Species descriptors and the built-in species catalog.
//!
//! A [`Species`] is immutable once loaded. Every fish holds an
//! `Arc<Species>` pointing at the catalog entry, so all fish of a species
//! share one descriptor and comparing species is a name comparison.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::enums::{DietClass, Habitat};

/// Static description of a farmable species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    /// Common name, unique within a catalog.
    pub name: String,
    /// Binomial name.
    pub scientific_name: String,
    /// Age in days at which the fish is considered mature.
    pub maturity_age: u32,
    /// Days between two fertility events once mature.
    pub reproduction_cycle_length: u32,
    /// Offspring produced by one fertile female per spawn.
    pub eggs_per_reproduction: u32,
    /// Feeding behavior.
    pub diet_class: DietClass,
    /// Coins paid to buy one fish.
    pub purchase_cost: u64,
    /// Coins earned when one fish is sold.
    pub sale_value: u64,
    /// Age in days at which a fish is harvested and sold.
    pub sale_age_threshold: u32,
    /// Water the species lives in.
    pub habitat: Habitat,
}

impl Species {
    /// Whether two descriptors name the same species.
    pub fn same_species(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Row of the built-in catalog table.
struct CatalogRow {
    name: &'static str,
    scientific_name: &'static str,
    maturity_age: u32,
    reproduction_cycle_length: u32,
    eggs_per_reproduction: u32,
    diet_class: DietClass,
    purchase_cost: u64,
    sale_value: u64,
    sale_age_threshold: u32,
    habitat: Habitat,
}

/// Built-in species shipped with the simulation.
const BUILTIN_SPECIES: &[CatalogRow] = &[
    CatalogRow {
        name: "Carpa",
        scientific_name: "Cyprinus carpio",
        maturity_age: 5,
        reproduction_cycle_length: 3,
        eggs_per_reproduction: 4,
        diet_class: DietClass::Omnivore,
        purchase_cost: 20,
        sale_value: 40,
        sale_age_threshold: 12,
        habitat: Habitat::River,
    },
    CatalogRow {
        name: "Carpa plateada",
        scientific_name: "Hypophthalmichthys molitrix",
        maturity_age: 6,
        reproduction_cycle_length: 4,
        eggs_per_reproduction: 6,
        diet_class: DietClass::FilterFeeder,
        purchase_cost: 25,
        sale_value: 55,
        sale_age_threshold: 14,
        habitat: Habitat::River,
    },
    CatalogRow {
        name: "Trucha arcoiris",
        scientific_name: "Oncorhynchus mykiss",
        maturity_age: 7,
        reproduction_cycle_length: 4,
        eggs_per_reproduction: 3,
        diet_class: DietClass::Carnivore,
        purchase_cost: 40,
        sale_value: 90,
        sale_age_threshold: 15,
        habitat: Habitat::River,
    },
    CatalogRow {
        name: "Tilapia del Nilo",
        scientific_name: "Oreochromis niloticus",
        maturity_age: 4,
        reproduction_cycle_length: 2,
        eggs_per_reproduction: 5,
        diet_class: DietClass::Omnivore,
        purchase_cost: 15,
        sale_value: 30,
        sale_age_threshold: 10,
        habitat: Habitat::River,
    },
    CatalogRow {
        name: "Lucio del norte",
        scientific_name: "Esox lucius",
        maturity_age: 9,
        reproduction_cycle_length: 5,
        eggs_per_reproduction: 2,
        diet_class: DietClass::ActiveCarnivore,
        purchase_cost: 70,
        sale_value: 160,
        sale_age_threshold: 18,
        habitat: Habitat::River,
    },
    CatalogRow {
        name: "Salmon atlantico",
        scientific_name: "Salmo salar",
        maturity_age: 8,
        reproduction_cycle_length: 5,
        eggs_per_reproduction: 4,
        diet_class: DietClass::Carnivore,
        purchase_cost: 60,
        sale_value: 140,
        sale_age_threshold: 18,
        habitat: Habitat::Both,
    },
    CatalogRow {
        name: "Lubina rayada",
        scientific_name: "Morone saxatilis",
        maturity_age: 8,
        reproduction_cycle_length: 4,
        eggs_per_reproduction: 3,
        diet_class: DietClass::Carnivore,
        purchase_cost: 50,
        sale_value: 115,
        sale_age_threshold: 16,
        habitat: Habitat::Both,
    },
    CatalogRow {
        name: "Dorada",
        scientific_name: "Sparus aurata",
        maturity_age: 7,
        reproduction_cycle_length: 4,
        eggs_per_reproduction: 5,
        diet_class: DietClass::Omnivore,
        purchase_cost: 35,
        sale_value: 80,
        sale_age_threshold: 15,
        habitat: Habitat::Sea,
    },
    CatalogRow {
        name: "Caballa",
        scientific_name: "Scomber scombrus",
        maturity_age: 5,
        reproduction_cycle_length: 3,
        eggs_per_reproduction: 8,
        diet_class: DietClass::ActiveCarnivore,
        purchase_cost: 20,
        sale_value: 45,
        sale_age_threshold: 11,
        habitat: Habitat::Sea,
    },
    CatalogRow {
        name: "Arenque del Atlantico",
        scientific_name: "Clupea harengus",
        maturity_age: 4,
        reproduction_cycle_length: 3,
        eggs_per_reproduction: 10,
        diet_class: DietClass::FilterFeeder,
        purchase_cost: 10,
        sale_value: 25,
        sale_age_threshold: 9,
        habitat: Habitat::Sea,
    },
    CatalogRow {
        name: "Rodaballo",
        scientific_name: "Scophthalmus maximus",
        maturity_age: 10,
        reproduction_cycle_length: 6,
        eggs_per_reproduction: 3,
        diet_class: DietClass::Carnivore,
        purchase_cost: 90,
        sale_value: 210,
        sale_age_threshold: 20,
        habitat: Habitat::Sea,
    },
    CatalogRow {
        name: "Besugo",
        scientific_name: "Pagellus bogaraveo",
        maturity_age: 6,
        reproduction_cycle_length: 4,
        eggs_per_reproduction: 4,
        diet_class: DietClass::Omnivore,
        purchase_cost: 30,
        sale_value: 70,
        sale_age_threshold: 14,
        habitat: Habitat::Sea,
    },
];

/// Read-only lookup table of species by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesCatalog {
    species: BTreeMap<String, Arc<Species>>,
}

impl SpeciesCatalog {
    /// Create an empty catalog.
    pub const fn new() -> Self {
        Self {
            species: BTreeMap::new(),
        }
    }

    /// Create a catalog holding every built-in species.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for row in BUILTIN_SPECIES {
            catalog.insert(Species {
                name: row.name.to_owned(),
                scientific_name: row.scientific_name.to_owned(),
                maturity_age: row.maturity_age,
                reproduction_cycle_length: row.reproduction_cycle_length,
                eggs_per_reproduction: row.eggs_per_reproduction,
                diet_class: row.diet_class,
                purchase_cost: row.purchase_cost,
                sale_value: row.sale_value,
                sale_age_threshold: row.sale_age_threshold,
                habitat: row.habitat,
            });
        }
        catalog
    }

    /// Add a species, replacing any existing entry with the same name.
    ///
    /// Returns the previous entry, if there was one.
    pub fn insert(&mut self, species: Species) -> Option<Arc<Species>> {
        self.species.insert(species.name.clone(), Arc::new(species))
    }

    /// Look up a species by its common name.
    pub fn get(&self, name: &str) -> Option<Arc<Species>> {
        self.species.get(name).cloned()
    }

    /// Number of species in the catalog.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Iterate over all species in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Species>> {
        self.species.values()
    }
}
