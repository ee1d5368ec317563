//! Configuration management for simulation parameters.
//!
//! [`AppConfig`] is a strongly-typed value object built once at startup and
//! passed by reference into every component. It can be assembled from any
//! [`ConfigLookup`] source (dotted key paths with caller-supplied defaults),
//! most commonly a parsed `config.toml`.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. Keys present in the lookup source (override defaults)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 1200
//! height = 800
//! initial_plants = 120
//! seed = 42
//!
//! [creatures]
//! max_energy = 100.0
//!
//! [evolution]
//! mutation_rate = 0.3
//! ```

use crate::error::{Result, SimError};
use evosim_data::CreatureKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only accessor over dotted configuration keys.
pub trait ConfigLookup {
    /// Returns the numeric value at `key`, if present.
    fn lookup(&self, key: &str) -> Option<f64>;

    /// Returns the value at `key`, or `default` when absent.
    fn get(&self, key: &str, default: f64) -> f64 {
        self.lookup(key).unwrap_or(default)
    }
}

impl ConfigLookup for toml::Value {
    fn lookup(&self, key: &str) -> Option<f64> {
        let value = key
            .split('.')
            .try_fold(self, |node, segment| node.get(segment))?;
        match value {
            toml::Value::Integer(i) => Some(*i as f64),
            toml::Value::Float(f) => Some(*f),
            toml::Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl ConfigLookup for HashMap<String, f64> {
    fn lookup(&self, key: &str) -> Option<f64> {
        self.get(key).copied()
    }
}

/// World dimensions and plant resources.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub initial_plants: usize,
    pub plant_energy: f64,
    /// Chance per tick that one plant regrows.
    pub plant_growth_rate: f64,
    /// Share of regrown plants placed near an existing plant.
    pub plant_cluster_chance: f64,
    pub plant_cluster_radius: f64,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            initial_plants: 120,
            plant_energy: 30.0,
            plant_growth_rate: 0.3,
            plant_cluster_chance: 0.6,
            plant_cluster_radius: 40.0,
            seed: 0,
        }
    }
}

/// Creature physiology and behavior constants.
///
/// Kind-specific values come in herbivore/carnivore pairs; use the accessor
/// methods to pick by [`CreatureKind`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CreatureConfig {
    pub initial_herbivores: usize,
    pub initial_carnivores: usize,
    pub max_energy: f64,
    pub herbivore_radius: f64,
    pub carnivore_radius: f64,
    pub herbivore_speed: f64,
    pub carnivore_speed: f64,
    pub max_turn_rate: f64,
    pub max_speed: f64,
    pub move_cost: f64,
    pub turn_cost: f64,
    pub carnivore_cost_factor: f64,
    pub base_metabolism: f64,
    pub eat_margin: f64,
    pub prey_energy: f64,
    pub herbivore_reproduction_energy: f64,
    pub carnivore_reproduction_energy: f64,
    pub herbivore_min_reproduction_age: u64,
    pub carnivore_min_reproduction_age: u64,
    pub reproduction_cost: f64,
    pub herbivore_fertility_age: u64,
    pub carnivore_fertility_age: u64,
    pub senescence_cost_rate: f64,
    pub reproduction_desire_threshold: f64,
    pub herbivore_reproduction_interval: u64,
    pub carnivore_reproduction_interval: u64,
    pub herbivore_food_target: f64,
    pub carnivore_food_target: f64,
    pub food_history_len: usize,
    pub food_history_min: usize,
    pub density_normalization: f64,
    pub offspring_offset: f64,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            initial_herbivores: 30,
            initial_carnivores: 8,
            max_energy: 100.0,
            herbivore_radius: 8.0,
            carnivore_radius: 10.0,
            herbivore_speed: 1.0,
            carnivore_speed: 1.15,
            max_turn_rate: 0.2,
            max_speed: 2.0,
            move_cost: 0.05,
            turn_cost: 0.03,
            carnivore_cost_factor: 0.9,
            base_metabolism: 0.05,
            eat_margin: 5.0,
            prey_energy: 50.0,
            herbivore_reproduction_energy: 60.0,
            carnivore_reproduction_energy: 70.0,
            herbivore_min_reproduction_age: 100,
            carnivore_min_reproduction_age: 150,
            reproduction_cost: 30.0,
            herbivore_fertility_age: 800,
            carnivore_fertility_age: 1000,
            senescence_cost_rate: 0.02,
            reproduction_desire_threshold: 0.5,
            herbivore_reproduction_interval: 200,
            carnivore_reproduction_interval: 300,
            herbivore_food_target: 0.5,
            carnivore_food_target: 0.3,
            food_history_len: 100,
            food_history_min: 20,
            density_normalization: 10.0,
            offspring_offset: 30.0,
        }
    }
}

impl CreatureConfig {
    #[must_use]
    pub fn radius(&self, kind: CreatureKind) -> f64 {
        match kind {
            CreatureKind::Herbivore => self.herbivore_radius,
            CreatureKind::Carnivore => self.carnivore_radius,
        }
    }

    #[must_use]
    pub fn speed_multiplier(&self, kind: CreatureKind) -> f64 {
        match kind {
            CreatureKind::Herbivore => self.herbivore_speed,
            CreatureKind::Carnivore => self.carnivore_speed,
        }
    }

    /// Multiplier applied to movement energy cost.
    #[must_use]
    pub fn cost_factor(&self, kind: CreatureKind) -> f64 {
        match kind {
            CreatureKind::Herbivore => 1.0,
            CreatureKind::Carnivore => self.carnivore_cost_factor,
        }
    }

    #[must_use]
    pub fn reproduction_energy(&self, kind: CreatureKind) -> f64 {
        match kind {
            CreatureKind::Herbivore => self.herbivore_reproduction_energy,
            CreatureKind::Carnivore => self.carnivore_reproduction_energy,
        }
    }

    #[must_use]
    pub fn min_reproduction_age(&self, kind: CreatureKind) -> u64 {
        match kind {
            CreatureKind::Herbivore => self.herbivore_min_reproduction_age,
            CreatureKind::Carnivore => self.carnivore_min_reproduction_age,
        }
    }

    #[must_use]
    pub fn fertility_age(&self, kind: CreatureKind) -> u64 {
        match kind {
            CreatureKind::Herbivore => self.herbivore_fertility_age,
            CreatureKind::Carnivore => self.carnivore_fertility_age,
        }
    }

    #[must_use]
    pub fn reproduction_interval(&self, kind: CreatureKind) -> u64 {
        match kind {
            CreatureKind::Herbivore => self.herbivore_reproduction_interval,
            CreatureKind::Carnivore => self.carnivore_reproduction_interval,
        }
    }

    #[must_use]
    pub fn food_target(&self, kind: CreatureKind) -> f64 {
        match kind {
            CreatureKind::Herbivore => self.herbivore_food_target,
            CreatureKind::Carnivore => self.carnivore_food_target,
        }
    }
}

/// Network shape and sensing range.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_neurons: usize,
    pub output_neurons: usize,
    /// Add-neuron mutation is blocked once this many neurons exist.
    pub max_neurons: usize,
    /// Sensing radius; also the spatial grid cell size.
    pub vision_range: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            input_neurons: 11,
            output_neurons: 4,
            max_neurons: 40,
            vision_range: 150.0,
        }
    }
}

/// Mutation rates and evolutionary-driver parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Chance a genome is mutated in `mutate_population`.
    pub mutation_rate: f64,
    pub weight_mutation_rate: f64,
    pub weight_mutation_strength: f64,
    pub add_neuron_rate: f64,
    pub remove_neuron_rate: f64,
    pub add_connection_rate: f64,
    pub species_divergence_threshold: f64,
    pub tournament_size: usize,
    pub elite_count: usize,
    pub stagnation_limit: u32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.3,
            weight_mutation_rate: 0.8,
            weight_mutation_strength: 0.3,
            add_neuron_rate: 0.03,
            remove_neuron_rate: 0.01,
            add_connection_rate: 0.05,
            species_divergence_threshold: 3.0,
            tournament_size: 3,
            elite_count: 2,
            stagnation_limit: 15,
        }
    }
}

/// Long-distance migration behavior.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MigrationConfig {
    pub urge_threshold: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub energy_cost: f64,
    pub speed_boost: f64,
    pub arrival_threshold: f64,
    pub cooldown: u32,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            urge_threshold: 0.8,
            min_distance: 200.0,
            max_distance: 400.0,
            energy_cost: 10.0,
            speed_boost: 2.5,
            arrival_threshold: 10.0,
            cooldown: 300,
        }
    }
}

/// Weights of the per-tick fitness blend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FitnessConfig {
    pub food_weight: f64,
    pub longevity_weight: f64,
    pub reproduction_weight: f64,
    pub neuron_penalty: f64,
    pub connection_penalty: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            food_weight: 10.0,
            longevity_weight: 0.1,
            reproduction_weight: 25.0,
            neuron_penalty: 0.5,
            connection_penalty: 0.05,
        }
    }
}

/// Extinction prevention thresholds.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    pub min_population: usize,
    pub herbivore_reinforcement: usize,
    pub carnivore_reinforcement: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            min_population: 2,
            herbivore_reinforcement: 3,
            carnivore_reinforcement: 2,
        }
    }
}

impl PopulationConfig {
    #[must_use]
    pub fn reinforcement(&self, kind: CreatureKind) -> usize {
        match kind {
            CreatureKind::Herbivore => self.herbivore_reinforcement,
            CreatureKind::Carnivore => self.carnivore_reinforcement,
        }
    }
}

/// Complete simulation configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub creatures: CreatureConfig,
    pub neural_network: NetworkConfig,
    pub evolution: EvolutionConfig,
    pub migration: MigrationConfig,
    pub fitness: FitnessConfig,
    pub population: PopulationConfig,
}

impl AppConfig {
    /// Builds a configuration from a dotted-key source, falling back to the
    /// defaults for every absent key, then validates it.
    pub fn from_lookup(source: &dyn ConfigLookup) -> Result<Self> {
        let d = Self::default();
        let f = |key: &str, default: f64| source.get(key, default);
        let n = |key: &str, default: usize| source.get(key, default as f64) as usize;
        let t = |key: &str, default: u64| source.get(key, default as f64) as u64;

        let config = Self {
            world: WorldConfig {
                width: f("world.width", d.world.width),
                height: f("world.height", d.world.height),
                initial_plants: n("world.initial_plants", d.world.initial_plants),
                plant_energy: f("world.plant_energy", d.world.plant_energy),
                plant_growth_rate: f("world.plant_growth_rate", d.world.plant_growth_rate),
                plant_cluster_chance: f("world.plant_cluster_chance", d.world.plant_cluster_chance),
                plant_cluster_radius: f("world.plant_cluster_radius", d.world.plant_cluster_radius),
                seed: t("world.seed", d.world.seed),
            },
            creatures: {
                let c = &d.creatures;
                CreatureConfig {
                    initial_herbivores: n("creatures.initial_herbivores", c.initial_herbivores),
                    initial_carnivores: n("creatures.initial_carnivores", c.initial_carnivores),
                    max_energy: f("creatures.max_energy", c.max_energy),
                    herbivore_radius: f("creatures.herbivore_radius", c.herbivore_radius),
                    carnivore_radius: f("creatures.carnivore_radius", c.carnivore_radius),
                    herbivore_speed: f("creatures.herbivore_speed", c.herbivore_speed),
                    carnivore_speed: f("creatures.carnivore_speed", c.carnivore_speed),
                    max_turn_rate: f("creatures.max_turn_rate", c.max_turn_rate),
                    max_speed: f("creatures.max_speed", c.max_speed),
                    move_cost: f("creatures.move_cost", c.move_cost),
                    turn_cost: f("creatures.turn_cost", c.turn_cost),
                    carnivore_cost_factor: f(
                        "creatures.carnivore_cost_factor",
                        c.carnivore_cost_factor,
                    ),
                    base_metabolism: f("creatures.base_metabolism", c.base_metabolism),
                    eat_margin: f("creatures.eat_margin", c.eat_margin),
                    prey_energy: f("creatures.prey_energy", c.prey_energy),
                    herbivore_reproduction_energy: f(
                        "creatures.herbivore_reproduction_energy",
                        c.herbivore_reproduction_energy,
                    ),
                    carnivore_reproduction_energy: f(
                        "creatures.carnivore_reproduction_energy",
                        c.carnivore_reproduction_energy,
                    ),
                    herbivore_min_reproduction_age: t(
                        "creatures.herbivore_min_reproduction_age",
                        c.herbivore_min_reproduction_age,
                    ),
                    carnivore_min_reproduction_age: t(
                        "creatures.carnivore_min_reproduction_age",
                        c.carnivore_min_reproduction_age,
                    ),
                    reproduction_cost: f("creatures.reproduction_cost", c.reproduction_cost),
                    herbivore_fertility_age: t(
                        "creatures.herbivore_fertility_age",
                        c.herbivore_fertility_age,
                    ),
                    carnivore_fertility_age: t(
                        "creatures.carnivore_fertility_age",
                        c.carnivore_fertility_age,
                    ),
                    senescence_cost_rate: f(
                        "creatures.senescence_cost_rate",
                        c.senescence_cost_rate,
                    ),
                    reproduction_desire_threshold: f(
                        "creatures.reproduction_desire_threshold",
                        c.reproduction_desire_threshold,
                    ),
                    herbivore_reproduction_interval: t(
                        "creatures.herbivore_reproduction_interval",
                        c.herbivore_reproduction_interval,
                    ),
                    carnivore_reproduction_interval: t(
                        "creatures.carnivore_reproduction_interval",
                        c.carnivore_reproduction_interval,
                    ),
                    herbivore_food_target: f(
                        "creatures.herbivore_food_target",
                        c.herbivore_food_target,
                    ),
                    carnivore_food_target: f(
                        "creatures.carnivore_food_target",
                        c.carnivore_food_target,
                    ),
                    food_history_len: n("creatures.food_history_len", c.food_history_len),
                    food_history_min: n("creatures.food_history_min", c.food_history_min),
                    density_normalization: f(
                        "creatures.density_normalization",
                        c.density_normalization,
                    ),
                    offspring_offset: f("creatures.offspring_offset", c.offspring_offset),
                }
            },
            neural_network: NetworkConfig {
                input_neurons: n("neural_network.input_neurons", d.neural_network.input_neurons),
                output_neurons: n(
                    "neural_network.output_neurons",
                    d.neural_network.output_neurons,
                ),
                max_neurons: n("neural_network.max_neurons", d.neural_network.max_neurons),
                vision_range: f("neural_network.vision_range", d.neural_network.vision_range),
            },
            evolution: {
                let e = &d.evolution;
                EvolutionConfig {
                    mutation_rate: f("evolution.mutation_rate", e.mutation_rate),
                    weight_mutation_rate: f(
                        "evolution.weight_mutation_rate",
                        e.weight_mutation_rate,
                    ),
                    weight_mutation_strength: f(
                        "evolution.weight_mutation_strength",
                        e.weight_mutation_strength,
                    ),
                    add_neuron_rate: f("evolution.add_neuron_rate", e.add_neuron_rate),
                    remove_neuron_rate: f("evolution.remove_neuron_rate", e.remove_neuron_rate),
                    add_connection_rate: f(
                        "evolution.add_connection_rate",
                        e.add_connection_rate,
                    ),
                    species_divergence_threshold: f(
                        "evolution.species_divergence_threshold",
                        e.species_divergence_threshold,
                    ),
                    tournament_size: n("evolution.tournament_size", e.tournament_size),
                    elite_count: n("evolution.elite_count", e.elite_count),
                    stagnation_limit: t("evolution.stagnation_limit", e.stagnation_limit.into())
                        as u32,
                }
            },
            migration: {
                let m = &d.migration;
                MigrationConfig {
                    urge_threshold: f("migration.urge_threshold", m.urge_threshold),
                    min_distance: f("migration.min_distance", m.min_distance),
                    max_distance: f("migration.max_distance", m.max_distance),
                    energy_cost: f("migration.energy_cost", m.energy_cost),
                    speed_boost: f("migration.speed_boost", m.speed_boost),
                    arrival_threshold: f("migration.arrival_threshold", m.arrival_threshold),
                    cooldown: t("migration.cooldown", m.cooldown.into()) as u32,
                }
            },
            fitness: FitnessConfig {
                food_weight: f("fitness.food_weight", d.fitness.food_weight),
                longevity_weight: f("fitness.longevity_weight", d.fitness.longevity_weight),
                reproduction_weight: f(
                    "fitness.reproduction_weight",
                    d.fitness.reproduction_weight,
                ),
                neuron_penalty: f("fitness.neuron_penalty", d.fitness.neuron_penalty),
                connection_penalty: f("fitness.connection_penalty", d.fitness.connection_penalty),
            },
            population: PopulationConfig {
                min_population: n("population.min_population", d.population.min_population),
                herbivore_reinforcement: n(
                    "population.herbivore_reinforcement",
                    d.population.herbivore_reinforcement,
                ),
                carnivore_reinforcement: n(
                    "population.carnivore_reinforcement",
                    d.population.carnivore_reinforcement,
                ),
            },
        };

        config
            .validate()
            .map_err(|e| SimError::invalid_config(e.to_string()))?;
        Ok(config)
    }

    /// Parses a TOML document and builds the configuration from it.
    pub fn from_toml(content: &str) -> Result<Self> {
        let value: toml::Value = toml::from_str(content)?;
        Self::from_lookup(&value)
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        let unit = |v: f64| (0.0..=1.0).contains(&v);

        // World validation
        anyhow::ensure!(
            self.world.width > 0.0 && self.world.height > 0.0,
            "World dimensions must be positive"
        );
        anyhow::ensure!(
            self.world.plant_energy >= 0.0,
            "Plant energy must be non-negative"
        );
        anyhow::ensure!(
            unit(self.world.plant_growth_rate),
            "Plant growth rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            unit(self.world.plant_cluster_chance),
            "Plant cluster chance must be in [0.0, 1.0]"
        );

        // Creature validation
        anyhow::ensure!(
            self.creatures.max_energy > 0.0,
            "Max energy must be positive"
        );
        anyhow::ensure!(
            self.creatures.herbivore_radius > 0.0 && self.creatures.carnivore_radius > 0.0,
            "Creature radii must be positive"
        );
        anyhow::ensure!(
            self.creatures.base_metabolism >= 0.0,
            "Base metabolism must be non-negative"
        );
        anyhow::ensure!(
            unit(self.creatures.reproduction_desire_threshold),
            "Reproduction desire threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.creatures.food_history_len > 0,
            "Food history length must be positive"
        );
        anyhow::ensure!(
            self.creatures.density_normalization > 0.0,
            "Density normalization must be positive"
        );
        anyhow::ensure!(
            self.creatures.herbivore_food_target > 0.0 && self.creatures.carnivore_food_target > 0.0,
            "Food targets must be positive"
        );

        // Network validation
        anyhow::ensure!(
            self.neural_network.input_neurons > 0,
            "Input neuron count must be positive"
        );
        anyhow::ensure!(
            self.neural_network.output_neurons > 0,
            "Output neuron count must be positive"
        );
        anyhow::ensure!(
            self.neural_network.max_neurons
                >= self.neural_network.input_neurons + self.neural_network.output_neurons,
            "Max neurons must cover inputs and outputs"
        );
        anyhow::ensure!(
            self.neural_network.vision_range > 0.0,
            "Vision range must be positive"
        );

        // Evolution validation
        let e = &self.evolution;
        for (rate, name) in [
            (e.mutation_rate, "Mutation rate"),
            (e.weight_mutation_rate, "Weight mutation rate"),
            (e.add_neuron_rate, "Add neuron rate"),
            (e.remove_neuron_rate, "Remove neuron rate"),
            (e.add_connection_rate, "Add connection rate"),
        ] {
            anyhow::ensure!(unit(rate), "{name} must be in [0.0, 1.0]");
        }
        anyhow::ensure!(
            e.weight_mutation_strength >= 0.0,
            "Weight mutation strength must be non-negative"
        );
        anyhow::ensure!(e.tournament_size > 0, "Tournament size must be positive");

        // Migration validation
        anyhow::ensure!(
            unit(self.migration.urge_threshold),
            "Migration urge threshold must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.migration.min_distance >= 0.0
                && self.migration.max_distance >= self.migration.min_distance,
            "Migration distance range is invalid"
        );

        Ok(())
    }

    /// SHA-256 digest of every section, for tagging runs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.world).as_bytes());
        hasher.update(format!("{:?}", self.creatures).as_bytes());
        hasher.update(format!("{:?}", self.neural_network).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hasher.update(format!("{:?}", self.migration).as_bytes());
        hasher.update(format!("{:?}", self.fitness).as_bytes());
        hasher.update(format!("{:?}", self.population).as_bytes());
        hex::encode(hasher.finalize())
    }
}
