use crate::brain::NetworkLogic;
use crate::config::{AppConfig, FitnessConfig};
use evosim_data::{Creature, MigrationState};

/// End-of-tick bookkeeping: aging, food history, cooldown, metabolism,
/// death check and fitness.
pub fn update(creature: &mut Creature, config: &AppConfig) {
    creature.age += 1;
    creature.ticks_since_reproduction += 1;

    creature.food_history.push(creature.food_gained);
    creature.food_gained = 0.0;

    if creature.migration.state == MigrationState::Cooldown {
        creature.migration.cooldown = creature.migration.cooldown.saturating_sub(1);
        if creature.migration.cooldown == 0 {
            creature.migration.state = MigrationState::Idle;
        }
    }

    creature.energy -= config.creatures.base_metabolism;
    if creature.energy <= 0.0 {
        creature.energy = 0.0;
        creature.alive = false;
    }

    creature.genome.fitness = fitness(creature, &config.fitness);
}

/// Food eaten per distance, longevity and offspring, minus a penalty on
/// network size.
#[must_use]
pub fn fitness(creature: &Creature, weights: &FitnessConfig) -> f64 {
    let efficiency = f64::from(creature.food_eaten) / (1.0 + creature.distance_traveled / 100.0);
    let network = &creature.genome.network;
    weights.food_weight * efficiency + weights.longevity_weight * creature.age as f64
        + weights.reproduction_weight * f64::from(creature.children_count)
        - weights.neuron_penalty * network.hidden_count() as f64
        - weights.connection_penalty * network.enabled_connection_count() as f64
}
