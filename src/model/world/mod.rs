use crate::model::config::AppConfig;
use crate::model::spatial_hash::SpatialHash;
use crate::model::systems::perception::Decision;
use evosim_data::{Creature, CreatureId, IdCounter, Plant, PlantId};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

pub mod finalize;
pub mod init;
pub mod update;

/// What happened during one call to [`World::update`].
#[derive(Debug, Default)]
pub struct TickOutcome {
    pub tick: u64,
    /// Offspring appended this tick, in birth order.
    pub born: Vec<CreatureId>,
    /// Creatures removed this tick, with their final state.
    pub dead: Vec<Creature>,
    pub reinforced_herbivores: usize,
    pub reinforced_carnivores: usize,
    pub plants_eaten: usize,
}

/// Owns the creature and plant collections and drives the tick pipeline.
pub struct World {
    pub width: f64,
    pub height: f64,
    pub tick: u64,
    pub config: AppConfig,
    pub creatures: Vec<Creature>,
    pub plants: Vec<Plant>,
    pub spatial_hash: SpatialHash,
    pub rng: ChaCha8Rng,
    pub creature_ids: IdCounter,
    pub plant_ids: IdCounter,
    pub initial_plant_count: usize,
    eaten_plants: HashSet<PlantId>,
    decision_buffer: Vec<Decision>,
}

impl World {
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn living_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.alive).count()
    }

    pub fn count_kind(&self, kind: evosim_data::CreatureKind) -> usize {
        self.creatures
            .iter()
            .filter(|c| c.alive && c.kind() == kind)
            .count()
    }
}
