use crate::model::config::AppConfig;
use crate::model::lifecycle;
use crate::model::spatial_hash::SpatialHash;
use crate::model::world::World;
use evosim_data::{CreatureKind, IdCounter};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// Margin kept between initial creatures and the world edge.
pub const CREATURE_SPAWN_MARGIN: f64 = 50.0;
/// Margin kept between plants and the world edge.
pub const PLANT_SPAWN_MARGIN: f64 = 10.0;

impl World {
    /// Validates `config` and seeds the initial population and plants.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.world.seed);
        let spatial_hash = SpatialHash::new(
            config.neural_network.vision_range,
            config.world.width,
            config.world.height,
        );

        let mut world = Self {
            width: config.world.width,
            height: config.world.height,
            tick: 0,
            initial_plant_count: config.world.initial_plants,
            creatures: Vec::new(),
            plants: Vec::new(),
            spatial_hash,
            rng,
            creature_ids: IdCounter::new(),
            plant_ids: IdCounter::new(),
            eaten_plants: HashSet::new(),
            decision_buffer: Vec::new(),
            config,
        };

        for _ in 0..world.config.creatures.initial_herbivores {
            world.spawn_creature(CreatureKind::Herbivore);
        }
        for _ in 0..world.config.creatures.initial_carnivores {
            world.spawn_creature(CreatureKind::Carnivore);
        }
        for _ in 0..world.initial_plant_count {
            world.spawn_random_plant();
        }

        tracing::info!(
            seed = world.config.world.seed,
            width = world.width,
            height = world.height,
            creatures = world.creatures.len(),
            plants = world.plants.len(),
            "World seeded"
        );
        Ok(world)
    }

    /// Adds a creature with a fresh genome at a random position away from
    /// the edges.
    pub fn spawn_creature(&mut self, kind: CreatureKind) -> evosim_data::CreatureId {
        let x = lifecycle::spawn_coordinate(self.width, CREATURE_SPAWN_MARGIN, &mut self.rng);
        let y = lifecycle::spawn_coordinate(self.height, CREATURE_SPAWN_MARGIN, &mut self.rng);
        let creature = lifecycle::create_creature(
            kind,
            x,
            y,
            &self.config,
            &mut self.creature_ids,
            &mut self.rng,
        );
        let id = creature.id;
        self.creatures.push(creature);
        id
    }

    /// Adds a plant at a uniformly random position.
    pub fn spawn_random_plant(&mut self) {
        let x = lifecycle::spawn_coordinate(self.width, PLANT_SPAWN_MARGIN, &mut self.rng);
        let y = lifecycle::spawn_coordinate(self.height, PLANT_SPAWN_MARGIN, &mut self.rng);
        self.plants
            .push(lifecycle::create_plant(&mut self.plant_ids, x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_population() {
        let config = AppConfig::default();
        let world = World::new(config.clone()).expect("Failed to create world");
        assert_eq!(
            world.count_kind(CreatureKind::Herbivore),
            config.creatures.initial_herbivores
        );
        assert_eq!(
            world.count_kind(CreatureKind::Carnivore),
            config.creatures.initial_carnivores
        );
        assert_eq!(world.plants.len(), config.world.initial_plants);
        for c in &world.creatures {
            assert!((50.0..=config.world.width - 50.0).contains(&c.x));
            assert!((50.0..=config.world.height - 50.0).contains(&c.y));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.world.width = 0.0;
        assert!(World::new(config).is_err());
    }
}
