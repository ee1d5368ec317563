use crate::config::AppConfig;
use crate::genome::GenomeLogic;
use evosim_data::{
    Creature, CreatureId, CreatureKind, FoodHistory, Genome, IdCounter, Migration, Plant, PlantId,
};
use rand::Rng;
use std::f64::consts::TAU;

/// Builds a creature around an existing genome. Energy starts at half of
/// the maximum and the heading is random.
pub fn create_creature_with_genome<R: Rng>(
    ids: &mut IdCounter,
    x: f64,
    y: f64,
    genome: Genome,
    config: &AppConfig,
    rng: &mut R,
) -> Creature {
    let cfg = &config.creatures;
    let kind = genome.kind;
    Creature {
        id: CreatureId(ids.next_id()),
        x,
        y,
        direction: rng.gen_range(0.0..TAU),
        radius: cfg.radius(kind),
        speed_multiplier: cfg.speed_multiplier(kind),
        energy: cfg.max_energy * 0.5,
        max_energy: cfg.max_energy,
        age: 0,
        alive: true,
        food_eaten: 0,
        distance_traveled: 0.0,
        parent_id: None,
        generation: 0,
        children_count: 0,
        ticks_since_reproduction: 0,
        migration: Migration::default(),
        food_history: FoodHistory::new(cfg.food_history_len),
        food_gained: 0.0,
        reproduction_desire: 0.0,
        migration_urge: 0.0,
        genome,
    }
}

/// Creature of `kind` with a freshly initialized genome.
pub fn create_creature<R: Rng>(
    kind: CreatureKind,
    x: f64,
    y: f64,
    config: &AppConfig,
    ids: &mut IdCounter,
    rng: &mut R,
) -> Creature {
    let genome = Genome::new_random(kind, config, rng);
    create_creature_with_genome(ids, x, y, genome, config, rng)
}

pub fn create_plant(ids: &mut IdCounter, x: f64, y: f64) -> Plant {
    Plant {
        id: PlantId(ids.next_id()),
        x,
        y,
    }
}

/// Uniform coordinate in `[margin, size - margin]`, or the whole axis when
/// the margin does not fit.
pub fn spawn_coordinate<R: Rng>(size: f64, margin: f64, rng: &mut R) -> f64 {
    if size > 2.0 * margin {
        rng.gen_range(margin..=size - margin)
    } else if size > 0.0 {
        rng.gen_range(0.0..size)
    } else {
        0.0
    }
}
