use crate::brain::{
    NetworkLogic, IN_BIAS, IN_DENSITY, IN_ENERGY, IN_FOOD_DX, IN_FOOD_DY, IN_PREY_DX, IN_PREY_DY,
    IN_READINESS, IN_SCARCITY, IN_THREAT_DX, IN_THREAT_DY, INPUT_LABELS, OUT_MIGRATE,
    OUT_REPRODUCE, OUT_SPEED, OUT_TURN,
};
use crate::config::AppConfig;
use crate::spatial_hash::{toroidal_delta, EntityKind, GridEntity, SpatialHash};
use evosim_data::{Creature, CreatureKind, FoodHistory};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Read-only view of the world used during the decision phase.
pub struct SenseContext<'a> {
    pub grid: &'a SpatialHash,
    pub config: &'a AppConfig,
}

/// Network outputs mapped onto actions.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Decision {
    /// Heading change in radians.
    pub turn: f64,
    /// Forward distance for this tick.
    pub speed: f64,
    pub reproduction_desire: f32,
    pub migration_urge: f32,
}

/// Food, threat and prey bucket for a creature kind.
#[must_use]
pub fn sensed_kinds(kind: CreatureKind) -> (EntityKind, Option<EntityKind>, Option<EntityKind>) {
    match kind {
        CreatureKind::Herbivore => (EntityKind::Plant, Some(EntityKind::Carnivore), None),
        CreatureKind::Carnivore => (EntityKind::Herbivore, None, Some(EntityKind::Herbivore)),
    }
}

/// Unit vector toward the nearest entity of `kind` in the 3×3 neighborhood,
/// or `(0, 0)` when there is none or it sits exactly on `(x, y)`.
#[must_use]
pub fn nearest_direction(
    grid: &SpatialHash,
    x: f64,
    y: f64,
    kind: EntityKind,
    exclude: Option<evosim_data::CreatureId>,
) -> (f64, f64) {
    let mut best: Option<(f64, f64, f64)> = None;
    grid.for_each_in_neighborhood(x, y, kind, |entity| {
        if let (GridEntity::Agent { id, .. }, Some(skip)) = (entity, exclude) {
            if *id == skip {
                return;
            }
        }
        let (ex, ey) = entity.position();
        let dx = toroidal_delta(x, ex, grid.width);
        let dy = toroidal_delta(y, ey, grid.height);
        let d2 = dx * dx + dy * dy;
        if best.map_or(true, |(_, _, b)| d2 < b) {
            best = Some((dx, dy, d2));
        }
    });

    match best {
        Some((dx, dy, d2)) if d2 > 0.0 => {
            let d = d2.sqrt();
            (dx / d, dy / d)
        }
        _ => (0.0, 0.0),
    }
}

/// Same-kind neighbors within `radius`, divided by `normalization`, capped at 1.
#[must_use]
pub fn local_density(creature: &Creature, grid: &SpatialHash, radius: f64, normalization: f64) -> f64 {
    let r2 = radius * radius;
    let mut count = 0usize;
    grid.for_each_in_neighborhood(creature.x, creature.y, creature.kind().into(), |entity| {
        if let GridEntity::Agent { id, x, y, .. } = *entity {
            if id == creature.id {
                return;
            }
            let dx = toroidal_delta(creature.x, x, grid.width);
            let dy = toroidal_delta(creature.y, y, grid.height);
            if dx * dx + dy * dy <= r2 {
                count += 1;
            }
        }
    });
    (count as f64 / normalization).min(1.0)
}

/// `1 - clamp(avg / target)`, or 0.5 before `min_samples` samples exist.
#[must_use]
pub fn food_scarcity(history: &FoodHistory, target: f64, min_samples: usize) -> f64 {
    if history.len() < min_samples || target <= 0.0 {
        return 0.5;
    }
    let avg = history.average().unwrap_or(0.0);
    1.0 - (avg / target).clamp(0.0, 1.0)
}

/// Builds the input vector, truncated to the configured input count.
#[must_use]
pub fn sense(creature: &Creature, ctx: &SenseContext) -> Vec<f32> {
    let cfg = &ctx.config.creatures;
    let kind = creature.kind();
    let (food, threat, prey) = sensed_kinds(kind);
    let direction = |target: Option<EntityKind>| match target {
        Some(k) => nearest_direction(ctx.grid, creature.x, creature.y, k, Some(creature.id)),
        None => (0.0, 0.0),
    };

    let food_dir = direction(Some(food));
    let threat_dir = direction(threat);
    let prey_dir = direction(prey);

    let interval = cfg.reproduction_interval(kind);
    let readiness = if interval == 0 {
        1.0
    } else {
        (creature.ticks_since_reproduction as f64 / interval as f64).clamp(0.0, 1.0)
    };

    let mut inputs = vec![0.0f32; INPUT_LABELS.len()];
    inputs[IN_BIAS] = 1.0;
    inputs[IN_ENERGY] = creature.energy_ratio() as f32;
    inputs[IN_FOOD_DX] = food_dir.0 as f32;
    inputs[IN_FOOD_DY] = food_dir.1 as f32;
    inputs[IN_THREAT_DX] = threat_dir.0 as f32;
    inputs[IN_THREAT_DY] = threat_dir.1 as f32;
    inputs[IN_PREY_DX] = prey_dir.0 as f32;
    inputs[IN_PREY_DY] = prey_dir.1 as f32;
    inputs[IN_DENSITY] = local_density(
        creature,
        ctx.grid,
        ctx.config.neural_network.vision_range,
        cfg.density_normalization,
    ) as f32;
    inputs[IN_SCARCITY] = food_scarcity(
        &creature.food_history,
        cfg.food_target(kind),
        cfg.food_history_min,
    ) as f32;
    inputs[IN_READINESS] = readiness as f32;

    inputs.truncate(ctx.config.neural_network.input_neurons);
    inputs
}

/// Maps raw outputs onto a [`Decision`]. Missing outputs read as 0.
#[must_use]
pub fn interpret_outputs(outputs: &[f32], creature: &Creature, config: &AppConfig) -> Decision {
    let cfg = &config.creatures;
    let out = |i: usize| outputs.get(i).copied();
    Decision {
        turn: out(OUT_TURN).map_or(0.0, |o| (f64::from(o) - 0.5) * 2.0 * cfg.max_turn_rate),
        speed: out(OUT_SPEED).map_or(0.0, |o| {
            f64::from(o) * cfg.max_speed * creature.speed_multiplier
        }),
        reproduction_desire: out(OUT_REPRODUCE).unwrap_or(0.0).clamp(0.0, 1.0),
        migration_urge: out(OUT_MIGRATE).unwrap_or(0.0).clamp(0.0, 1.0),
    }
}

/// Sense and infer. Uses the compiled network when it is current and
/// evaluates a temporary compilation otherwise.
#[must_use]
pub fn decide(creature: &Creature, ctx: &SenseContext) -> Decision {
    let inputs = sense(creature, ctx);
    let outputs = creature.genome.network.infer(&inputs);
    interpret_outputs(&outputs, creature, ctx.config)
}

/// Decision phase for a whole population. Dead creatures get a default
/// decision. Compile networks beforehand to avoid per-call compilation.
#[must_use]
pub fn decide_all(creatures: &[Creature], ctx: &SenseContext) -> Vec<Decision> {
    let run = |c: &Creature| {
        if c.alive {
            decide(c, ctx)
        } else {
            Decision::default()
        }
    };

    #[cfg(feature = "parallel")]
    {
        creatures.par_iter().map(run).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        creatures.iter().map(run).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::create_creature;
    use evosim_data::{CreatureId, IdCounter, PlantId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup() -> (AppConfig, ChaCha8Rng, IdCounter) {
        let mut config = AppConfig::default();
        config.world.width = 300.0;
        config.world.height = 300.0;
        (config, ChaCha8Rng::seed_from_u64(5), IdCounter::new())
    }

    #[test]
    fn test_nearest_direction_unit_or_zero() {
        let mut grid = SpatialHash::new(50.0, 300.0, 300.0);
        assert_eq!(
            nearest_direction(&grid, 10.0, 10.0, EntityKind::Plant, None),
            (0.0, 0.0)
        );
        grid.insert(GridEntity::Plant {
            id: PlantId(0),
            x: 30.0,
            y: 40.0,
        });
        let (dx, dy) = nearest_direction(&grid, 10.0, 10.0, EntityKind::Plant, None);
        assert!(((dx * dx + dy * dy).sqrt() - 1.0).abs() < 1e-9);
        assert!(dx > 0.0 && dy > 0.0);
    }

    #[test]
    fn test_nearest_direction_zero_distance() {
        let mut grid = SpatialHash::new(50.0, 300.0, 300.0);
        grid.insert(GridEntity::Plant {
            id: PlantId(0),
            x: 10.0,
            y: 10.0,
        });
        assert_eq!(
            nearest_direction(&grid, 10.0, 10.0, EntityKind::Plant, None),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_nearest_direction_uses_wraparound() {
        let mut grid = SpatialHash::new(50.0, 300.0, 300.0);
        grid.insert(GridEntity::Plant {
            id: PlantId(0),
            x: 290.0,
            y: 10.0,
        });
        let (dx, _) = nearest_direction(&grid, 10.0, 10.0, EntityKind::Plant, None);
        assert!(dx < 0.0, "shortest path crosses the left edge");
    }

    #[test]
    fn test_nearest_direction_skips_self() {
        let mut grid = SpatialHash::new(50.0, 300.0, 300.0);
        grid.insert(GridEntity::Agent {
            index: 0,
            id: CreatureId(7),
            x: 10.0,
            y: 10.0,
            kind: CreatureKind::Herbivore,
        });
        let dir = nearest_direction(
            &grid,
            10.0,
            10.0,
            EntityKind::Herbivore,
            Some(CreatureId(7)),
        );
        assert_eq!(dir, (0.0, 0.0));
    }

    #[test]
    fn test_scarcity_neutral_until_history() {
        let mut history = FoodHistory::new(100);
        assert_eq!(food_scarcity(&history, 0.5, 20), 0.5);
        for _ in 0..20 {
            history.push(0.0);
        }
        assert_eq!(food_scarcity(&history, 0.5, 20), 1.0);
        for _ in 0..100 {
            history.push(1.0);
        }
        assert_eq!(food_scarcity(&history, 0.5, 20), 0.0);
    }

    #[test]
    fn test_sense_layout_for_herbivore() {
        let (config, mut rng, mut ids) = setup();
        let creature = create_creature(CreatureKind::Herbivore, 100.0, 100.0, &config, &mut ids, &mut rng);
        let mut grid = SpatialHash::new(config.neural_network.vision_range, 300.0, 300.0);
        grid.rebuild(std::slice::from_ref(&creature), &[]);
        let ctx = SenseContext {
            grid: &grid,
            config: &config,
        };

        let inputs = sense(&creature, &ctx);
        assert_eq!(inputs.len(), config.neural_network.input_neurons);
        assert_eq!(inputs[IN_BIAS], 1.0);
        assert!((inputs[IN_ENERGY] - 0.5).abs() < 1e-6);
        assert_eq!(inputs[IN_PREY_DX], 0.0);
        assert_eq!(inputs[IN_PREY_DY], 0.0);
        assert_eq!(inputs[IN_DENSITY], 0.0);
        assert_eq!(inputs[IN_SCARCITY], 0.5);
        assert_eq!(inputs[IN_READINESS], 0.0);
    }

    #[test]
    fn test_sense_truncates_to_input_count() {
        let (mut config, mut rng, mut ids) = setup();
        config.neural_network.input_neurons = 4;
        let creature = create_creature(CreatureKind::Carnivore, 10.0, 10.0, &config, &mut ids, &mut rng);
        let grid = SpatialHash::new(150.0, 300.0, 300.0);
        let ctx = SenseContext {
            grid: &grid,
            config: &config,
        };
        assert_eq!(sense(&creature, &ctx).len(), 4);
    }

    #[test]
    fn test_interpret_outputs_defaults_missing() {
        let (config, mut rng, mut ids) = setup();
        let creature = create_creature(CreatureKind::Herbivore, 10.0, 10.0, &config, &mut ids, &mut rng);
        let d = interpret_outputs(&[0.5, 1.0], &creature, &config);
        assert!(d.turn.abs() < 1e-9);
        assert!((d.speed - config.creatures.max_speed * creature.speed_multiplier).abs() < 1e-9);
        assert_eq!(d.reproduction_desire, 0.0);
        assert_eq!(d.migration_urge, 0.0);
    }

    #[test]
    fn test_decide_all_matches_sequential() {
        let (config, mut rng, mut ids) = setup();
        let creatures: Vec<Creature> = (0..12)
            .map(|i| {
                let kind = if i % 3 == 0 {
                    CreatureKind::Carnivore
                } else {
                    CreatureKind::Herbivore
                };
                create_creature(kind, 20.0 * i as f64, 15.0 * i as f64, &config, &mut ids, &mut rng)
            })
            .collect();
        let mut grid = SpatialHash::new(150.0, 300.0, 300.0);
        grid.rebuild(&creatures, &[]);
        let ctx = SenseContext {
            grid: &grid,
            config: &config,
        };
        let all = decide_all(&creatures, &ctx);
        for (c, d) in creatures.iter().zip(&all) {
            assert_eq!(decide(c, &ctx), *d);
        }
    }
}
