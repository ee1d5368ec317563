use crate::config::AppConfig;
use crate::spatial_hash::{toroidal_delta, wrap_coordinate};
use crate::systems::perception::Decision;
use evosim_data::{Creature, MigrationState};
use rand::Rng;
use std::f64::consts::TAU;

/// Advances the migration state machine for one tick.
///
/// A running cooldown is counted down and blocks triggering. An idle
/// creature whose urge exceeds the threshold picks a target and pays the
/// departure cost. A traveling creature moves toward its target. Returns
/// whether migration movement replaced ordinary movement this tick.
pub fn handle_migration<R: Rng>(
    creature: &mut Creature,
    urge: f32,
    config: &AppConfig,
    rng: &mut R,
) -> bool {
    let m = &config.migration;

    if creature.migration.cooldown > 0 {
        creature.migration.cooldown -= 1;
    } else if f64::from(urge) > m.urge_threshold
        && creature.migration.state == MigrationState::Idle
    {
        creature.migration.state = MigrationState::Initiating;
        let heading = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(m.min_distance..=m.max_distance);
        let tx = wrap_coordinate(creature.x + heading.cos() * distance, config.world.width);
        let ty = wrap_coordinate(creature.y + heading.sin() * distance, config.world.height);
        creature.migration.target = Some((tx, ty));
        creature.energy = (creature.energy - m.energy_cost).max(0.0);
        creature.migration.state = MigrationState::Traveling;
        tracing::trace!(id = creature.id.0, tx, ty, "Migration started");
    }

    if creature.migration.state == MigrationState::Traveling {
        travel(creature, config);
        return true;
    }
    false
}

/// Moves toward the migration target at boosted speed; switches to cooldown
/// once within the arrival threshold.
fn travel(creature: &mut Creature, config: &AppConfig) {
    let m = &config.migration;
    let Some((tx, ty)) = creature.migration.target else {
        creature.migration.state = MigrationState::Idle;
        return;
    };
    let (w, h) = (config.world.width, config.world.height);

    let dx = toroidal_delta(creature.x, tx, w);
    let dy = toroidal_delta(creature.y, ty, h);
    let distance = (dx * dx + dy * dy).sqrt();

    if distance > m.arrival_threshold {
        let step = (config.creatures.max_speed * m.speed_boost * creature.speed_multiplier)
            .min(distance);
        creature.direction = dy.atan2(dx).rem_euclid(TAU);
        creature.x = wrap_coordinate(creature.x + dx / distance * step, w);
        creature.y = wrap_coordinate(creature.y + dy / distance * step, h);
        creature.distance_traveled += step;
        let cost = step * config.creatures.move_cost * config.creatures.cost_factor(creature.kind());
        creature.energy = (creature.energy - cost).max(0.0);
        if distance - step > m.arrival_threshold {
            return;
        }
    }

    creature.migration.target = None;
    creature.migration.state = MigrationState::Cooldown;
    creature.migration.cooldown = m.cooldown;
}

/// Applies turn and forward speed, wraps the position, and charges the
/// movement cost.
pub fn apply_movement(creature: &mut Creature, decision: &Decision, config: &AppConfig) {
    let cfg = &config.creatures;
    creature.direction = (creature.direction + decision.turn).rem_euclid(TAU);
    let dx = creature.direction.cos() * decision.speed;
    let dy = creature.direction.sin() * decision.speed;
    creature.x = wrap_coordinate(creature.x + dx, config.world.width);
    creature.y = wrap_coordinate(creature.y + dy, config.world.height);
    creature.distance_traveled += decision.speed.abs();

    let cost = (decision.speed.abs() * cfg.move_cost + decision.turn.abs() * cfg.turn_cost)
        * cfg.cost_factor(creature.kind());
    creature.energy = (creature.energy - cost).max(0.0);
}

/// Stores the evolved signals, runs migration, and falls back to ordinary
/// movement when not traveling.
pub fn act<R: Rng>(creature: &mut Creature, decision: &Decision, config: &AppConfig, rng: &mut R) {
    creature.reproduction_desire = decision.reproduction_desire;
    creature.migration_urge = decision.migration_urge;
    if !handle_migration(creature, decision.migration_urge, config, rng) {
        apply_movement(creature, decision, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::create_creature;
    use evosim_data::{CreatureKind, IdCounter};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn creature(kind: CreatureKind) -> (Creature, AppConfig, ChaCha8Rng) {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut ids = IdCounter::new();
        let c = create_creature(kind, 600.0, 400.0, &config, &mut ids, &mut rng);
        (c, config, rng)
    }

    #[test]
    fn test_movement_wraps_position() {
        let (mut c, config, _) = creature(CreatureKind::Herbivore);
        c.x = config.world.width - 1.0;
        c.direction = 0.0;
        let decision = Decision {
            speed: 3.0,
            ..Default::default()
        };
        apply_movement(&mut c, &decision, &config);
        assert!((c.x - 2.0).abs() < 1e-9);
        assert!((c.distance_traveled - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_carnivore_pays_less_to_move() {
        let (mut h, config, _) = creature(CreatureKind::Herbivore);
        let (mut c, _, _) = creature(CreatureKind::Carnivore);
        h.energy = 50.0;
        c.energy = 50.0;
        let decision = Decision {
            turn: 0.1,
            speed: 2.0,
            ..Default::default()
        };
        apply_movement(&mut h, &decision, &config);
        apply_movement(&mut c, &decision, &config);
        assert!(50.0 - c.energy < 50.0 - h.energy);
        let expected = 2.0 * 0.05 + 0.1 * 0.03;
        assert!((50.0 - h.energy - expected).abs() < 1e-9);
    }

    #[test]
    fn test_migration_full_cycle() {
        let (mut c, mut config, mut rng) = creature(CreatureKind::Herbivore);
        config.migration.cooldown = 4;
        c.energy = 100.0;

        assert!(handle_migration(&mut c, 0.95, &config, &mut rng));
        assert_eq!(c.migration.state, MigrationState::Traveling);
        assert!(c.energy < 100.0 - config.migration.energy_cost + 1e-9);
        let target = c.migration.target.expect("target chosen");
        let dx = toroidal_delta(600.0, target.0, config.world.width);
        let dy = toroidal_delta(400.0, target.1, config.world.height);
        let dist = (dx * dx + dy * dy).sqrt();
        assert!(dist >= config.migration.min_distance - 1e-6);
        assert!(dist <= config.migration.max_distance + 1e-6);

        let mut ticks = 0;
        while c.migration.state == MigrationState::Traveling && ticks < 1000 {
            handle_migration(&mut c, 0.0, &config, &mut rng);
            ticks += 1;
        }
        assert_eq!(c.migration.state, MigrationState::Cooldown);
        assert_eq!(c.migration.target, None);
        assert_eq!(c.migration.cooldown, 4);

        // Cooldown blocks re-triggering even with a strong urge.
        assert!(!handle_migration(&mut c, 1.0, &config, &mut rng));
        assert_eq!(c.migration.cooldown, 3);
    }

    #[test]
    fn test_low_urge_does_not_trigger() {
        let (mut c, config, mut rng) = creature(CreatureKind::Carnivore);
        assert!(!handle_migration(&mut c, 0.2, &config, &mut rng));
        assert_eq!(c.migration.state, MigrationState::Idle);
    }

    #[test]
    fn test_act_records_signals() {
        let (mut c, config, mut rng) = creature(CreatureKind::Herbivore);
        let decision = Decision {
            turn: 0.0,
            speed: 1.0,
            reproduction_desire: 0.7,
            migration_urge: 0.1,
        };
        act(&mut c, &decision, &config, &mut rng);
        assert_eq!(c.reproduction_desire, 0.7);
        assert_eq!(c.migration_urge, 0.1);
    }
}
