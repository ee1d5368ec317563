use crate::config::AppConfig;
use crate::genome::GenomeLogic;
use crate::lifecycle::create_creature_with_genome;
use crate::spatial_hash::wrap_coordinate;
use evosim_data::{Creature, IdCounter};
use rand::Rng;

/// Energy, age and the evolved desire signal must all clear their
/// thresholds.
#[must_use]
pub fn can_reproduce(creature: &Creature, config: &AppConfig) -> bool {
    let cfg = &config.creatures;
    let kind = creature.kind();
    creature.alive
        && creature.energy > cfg.reproduction_energy(kind)
        && creature.age > cfg.min_reproduction_age(kind)
        && f64::from(creature.reproduction_desire) > cfg.reproduction_desire_threshold
}

/// Base cost plus a linear senescence surcharge past the fertility age.
#[must_use]
pub fn reproduction_cost(creature: &Creature, config: &AppConfig) -> f64 {
    let cfg = &config.creatures;
    let overage = creature.age.saturating_sub(cfg.fertility_age(creature.kind()));
    cfg.reproduction_cost + cfg.senescence_cost_rate * overage as f64
}

/// Pays the cost and returns a mutated offspring placed near the parent.
pub fn reproduce<R: Rng>(
    parent: &mut Creature,
    config: &AppConfig,
    ids: &mut IdCounter,
    rng: &mut R,
) -> Creature {
    let cost = reproduction_cost(parent, config);
    parent.energy = (parent.energy - cost).max(0.0);
    parent.ticks_since_reproduction = 0;
    parent.children_count += 1;

    let mut genome = parent.genome.copy();
    genome.mutate(config, rng);

    let offset = config.creatures.offspring_offset;
    let (dx, dy) = if offset > 0.0 {
        (rng.gen_range(-offset..=offset), rng.gen_range(-offset..=offset))
    } else {
        (0.0, 0.0)
    };
    let x = wrap_coordinate(parent.x + dx, config.world.width);
    let y = wrap_coordinate(parent.y + dy, config.world.height);

    let mut child = create_creature_with_genome(ids, x, y, genome, config, rng);
    child.generation = parent.generation + 1;
    child.parent_id = Some(parent.id);
    tracing::trace!(
        parent = parent.id.0,
        child = child.id.0,
        generation = child.generation,
        cost,
        "Offspring born"
    );
    child
}
