use crate::config::AppConfig;
use crate::spatial_hash::{toroidal_delta, EntityKind, GridEntity, SpatialHash};
use evosim_data::{Creature, CreatureKind, PlantId};
use std::collections::HashSet;

/// What a creature ate during [`feed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meal {
    Plant(PlantId),
    /// Index of the killed herbivore in the creature collection.
    Prey(usize),
}

/// Feeding step for `creatures[index]`: herbivores eat the first uneaten
/// plant in reach and mark it in `eaten`, carnivores kill the first
/// reachable living herbivore. Dead or out-of-range creatures do nothing.
pub fn feed(
    creatures: &mut [Creature],
    index: usize,
    grid: &SpatialHash,
    eaten: &mut HashSet<PlantId>,
    config: &AppConfig,
) -> Option<Meal> {
    let creature = creatures.get(index).filter(|c| c.alive)?;
    match creature.kind() {
        CreatureKind::Herbivore => {
            let plant = find_plant(creature, grid, eaten, config)?;
            eaten.insert(plant);
            consume(&mut creatures[index], config.world.plant_energy);
            Some(Meal::Plant(plant))
        }
        CreatureKind::Carnivore => {
            let prey = find_prey(creature, grid, creatures)?;
            creatures[prey].alive = false;
            consume(&mut creatures[index], config.creatures.prey_energy);
            tracing::trace!(
                hunter = creatures[index].id.0,
                prey = creatures[prey].id.0,
                "Prey caught"
            );
            Some(Meal::Prey(prey))
        }
    }
}

/// First uneaten plant in the creature's own cell within
/// `radius + eat_margin`. Iteration order decides, not distance.
#[must_use]
pub fn find_plant(
    creature: &Creature,
    grid: &SpatialHash,
    eaten: &HashSet<PlantId>,
    config: &AppConfig,
) -> Option<PlantId> {
    let reach = creature.radius + config.creatures.eat_margin;
    grid.query_local_cell(creature.x, creature.y, EntityKind::Plant)
        .iter()
        .find_map(|entity| match *entity {
            GridEntity::Plant { id, x, y }
                if !eaten.contains(&id) && within(creature, x, y, reach, grid) =>
            {
                Some(id)
            }
            _ => None,
        })
}

/// Index of the first living herbivore in the creature's own cell whose
/// current position is within the sum of both radii.
#[must_use]
pub fn find_prey(creature: &Creature, grid: &SpatialHash, creatures: &[Creature]) -> Option<usize> {
    grid.query_local_cell(creature.x, creature.y, EntityKind::Herbivore)
        .iter()
        .find_map(|entity| match *entity {
            GridEntity::Agent { index, id, .. } => {
                let prey = creatures.get(index)?;
                let reach = creature.radius + prey.radius;
                (prey.id == id && prey.alive && within(creature, prey.x, prey.y, reach, grid))
                    .then_some(index)
            }
            GridEntity::Plant { .. } => None,
        })
}

/// Adds `energy`, capped at the maximum, and counts one food item.
pub fn consume(creature: &mut Creature, energy: f64) {
    let before = creature.energy;
    creature.energy = (creature.energy + energy).min(creature.max_energy);
    creature.food_gained += creature.energy - before;
    creature.food_eaten += 1;
}

fn within(creature: &Creature, x: f64, y: f64, reach: f64, grid: &SpatialHash) -> bool {
    let dx = toroidal_delta(creature.x, x, grid.width);
    let dy = toroidal_delta(creature.y, y, grid.height);
    dx * dx + dy * dy <= reach * reach
}
