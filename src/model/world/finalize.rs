use crate::model::lifecycle;
use crate::model::spatial_hash::wrap_coordinate;
use crate::model::systems::reproduction;
use crate::model::world::init::PLANT_SPAWN_MARGIN;
use crate::model::world::{TickOutcome, World};
use evosim_data::CreatureKind;
use rand::Rng;

impl World {
    /// Every living creature that can reproduce does so once. Offspring are
    /// appended after the scan, so they are not processed this tick.
    pub fn finalize_births(&mut self, outcome: &mut TickOutcome) {
        let mut newborns = Vec::new();
        for parent in self.creatures.iter_mut() {
            if reproduction::can_reproduce(parent, &self.config) {
                let child = reproduction::reproduce(
                    parent,
                    &self.config,
                    &mut self.creature_ids,
                    &mut self.rng,
                );
                newborns.push(child);
            }
        }
        outcome.born.extend(newborns.iter().map(|c| c.id));
        self.creatures.extend(newborns);
    }

    /// Moves dead creatures out of the collection into the outcome.
    pub fn finalize_deaths(&mut self, outcome: &mut TickOutcome) {
        let (alive, dead): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.creatures).into_iter().partition(|c| c.alive);
        self.creatures = alive;
        outcome.dead = dead;
    }

    /// Drops eaten plants and regrows at most one.
    pub fn finalize_plants(&mut self, outcome: &mut TickOutcome) {
        outcome.plants_eaten = self.eaten_plants.len();
        if !self.eaten_plants.is_empty() {
            let eaten = &self.eaten_plants;
            self.plants.retain(|p| !eaten.contains(&p.id));
            self.eaten_plants.clear();
        }
        self.regrow_plant();
    }

    /// With probability `plant_growth_rate`, adds one plant while below
    /// twice the initial count. Most new plants cluster around an
    /// existing one.
    pub fn regrow_plant(&mut self) -> bool {
        let world = &self.config.world;
        if self.plants.len() >= self.initial_plant_count * 2
            || !self.rng.gen_bool(world.plant_growth_rate)
        {
            return false;
        }

        if !self.plants.is_empty() && self.rng.gen_bool(world.plant_cluster_chance) {
            let anchor = self.plants[self.rng.gen_range(0..self.plants.len())];
            let r = world.plant_cluster_radius;
            let (dx, dy) = if r > 0.0 {
                (self.rng.gen_range(-r..=r), self.rng.gen_range(-r..=r))
            } else {
                (0.0, 0.0)
            };
            let x = wrap_coordinate(anchor.x + dx, self.width);
            let y = wrap_coordinate(anchor.y + dy, self.height);
            self.plants
                .push(lifecycle::create_plant(&mut self.plant_ids, x, y));
        } else {
            let x = lifecycle::spawn_coordinate(self.width, PLANT_SPAWN_MARGIN, &mut self.rng);
            let y = lifecycle::spawn_coordinate(self.height, PLANT_SPAWN_MARGIN, &mut self.rng);
            self.plants
                .push(lifecycle::create_plant(&mut self.plant_ids, x, y));
        }
        true
    }

    /// Spawns a batch of fresh creatures for any kind below the minimum
    /// population.
    pub fn finalize_extinction(&mut self, outcome: &mut TickOutcome) {
        for kind in [CreatureKind::Herbivore, CreatureKind::Carnivore] {
            if self.count_kind(kind) >= self.config.population.min_population {
                continue;
            }
            let batch = self.config.population.reinforcement(kind);
            for _ in 0..batch {
                self.spawn_creature(kind);
            }
            match kind {
                CreatureKind::Herbivore => outcome.reinforced_herbivores += batch,
                CreatureKind::Carnivore => outcome.reinforced_carnivores += batch,
            }
            tracing::info!(
                tick = self.tick,
                kind = kind.label(),
                count = batch,
                "Extinction prevented, reinforcements spawned"
            );
        }
    }
}
