use crate::model::brain::NetworkLogic;
use crate::model::systems::perception::{self, SenseContext};
use crate::model::systems::{action, biological, feeding};
use crate::model::world::{TickOutcome, World};

impl World {
    /// Advances the simulation by one tick.
    ///
    /// The pipeline runs in a fixed order:
    /// - rebuild the spatial grid from living creatures and plants
    /// - decide for every living creature against that snapshot
    /// - apply movement, feeding and aging sequentially in collection order
    /// - append offspring, remove the dead, compact eaten plants
    /// - regrow plants and reinforce endangered kinds
    pub fn update(&mut self) -> TickOutcome {
        self.tick += 1;
        let mut outcome = TickOutcome {
            tick: self.tick,
            ..Default::default()
        };

        self.pass_spatial_indexing();
        self.pass_decisions();
        self.pass_apply();

        self.finalize_births(&mut outcome);
        self.finalize_deaths(&mut outcome);
        self.finalize_plants(&mut outcome);
        self.finalize_extinction(&mut outcome);

        tracing::debug!(
            tick = self.tick,
            creatures = self.creatures.len(),
            plants = self.plants.len(),
            born = outcome.born.len(),
            dead = outcome.dead.len(),
            "Tick complete"
        );
        outcome
    }

    pub(crate) fn pass_spatial_indexing(&mut self) {
        self.spatial_hash.rebuild(&self.creatures, &self.plants);
    }

    /// Sensing and inference. Reads only the grid and tick-start state, so
    /// it may run in parallel.
    pub(crate) fn pass_decisions(&mut self) {
        for c in self.creatures.iter_mut().filter(|c| c.alive) {
            c.genome.network.ensure_compiled();
        }
        let ctx = SenseContext {
            grid: &self.spatial_hash,
            config: &self.config,
        };
        self.decision_buffer = perception::decide_all(&self.creatures, &ctx);
    }

    /// Migration, movement, feeding and the end-of-tick update, one
    /// creature at a time in index order. A creature killed earlier in the
    /// pass is skipped.
    pub(crate) fn pass_apply(&mut self) {
        self.eaten_plants.clear();
        let decisions = std::mem::take(&mut self.decision_buffer);

        for (i, decision) in decisions.iter().enumerate() {
            if !self.creatures[i].alive {
                continue;
            }
            action::act(&mut self.creatures[i], decision, &self.config, &mut self.rng);

            feeding::feed(
                &mut self.creatures,
                i,
                &self.spatial_hash,
                &mut self.eaten_plants,
                &self.config,
            );

            biological::update(&mut self.creatures[i], &self.config);
        }

        self.decision_buffer = decisions;
    }
}
