//! Method-style access to the per-creature systems.

use crate::brain::NetworkLogic;
use crate::config::AppConfig;
use crate::systems::perception::{Decision, SenseContext};
use crate::systems::{action, biological, feeding, perception, reproduction};
use evosim_data::{Creature, IdCounter};
use rand::Rng;

pub trait CreatureLogic {
    /// Input vector for the network.
    fn sense(&self, ctx: &SenseContext) -> Vec<f32>;
    /// Sense and infer. A missing or stale cache is compiled on the fly.
    fn decide(&self, ctx: &SenseContext) -> Decision;
    /// Migration or ordinary movement for this tick.
    fn act<R: Rng>(&mut self, decision: &Decision, config: &AppConfig, rng: &mut R);
    /// Recompiles the network if needed, then `decide` followed by `act`.
    fn think_and_act<R: Rng>(&mut self, ctx: &SenseContext, rng: &mut R);
    fn update(&mut self, config: &AppConfig);
    fn can_reproduce(&self, config: &AppConfig) -> bool;
    fn reproduction_cost(&self, config: &AppConfig) -> f64;
    fn reproduce<R: Rng>(&mut self, config: &AppConfig, ids: &mut IdCounter, rng: &mut R) -> Creature;
    fn consume(&mut self, energy: f64);
    fn fitness(&self, config: &AppConfig) -> f64;
}

impl CreatureLogic for Creature {
    fn sense(&self, ctx: &SenseContext) -> Vec<f32> {
        perception::sense(self, ctx)
    }

    fn decide(&self, ctx: &SenseContext) -> Decision {
        perception::decide(self, ctx)
    }

    fn act<R: Rng>(&mut self, decision: &Decision, config: &AppConfig, rng: &mut R) {
        action::act(self, decision, config, rng);
    }

    fn think_and_act<R: Rng>(&mut self, ctx: &SenseContext, rng: &mut R) {
        self.genome.network.ensure_compiled();
        let decision = perception::decide(self, ctx);
        action::act(self, &decision, ctx.config, rng);
    }

    fn update(&mut self, config: &AppConfig) {
        biological::update(self, config);
    }

    fn can_reproduce(&self, config: &AppConfig) -> bool {
        reproduction::can_reproduce(self, config)
    }

    fn reproduction_cost(&self, config: &AppConfig) -> f64 {
        reproduction::reproduction_cost(self, config)
    }

    fn reproduce<R: Rng>(&mut self, config: &AppConfig, ids: &mut IdCounter, rng: &mut R) -> Creature {
        reproduction::reproduce(self, config, ids, rng)
    }

    fn consume(&mut self, energy: f64) {
        feeding::consume(self, energy);
    }

    fn fitness(&self, config: &AppConfig) -> f64 {
        biological::fitness(self, &config.fitness)
    }
}
