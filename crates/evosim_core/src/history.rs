use crate::brain::NetworkLogic;
use evosim_data::{Creature, CreatureId, CreatureKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Rolling history length kept by [`EvolutionTracker`].
pub const HISTORY_LEN: usize = 1000;

/// Life record of one creature, opened at birth and closed at death.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreatureRecord {
    pub id: CreatureId,
    pub kind: CreatureKind,
    pub generation: u32,
    pub parent_id: Option<CreatureId>,
    pub birth_tick: u64,
    pub death_tick: Option<u64>,
    pub lifespan: u64,
    pub food_eaten: u32,
    pub children: u32,
    pub fitness: f64,
    pub neurons: usize,
    pub connections: usize,
}

impl CreatureRecord {
    pub fn is_alive(&self) -> bool {
        self.death_tick.is_none()
    }
}

/// Lineage graph and population statistics over a whole run.
#[derive(Debug, Default)]
pub struct EvolutionTracker {
    records: HashMap<CreatureId, CreatureRecord>,
    lineage: DiGraph<CreatureId, ()>,
    nodes: HashMap<CreatureId, NodeIndex>,
    pub population_history: VecDeque<usize>,
    pub herbivore_history: VecDeque<usize>,
    pub carnivore_history: VecDeque<usize>,
    pub avg_fitness_history: VecDeque<f64>,
    pub avg_age_history: VecDeque<f64>,
    total_births: u64,
    total_deaths: u64,
    max_generation: u32,
}

fn push_bounded<T>(history: &mut VecDeque<T>, value: T) {
    if history.len() == HISTORY_LEN {
        history.pop_front();
    }
    history.push_back(value);
}

impl EvolutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a record and links it to its parent when the parent is known.
    pub fn register_birth(&mut self, creature: &Creature, tick: u64) {
        if self.records.contains_key(&creature.id) {
            return;
        }
        let network = &creature.genome.network;
        self.records.insert(
            creature.id,
            CreatureRecord {
                id: creature.id,
                kind: creature.kind(),
                generation: creature.generation,
                parent_id: creature.parent_id,
                birth_tick: tick,
                death_tick: None,
                lifespan: 0,
                food_eaten: 0,
                children: 0,
                fitness: 0.0,
                neurons: network.neuron_count(),
                connections: network.enabled_connection_count(),
            },
        );

        let node = self.lineage.add_node(creature.id);
        self.nodes.insert(creature.id, node);
        if let Some(parent) = creature.parent_id.and_then(|p| self.nodes.get(&p)) {
            self.lineage.add_edge(*parent, node, ());
        }

        self.total_births += 1;
        self.max_generation = self.max_generation.max(creature.generation);
    }

    /// Closes the record of a dead creature. Unknown creatures are
    /// registered first so nothing is lost.
    pub fn register_death(&mut self, creature: &Creature, tick: u64) {
        if !self.records.contains_key(&creature.id) {
            self.register_birth(creature, tick.saturating_sub(creature.age));
        }
        let Some(record) = self.records.get_mut(&creature.id) else {
            return;
        };
        if record.death_tick.is_some() {
            return;
        }
        record.death_tick = Some(tick);
        record.lifespan = creature.age;
        record.food_eaten = creature.food_eaten;
        record.children = creature.children_count;
        record.fitness = creature.genome.fitness;
        self.total_deaths += 1;
    }

    /// Appends one sample to each rolling history.
    pub fn record_tick(&mut self, creatures: &[Creature]) {
        let living: Vec<&Creature> = creatures.iter().filter(|c| c.alive).collect();
        let herbivores = living
            .iter()
            .filter(|c| c.kind() == CreatureKind::Herbivore)
            .count();
        let n = living.len();
        let (avg_fitness, avg_age) = if n == 0 {
            (0.0, 0.0)
        } else {
            (
                living.iter().map(|c| c.genome.fitness).sum::<f64>() / n as f64,
                living.iter().map(|c| c.age as f64).sum::<f64>() / n as f64,
            )
        };

        push_bounded(&mut self.population_history, n);
        push_bounded(&mut self.herbivore_history, herbivores);
        push_bounded(&mut self.carnivore_history, n - herbivores);
        push_bounded(&mut self.avg_fitness_history, avg_fitness);
        push_bounded(&mut self.avg_age_history, avg_age);
    }

    pub fn record(&self, id: CreatureId) -> Option<&CreatureRecord> {
        self.records.get(&id)
    }

    fn best_of(&self, kind: CreatureKind) -> Option<&CreatureRecord> {
        self.records
            .values()
            .filter(|r| r.kind == kind && !r.is_alive())
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness).then(b.id.cmp(&a.id)))
    }

    /// Fittest dead herbivore.
    pub fn best_herbivore(&self) -> Option<&CreatureRecord> {
        self.best_of(CreatureKind::Herbivore)
    }

    /// Fittest dead carnivore.
    pub fn best_carnivore(&self) -> Option<&CreatureRecord> {
        self.best_of(CreatureKind::Carnivore)
    }

    pub fn longest_lived(&self) -> Option<&CreatureRecord> {
        self.records
            .values()
            .filter(|r| !r.is_alive())
            .max_by(|a, b| a.lifespan.cmp(&b.lifespan).then(b.id.cmp(&a.id)))
    }

    pub fn most_children(&self) -> Option<&CreatureRecord> {
        self.records
            .values()
            .filter(|r| !r.is_alive())
            .max_by(|a, b| a.children.cmp(&b.children).then(b.id.cmp(&a.id)))
    }

    /// The creature itself followed by its known ancestors, nearest first.
    pub fn lineage(&self, id: CreatureId) -> Vec<CreatureId> {
        let mut chain = Vec::new();
        let mut current = self.nodes.get(&id).copied();
        while let Some(node) = current {
            chain.push(self.lineage[node]);
            current = self
                .lineage
                .neighbors_directed(node, Direction::Incoming)
                .next();
        }
        chain
    }

    /// Known direct offspring of `id`, in birth order.
    pub fn children_of(&self, id: CreatureId) -> Vec<CreatureId> {
        let Some(&node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let mut children: Vec<CreatureId> = self
            .lineage
            .neighbors_directed(node, Direction::Outgoing)
            .map(|n| self.lineage[n])
            .collect();
        children.sort();
        children
    }

    /// The `n` fittest dead creatures, best first.
    pub fn top_performers(&self, n: usize) -> Vec<&CreatureRecord> {
        let mut dead: Vec<&CreatureRecord> =
            self.records.values().filter(|r| !r.is_alive()).collect();
        dead.sort_by(|a, b| b.fitness.total_cmp(&a.fitness).then(a.id.cmp(&b.id)));
        dead.truncate(n);
        dead
    }

    /// Lineage in Graphviz DOT format.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph Lineage {\n");
        for node in self.lineage.node_indices() {
            let id = self.lineage[node];
            let (label, color) = match self.records.get(&id) {
                Some(r) => (
                    format!("#{} g{}", id.0, r.generation),
                    match r.kind {
                        CreatureKind::Herbivore => "green",
                        CreatureKind::Carnivore => "red",
                    },
                ),
                None => (format!("#{}", id.0), "gray"),
            };
            dot.push_str(&format!("  n{} [label=\"{}\", color={}];\n", id.0, label, color));
        }
        for edge in self.lineage.raw_edges() {
            dot.push_str(&format!(
                "  n{} -> n{};\n",
                self.lineage[edge.source()].0,
                self.lineage[edge.target()].0
            ));
        }
        dot.push('}');
        dot
    }

    pub fn max_generation(&self) -> u32 {
        self.max_generation
    }

    pub fn total_births(&self) -> u64 {
        self.total_births
    }

    pub fn total_deaths(&self) -> u64 {
        self.total_deaths
    }

    /// Births minus deaths.
    pub fn living(&self) -> u64 {
        self.total_births.saturating_sub(self.total_deaths)
    }
}
