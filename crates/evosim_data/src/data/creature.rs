use super::genome::{CreatureKind, Genome};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Creature identifier, assigned from a world-owned [`IdCounter`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureId(pub u64);

/// Monotonic id source. Ids are never reused.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Migration sub-state.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MigrationState {
    #[default]
    Idle,
    Initiating,
    Traveling,
    Cooldown,
}

/// Migration state plus its target and cooldown timer.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Migration {
    pub state: MigrationState,
    pub target: Option<(f64, f64)>,
    pub cooldown: u32,
}

impl Migration {
    #[must_use]
    pub fn is_migrating(&self) -> bool {
        matches!(
            self.state,
            MigrationState::Initiating | MigrationState::Traveling
        )
    }
}

/// Fixed-capacity window of per-tick food gains. Oldest samples drop first.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl FoodHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }
}

/// An autonomous agent: a genome plus physical and behavioral state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Creature {
    /// Unique creature identifier.
    pub id: CreatureId,
    /// X position in world units.
    pub x: f64,
    /// Y position in world units.
    pub y: f64,
    /// Facing direction in radians.
    pub direction: f64,
    /// Body radius.
    pub radius: f64,
    /// Kind-specific speed multiplier.
    pub speed_multiplier: f64,
    /// Current energy in `[0, max_energy]`.
    pub energy: f64,
    /// Energy ceiling.
    pub max_energy: f64,
    /// Ticks alive.
    pub age: u64,
    /// Cleared when energy runs out or the creature is eaten.
    pub alive: bool,
    /// Plants or prey consumed.
    pub food_eaten: u32,
    /// Cumulative distance moved.
    pub distance_traveled: f64,
    /// Parent identifier, `None` for seeded creatures.
    pub parent_id: Option<CreatureId>,
    /// Generation number (0 for seeded creatures).
    pub generation: u32,
    /// Offspring produced.
    pub children_count: u32,
    /// Ticks since the last reproduction (or birth).
    pub ticks_since_reproduction: u64,
    /// Migration sub-state.
    pub migration: Migration,
    /// Rolling window of per-tick food gains.
    pub food_history: FoodHistory,
    /// Energy gained from food during the current tick.
    pub food_gained: f64,
    /// Last reproduction-desire output, clamped to `[0, 1]`.
    pub reproduction_desire: f32,
    /// Last migration-urge output, clamped to `[0, 1]`.
    pub migration_urge: f32,
    /// The creature's genome.
    pub genome: Genome,
}

impl Creature {
    #[must_use]
    pub fn kind(&self) -> CreatureKind {
        self.genome.kind
    }

    #[must_use]
    pub fn energy_ratio(&self) -> f64 {
        if self.max_energy > 0.0 {
            self.energy / self.max_energy
        } else {
            0.0
        }
    }
}
