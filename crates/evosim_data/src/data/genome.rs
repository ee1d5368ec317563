use super::network::NeuralNetwork;
use serde::{Deserialize, Serialize};

/// Behavioral type of a creature. Fixes sensing targets and initial weight biases.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CreatureKind {
    Herbivore,
    Carnivore,
}

impl CreatureKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CreatureKind::Herbivore => "herbivore",
            CreatureKind::Carnivore => "carnivore",
        }
    }
}

/// Evolvable container pairing a network with fitness and cluster metadata.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genome {
    /// The controlling network.
    pub network: NeuralNetwork,
    /// Behavioral type.
    pub kind: CreatureKind,
    /// Fitness, recomputed every tick by the owning creature.
    pub fitness: f64,
    /// Species cluster assigned by speciation, if any.
    pub species_id: Option<u32>,
}
