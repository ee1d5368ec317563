pub mod data;

pub use data::creature::{
    Creature, CreatureId, FoodHistory, IdCounter, Migration, MigrationState,
};
pub use data::genome::{CreatureKind, Genome};
pub use data::network::{
    CompiledNetwork, Connection, NeuralNetwork, Neuron, NeuronId, NeuronRole,
};
pub use data::plant::{Plant, PlantId};
