//! # Evosim Core
//!
//! Simulation logic for a toroidal 2D world of herbivores and carnivores
//! whose behavior is driven by evolving neural networks.
//!
//! This crate contains:
//! - Growable neural networks with a compiled evaluation plan
//! - Genome construction and structural mutation
//! - Per-creature systems (perception, action, feeding, biology, reproduction)
//! - Spatial hashing for neighborhood queries
//! - Evolutionary operators (crossover, selection, speciation)
//! - Lineage tracking, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use evosim_core::brain::{NetworkLogic, NeuronRole};
//! use evosim_data::NeuralNetwork;
//!
//! let mut net = NeuralNetwork::default();
//! let a = net.add_neuron_with_bias(NeuronRole::Input, 0.0);
//! let b = net.add_neuron_with_bias(NeuronRole::Input, 0.0);
//! let out = net.add_neuron_with_bias(NeuronRole::Output, 0.0);
//! net.add_connection(a, out, 1.0, true);
//! net.add_connection(b, out, 1.0, true);
//!
//! let outputs = net.forward(&[0.5, 0.5]);
//! assert!((outputs[0] - 0.7311).abs() < 1e-3);
//! ```

/// Neural network growth, compilation and inference
pub mod brain;
/// Configuration loading and validation
pub mod config;
/// Method-style creature behavior
pub mod creature;
/// Error types
pub mod error;
/// Crossover, selection and speciation
pub mod evolution;
/// Genome construction, mutation and encoding
pub mod genome;
/// Lineage and population history
pub mod history;
/// Creature and plant construction
pub mod lifecycle;
/// Performance metrics and logging setup
pub mod metrics;
/// Toroidal bucket grid for proximity queries
pub mod spatial_hash;
/// Per-creature systems run by the world update
pub mod systems;

pub use brain::NetworkLogic;
pub use config::{AppConfig, ConfigLookup};
pub use creature::CreatureLogic;
pub use error::{Result, SimError};
pub use genome::GenomeLogic;
pub use history::EvolutionTracker;
pub use metrics::{init_logging, Metrics};
pub use spatial_hash::SpatialHash;
