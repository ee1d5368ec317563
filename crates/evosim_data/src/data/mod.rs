//! Core data structures for the evosim simulation.

pub mod creature;
pub mod genome;
pub mod network;
pub mod plant;
