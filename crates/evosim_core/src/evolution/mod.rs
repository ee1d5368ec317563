//! Operators consumed by an evolutionary driver: crossover, parent selection
//! and species clustering with fitness sharing.

pub mod crossover;
pub mod selection;
pub mod species;

pub use crossover::{compatibility_distance, crossover, mutate_population};
pub use selection::{select_parents, SelectionMethod};
pub use species::{Species, SpeciesManager};
