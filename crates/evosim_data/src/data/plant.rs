use serde::{Deserialize, Serialize};

/// Stable plant identifier, unique within a world.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlantId(pub u64);

/// A plant: an id and a position. Consumed whole.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Plant {
    pub id: PlantId,
    pub x: f64,
    pub y: f64,
}
