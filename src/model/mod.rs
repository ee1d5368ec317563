pub use evosim_core::{CreatureLogic, GenomeLogic, NetworkLogic};
pub mod brain {
    pub use evosim_core::brain::*;
}
pub mod config {
    pub use evosim_core::config::*;
}
pub mod evolution {
    pub use evosim_core::evolution::*;
}
pub mod genome {
    pub use evosim_core::genome::*;
}
pub mod history {
    pub use evosim_core::history::*;
}
pub mod lifecycle {
    pub use evosim_core::lifecycle::*;
}
pub mod spatial_hash {
    pub use evosim_core::spatial_hash::*;
}
pub mod systems {
    pub use evosim_core::systems::*;
}

pub mod state {
    pub use evosim_data::*;
}
pub mod world;
