pub mod graph;
pub mod registry;
pub mod resources;
pub mod rng;
pub mod time;
