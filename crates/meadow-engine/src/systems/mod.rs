pub mod render;
pub mod rng;
