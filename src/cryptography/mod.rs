pub mod generator;
pub mod strength;
