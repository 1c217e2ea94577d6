pub mod entity;
pub mod grid;
pub mod rng;
pub mod rules;
