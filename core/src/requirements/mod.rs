pub mod clarity;
pub mod classifier;
pub mod dialect;
pub mod generator;
pub mod model;
pub mod refinement;
pub mod rules;
