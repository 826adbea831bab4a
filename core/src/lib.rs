pub mod adapters;
pub mod config;
pub mod determinism;
pub mod export;
pub mod extraction;
pub mod inventory;
pub mod requirements;

pub mod error;
