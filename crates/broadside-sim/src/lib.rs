//! Simulation engine for BROADSIDE.
//!
//! Owns the hecs ECS world, runs the per-tick systems in a fixed order,
//! and produces GameStateSnapshots for the presentation layer.

pub mod config;
pub mod engine;
pub mod error;
pub mod session;
pub mod systems;
pub mod world_setup;

pub use broadside_core as core;
pub use config::{ConfigError, SimConfig};
pub use engine::SimulationEngine;
pub use error::SimError;

#[cfg(test)]
mod tests;
