//! Terrain system for BROADSIDE.
//!
//! Procedural mountain and rock layout over a disc-shaped map, perturbed cone
//! meshes, rise-from-water animation, and approximate box collision.

pub use broadside_core as core;

pub mod field;
pub mod formation;
pub mod generator;
pub mod mesh;
pub mod palette;

// Re-export key types for convenience.
pub use field::TerrainField;
pub use formation::{collision_box_from_visual, Formation};
pub use generator::{generate, TerrainParams};
