//! Enemy ship AI for BROADSIDE.
//!
//! Pure decision functions that turn an enemy's situation into helm and
//! gunnery orders. No ECS dependency; randomness is injected by the caller.

pub mod fsm;

pub use broadside_core as core;
