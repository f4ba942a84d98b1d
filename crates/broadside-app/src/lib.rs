//! BROADSIDE headless runner.
//!
//! Drives the simulation engine on its own thread at a fixed tick rate and
//! hands snapshots back over a channel.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use broadside_core as core;
