//! Player commands and per-tick input intent sent to the simulation.
//!
//! Commands are queued and processed at the next tick boundary; input intent
//! is a level-triggered flag set sampled once per tick.

use serde::{Deserialize, Serialize};

/// All possible session-level player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Generate terrain, spawn the player and begin the session.
    StartGame,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
    /// Clear all entities and restart with a fresh player ship.
    ResetGame,
    /// Set time scale (1.0 = normal, 0.0 = frozen).
    SetTimeScale { scale: f64 },
}

/// Control flags for the player ship, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub turbo_active: bool,
}
