//! Messages exchanged with the game loop thread.

use broadside_core::commands::{InputIntent, PlayerCommand};

/// Commands sent from the front end to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Replace the control flags sampled by the next tick.
    SetInput(InputIntent),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}
