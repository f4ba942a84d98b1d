//! Game loop thread: runs the simulation engine at 60Hz and emits snapshots.
//!
//! The engine is created inside this thread and never leaves it. Commands
//! arrive via an `mpsc` channel and snapshots go out through another.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use broadside_core::constants::TICK_RATE;
use broadside_core::state::GameStateSnapshot;
use broadside_sim::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Longest wall-clock frame handed to the engine after a stall.
const MAX_FRAME: Duration = Duration::from_millis(250);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle. The loop stops on
/// `Shutdown`, when the command sender is dropped, or when the snapshot
/// receiver goes away.
pub fn spawn_game_loop(
    config: SimConfig,
    snapshot_tx: mpsc::Sender<GameStateSnapshot>,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("broadside-game-loop".into())
        .spawn(move || run_game_loop(config, cmd_rx, snapshot_tx))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Each iteration feeds the measured frame time to the engine.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snapshot_tx: mpsc::Sender<GameStateSnapshot>,
) {
    let mut engine = SimulationEngine::new(config);
    let mut last_frame = Instant::now();
    let mut next_tick_time = last_frame + TICK_DURATION;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::SetInput(input)) => engine.set_input(input),
                Ok(GameLoopCommand::Shutdown) => {
                    log::info!("Game loop shutting down at tick {}", engine.time().tick);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Sleep until the next tick
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
        next_tick_time += TICK_DURATION;

        // 3. Advance by the wall-clock frame (engine handles pause and time scale)
        let now = Instant::now();
        let frame = (now - last_frame).min(MAX_FRAME);
        last_frame = now;
        let snapshot = engine.step(frame.as_secs_f64());

        // 4. Hand the snapshot to the front end
        if snapshot_tx.send(snapshot).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_core::commands::{InputIntent, PlayerCommand};
    use broadside_core::enums::GamePhase;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartGame))
            .unwrap();
        tx.send(GameLoopCommand::SetInput(InputIntent {
            fire: true,
            ..Default::default()
        }))
        .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartGame)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::SetInput(InputIntent { fire: true, .. })
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_loop_starts_and_shuts_down() {
        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        let (cmd_tx, handle) = spawn_game_loop(SimConfig::default(), snapshot_tx).unwrap();

        let first = snapshot_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("loop should emit snapshots");
        assert_eq!(first.phase, GamePhase::Lobby);

        cmd_tx
            .send(GameLoopCommand::PlayerCommand(PlayerCommand::StartGame))
            .unwrap();
        let active = snapshot_rx
            .iter()
            .take(120)
            .find(|snap| snap.phase == GamePhase::Active)
            .expect("StartGame should reach the engine");
        assert!(active.player.is_some());

        cmd_tx.send(GameLoopCommand::Shutdown).unwrap();
        handle.join().expect("game loop thread should exit cleanly");
    }

    #[test]
    fn test_loop_stops_when_receiver_dropped() {
        let (snapshot_tx, snapshot_rx) = mpsc::channel();
        let (_cmd_tx, handle) = spawn_game_loop(SimConfig::default(), snapshot_tx).unwrap();
        drop(snapshot_rx);
        handle.join().expect("game loop thread should exit cleanly");
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.667ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
