//! Headless BROADSIDE session.
//!
//! Usage: `broadside [CONFIG.json] [SECONDS]`
//!
//! Runs one session with the scripted autopilot at the real tick rate, printing
//! one JSON snapshot per simulated second to stdout. Logging goes to stderr
//! and is controlled by `RUST_LOG`.

use std::process::ExitCode;
use std::sync::mpsc;

use broadside_app::autopilot::Autopilot;
use broadside_app::game_loop;
use broadside_app::state::GameLoopCommand;
use broadside_core::commands::PlayerCommand;
use broadside_core::constants::TICK_RATE;
use broadside_core::enums::GamePhase;
use broadside_sim::SimConfig;

const DEFAULT_SECONDS: u64 = 60;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::from_path(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };
    let seconds = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seconds)) => seconds,
        Some(Err(err)) => {
            log::error!("invalid duration: {err}");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_SECONDS,
    };

    let (snapshot_tx, snapshot_rx) = mpsc::channel();
    let (cmd_tx, handle) = match game_loop::spawn_game_loop(config, snapshot_tx) {
        Ok(spawned) => spawned,
        Err(err) => {
            log::error!("failed to spawn game loop: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _ = cmd_tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartGame));

    let mut pilot = Autopilot::new();
    let mut last = None;
    for snapshot in snapshot_rx.iter() {
        if snapshot.phase == GamePhase::Lobby {
            continue;
        }
        let tick = snapshot.time.tick;
        if tick % u64::from(TICK_RATE) == 0 {
            match serde_json::to_string(&snapshot) {
                Ok(json) => println!("{json}"),
                Err(err) => log::warn!("snapshot serialization failed: {err}"),
            }
        }

        let _ = cmd_tx.send(GameLoopCommand::SetInput(pilot.steer(&snapshot)));

        let done = snapshot.phase == GamePhase::GameOver || tick >= seconds * u64::from(TICK_RATE);
        last = Some(snapshot);
        if done {
            break;
        }
    }

    let _ = cmd_tx.send(GameLoopCommand::Shutdown);
    if handle.join().is_err() {
        log::error!("game loop thread panicked");
        return ExitCode::FAILURE;
    }

    if let Some(snapshot) = last {
        let stats = &snapshot.stats;
        log::info!(
            "Session over after {:.1}s: score {}, {} enemies sunk, {} shots, {} bombs, {} skittles, {} powerups",
            stats.elapsed_secs,
            snapshot.score,
            stats.enemies_destroyed,
            stats.shots_fired,
            stats.bombs_destroyed,
            stats.skittles_hit,
            stats.powerups_collected
        );
    }
    ExitCode::SUCCESS
}
