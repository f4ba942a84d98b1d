//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems in a fixed order, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use broadside_core::commands::{InputIntent, PlayerCommand};
use broadside_core::components::PlayerShip;
use broadside_core::constants::*;
use broadside_core::enums::GamePhase;
use broadside_core::state::GameStateSnapshot;
use broadside_core::types::SimTime;
use broadside_terrain::TerrainField;

use crate::config::SimConfig;
use crate::session::{Session, TickRoster};
use crate::systems;
use crate::systems::spawner::Director;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    terrain: TerrainField,
    command_queue: VecDeque<PlayerCommand>,
    input: InputIntent,
    turbo_was_active: bool,
    session: Session,
    director: Director,
    fps: f64,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let mut terrain = TerrainField::default();
        terrain.collision_enabled = config.terrain_collision;

        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            terrain,
            command_queue: VecDeque::new(),
            input: InputIntent::default(),
            turbo_was_active: false,
            session: Session::default(),
            director: Director::new(&config),
            fps: 0.0,
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Set the control flags sampled by the next tick.
    pub fn set_input(&mut self, input: InputIntent) {
        self.input = input;
    }

    /// Advance the simulation by one nominal tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.step(DT)
    }

    /// Advance the simulation by one frame of `frame_secs` wall-clock seconds.
    pub fn step(&mut self, frame_secs: f64) -> GameStateSnapshot {
        self.process_commands();

        if frame_secs > 0.0 {
            self.fps += (1.0 / frame_secs - self.fps) * FPS_SMOOTHING;
        }

        let dt = frame_secs * self.time_scale;
        if self.phase == GamePhase::Active && dt > 0.0 {
            let scale = systems::ship_motion::motion_scale(frame_secs, self.time_scale);
            self.run_systems(dt, scale);
            self.time.advance(dt);

            if self.session.game_over {
                self.phase = GamePhase::GameOver;
            }
        }

        let events = std::mem::take(&mut self.session.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            &self.session,
            &self.terrain,
            self.fps,
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Generated terrain. Empty until the game starts.
    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    /// The player's ship entity, if alive.
    pub fn player(&self) -> Option<Entity> {
        self.world
            .query::<&PlayerShip>()
            .iter()
            .next()
            .map(|(entity, _)| entity)
    }

    /// Mutable world access for test setups.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Mutable terrain access for test setups.
    #[cfg(test)]
    pub fn terrain_mut(&mut self) -> &mut TerrainField {
        &mut self.terrain
    }

    /// Mutable session access for test setups.
    #[cfg(test)]
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Mutable director access for test setups.
    #[cfg(test)]
    pub fn director_mut(&mut self) -> &mut Director {
        &mut self.director
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartGame => {
                if self.phase == GamePhase::Lobby {
                    self.terrain =
                        broadside_terrain::generate(&self.config.terrain, &mut self.rng);
                    self.terrain.collision_enabled = self.config.terrain_collision;
                    self.begin_session();
                    log::info!(
                        "Game started: seed {}, {} terrain formations",
                        self.config.seed,
                        self.terrain.len()
                    );
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::ResetGame => {
                if self.phase != GamePhase::Lobby {
                    self.begin_session();
                    log::info!("Game reset");
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
            }
        }
    }

    /// Clear every entity and counter, then spawn a fresh player ship.
    fn begin_session(&mut self) {
        self.world.clear();
        self.session = Session::default();
        self.director = Director::new(&self.config);
        self.time = SimTime::default();
        self.turbo_was_active = false;
        world_setup::spawn_player(
            &mut self.world,
            DVec3::ZERO,
            self.config.terrain.forward_heading,
        );
        self.phase = GamePhase::Active;
    }

    /// Run all systems in order.
    ///
    /// `dt` is scaled simulation time; `motion_scale` is the calibrated frame
    /// count ships integrate with.
    fn run_systems(&mut self, dt: f64, motion_scale: f64) {
        let roster = TickRoster::take(&self.world);
        let ships: Vec<Entity> = roster.ships().collect();

        // 1. Timed effects
        systems::effects::run(&mut self.world, &ships, dt, &mut self.session);

        // 2. Player control + motion
        if let Some(player) = roster.player {
            if let Err(err) = systems::player_control::run(
                &mut self.world,
                player,
                &self.input,
                &mut self.turbo_was_active,
                dt,
                &mut self.session,
            ) {
                log::warn!("Skipping player control: {err}");
            }
        }
        systems::ship_motion::run(
            &mut self.world,
            roster.player.as_slice(),
            roster.player,
            &self.terrain,
            dt,
            motion_scale,
            &mut self.session,
        );

        // 3. Enemy AI + motion
        systems::enemy_ai::run(
            &mut self.world,
            &roster.enemies,
            roster.player,
            &mut self.rng,
            dt,
            &mut self.session,
        );
        systems::ship_motion::run(
            &mut self.world,
            &roster.enemies,
            roster.player,
            &self.terrain,
            dt,
            motion_scale,
            &mut self.session,
        );

        // 4. Projectiles (motion + collision)
        systems::projectiles::run(&mut self.world, &roster, &self.terrain, dt, &mut self.session);

        // 5. Sea objects (motion + ship contact)
        systems::sea_objects::run(&mut self.world, &roster, dt, &mut self.session);

        // 6. Terrain rise
        let settled = self.terrain.update(dt);
        if settled > 0 {
            log::debug!(
                "{settled} formations settled ({}/{})",
                self.terrain.risen_count(),
                self.terrain.len()
            );
        }

        // 7. Spawning
        let player = self.player();
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.director,
            player,
            dt,
        );
    }
}
