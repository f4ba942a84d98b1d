//! Spawn director: brings in enemies and sea objects around the player on timers.
//!
//! The enemy interval shrinks after every spawn down to a floor, so pressure
//! builds the longer a session lasts.

use hecs::{Entity, World};
use rand::Rng;

use broadside_core::components::{SeaObject, Transform};
use broadside_core::constants::*;

use crate::config::SimConfig;
use crate::world_setup;

/// Spawn timers for the current session.
#[derive(Debug, Clone)]
pub struct Director {
    /// Current gap between enemy spawns.
    pub enemy_interval: f64,
    pub min_enemy_interval: f64,
    /// Time since the last enemy spawn.
    pub enemy_timer: f64,
    pub sea_object_interval: f64,
    /// Time since the last sea object spawn.
    pub sea_object_timer: f64,
    pub max_sea_objects: usize,
    pub randomize_enemy_stats: bool,
}

impl Director {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            enemy_interval: config.enemy_spawn_interval_secs,
            min_enemy_interval: config.enemy_spawn_interval_min_secs,
            enemy_timer: 0.0,
            sea_object_interval: config.sea_object_spawn_interval_secs,
            sea_object_timer: 0.0,
            max_sea_objects: config.max_sea_objects,
            randomize_enemy_stats: config.randomize_enemy_stats,
        }
    }

    /// Interval after one more enemy spawn.
    pub fn next_enemy_interval(&self) -> f64 {
        (self.enemy_interval * ENEMY_SPAWN_INTERVAL_DECAY).max(self.min_enemy_interval)
    }
}

/// Advance the spawn timers and spawn anything that is due.
/// Nothing spawns while the player ship is gone.
pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    director: &mut Director,
    player: Option<Entity>,
    dt: f64,
) {
    let Some(center) = player.and_then(|p| world.get::<&Transform>(p).ok().map(|t| t.position))
    else {
        return;
    };

    director.enemy_timer += dt;
    if director.enemy_timer >= director.enemy_interval {
        director.enemy_timer = 0.0;
        director.enemy_interval = director.next_enemy_interval();

        let position = world_setup::ring_position(
            rng,
            center,
            ENEMY_SPAWN_MIN_DISTANCE,
            ENEMY_SPAWN_MAX_DISTANCE,
        );
        let class = world_setup::random_ship_class(rng);
        let yaw = rng.gen_range(0.0..std::f64::consts::TAU);
        world_setup::spawn_enemy(
            world,
            rng,
            class,
            position,
            yaw,
            director.randomize_enemy_stats,
        );
    }

    director.sea_object_timer += dt;
    if director.sea_object_timer >= director.sea_object_interval {
        director.sea_object_timer = 0.0;

        let live = world.query::<&SeaObject>().iter().count();
        if live < director.max_sea_objects {
            let position = world_setup::ring_position(
                rng,
                center,
                SEA_OBJECT_SPAWN_MIN_DISTANCE,
                SEA_OBJECT_SPAWN_MAX_DISTANCE,
            );
            let kind = world_setup::random_sea_object_kind(rng);
            world_setup::spawn_sea_object(world, rng, kind, position);
            log::debug!("Spawned {kind:?} ({} live)", live + 1);
        }
    }
}
