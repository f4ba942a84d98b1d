//! Per-session bookkeeping: score, counters, pending events and the tick roster.
//!
//! Stored in `SimulationEngine`, NOT as ECS entities.

use hecs::{Entity, World};

use broadside_core::components::{EnemyShip, PlayerShip, Projectile, SeaObject};
use broadside_core::events::SimEvent;
use broadside_core::state::StatsView;

/// Running score and counters for the current session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub score: u32,
    pub enemies_destroyed: u32,
    pub shots_fired: u32,
    pub skittles_hit: u32,
    pub bombs_destroyed: u32,
    pub powerups_collected: u32,
    /// Set when the player ship is destroyed.
    pub game_over: bool,
    /// Events emitted since the last snapshot.
    pub events: Vec<SimEvent>,
}

impl Session {
    /// Add points and notify the score sink.
    pub fn award(&mut self, points: u32) {
        self.score += points;
        self.events.push(SimEvent::ScoreChanged { score: self.score });
    }

    pub fn emit(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn stats(&self, fps: f64, elapsed_secs: f64) -> StatsView {
        StatsView {
            fps,
            elapsed_secs,
            enemies_destroyed: self.enemies_destroyed,
            shots_fired: self.shots_fired,
            skittles_hit: self.skittles_hit,
            bombs_destroyed: self.bombs_destroyed,
            powerups_collected: self.powerups_collected,
        }
    }
}

/// Entities alive at the start of a tick.
///
/// Systems walk these lists instead of live queries so that entities spawned
/// mid-tick wait for the next tick and entities despawned mid-tick are skipped.
#[derive(Debug, Clone, Default)]
pub struct TickRoster {
    pub player: Option<Entity>,
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    pub sea_objects: Vec<Entity>,
}

impl TickRoster {
    pub fn take(world: &World) -> Self {
        let player = world
            .query::<&PlayerShip>()
            .iter()
            .next()
            .map(|(entity, _)| entity);
        let enemies = world
            .query::<&EnemyShip>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        let projectiles = world
            .query::<&Projectile>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        let sea_objects = world
            .query::<&SeaObject>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();

        Self {
            player,
            enemies,
            projectiles,
            sea_objects,
        }
    }

    /// Player first, then enemies.
    pub fn ships(&self) -> impl Iterator<Item = Entity> + '_ {
        self.player.into_iter().chain(self.enemies.iter().copied())
    }
}
