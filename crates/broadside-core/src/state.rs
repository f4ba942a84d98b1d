//! Game state snapshot: the complete visible state handed to the presentation layer each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Aabb, EntityId, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub score: u32,
    pub player: Option<ShipView>,
    pub ships: Vec<ShipView>,
    pub projectiles: Vec<ProjectileView>,
    pub sea_objects: Vec<SeaObjectView>,
    pub terrain: TerrainView,
    pub stats: StatsView,
    pub events: Vec<SimEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub id: EntityId,
    pub faction: Faction,
    pub class: ShipClass,
    pub position: DVec3,
    pub yaw: f64,
    pub speed: f64,
    pub max_speed: f64,
    pub health: f64,
    pub max_health: f64,
    pub color: u32,
    pub bounds: Aabb,
    pub shielded: bool,
    pub slowed: bool,
    pub speed_boosted: bool,
    pub rapid_fire: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub owner: Faction,
    pub position: DVec3,
    pub direction: DVec3,
    pub age: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeaObjectView {
    pub id: EntityId,
    pub kind: SeaObjectKind,
    pub position: DVec3,
    pub yaw: f64,
    pub age: f64,
    pub glow: f64,
}

/// Terrain progress summary. Formation geometry is fetched once from the
/// terrain field rather than re-sent every tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainView {
    pub formations_total: u32,
    pub formations_risen: u32,
}

/// Periodic stats for the HUD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsView {
    /// Smoothed ticks per second of simulated time.
    pub fps: f64,
    pub elapsed_secs: f64,
    pub enemies_destroyed: u32,
    pub shots_fired: u32,
    pub skittles_hit: u32,
    pub bombs_destroyed: u32,
    pub powerups_collected: u32,
}
