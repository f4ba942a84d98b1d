//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Aabb;

/// World placement shared by ships, projectiles and sea objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    /// Heading in radians. Unbounded, accumulated by integration.
    pub yaw: f64,
}

/// Smoothed ship dynamics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipMotion {
    pub speed: f64,
    pub target_speed: f64,
    /// Current yaw rate (positive = left).
    pub turn_rate: f64,
    pub target_turn_rate: f64,
    /// Effective top speed after timed effects.
    pub max_speed: f64,
    /// Top speed from the profile, before timed effects.
    pub original_max_speed: f64,
    pub max_turn_rate: f64,
    pub acceleration_rate: f64,
    pub deceleration_rate: f64,
    pub braking_rate: f64,
    pub turn_acceleration_rate: f64,
    pub turn_deceleration_rate: f64,
    /// Last throttle command, re-applied when max speed changes.
    pub throttle: Throttle,
    /// Multiplier of the last throttle command.
    pub throttle_multiplier: f64,
    /// Position before the most recent move, restored on terrain contact.
    pub last_valid_position: DVec3,
    /// Seconds until terrain collision feedback may fire again.
    pub collision_cooldown: f64,
}

/// Hull: class, health and collision footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    pub class: ShipClass,
    pub health: f64,
    pub max_health: f64,
    /// Half extents of the unrotated hull box.
    pub half_extents: DVec3,
    pub color: u32,
}

/// World-space bounding box, recomputed whenever the owner moves.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Bounds(pub Aabb);

/// Timed effects as countdowns in seconds. `None` = inactive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimedEffects {
    pub slow: Option<f64>,
    pub speed_boost: Option<f64>,
    pub shield: Option<f64>,
    pub rapid_fire: Option<f64>,
}

/// Per-ship firing state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Gunnery {
    /// Seconds since this ship last fired.
    pub since_last_shot: f64,
    pub shots_fired: u32,
}

/// Ballistic projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub owner: Faction,
    /// Unit direction of travel.
    pub direction: DVec3,
    /// Units per calibrated frame.
    pub speed: f64,
    pub damage: f64,
    pub age: f64,
    pub lifespan: f64,
}

/// Floating hazard or pickup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeaObject {
    pub kind: SeaObjectKind,
    pub age: f64,
    pub lifespan: f64,
    /// Water-line height the object bobs around.
    pub base_y: f64,
    pub bob_speed: f64,
    pub bob_height: f64,
    /// Spin per calibrated frame (radians).
    pub rotation_speed: f64,
    pub half_extents: DVec3,
    /// Glow intensity for bombs, 1.0 when steady.
    pub glow: f64,
}

/// Marks the player's ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShip;

/// Marks an AI-controlled ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyShip;
