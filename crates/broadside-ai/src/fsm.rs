//! Enemy behavior state machine.
//!
//! An enemy is either pursuing the player (inside engagement range) or
//! wandering. Each evaluation yields the helm and fire orders for one tick.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use broadside_core::constants::*;
use broadside_core::enums::{Throttle, Turn};
use broadside_core::types::forward;

/// Coarse behavior state, reported for logging and snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    #[default]
    Wander,
    Pursue,
}

/// Input to the enemy FSM for a single ship.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub position: DVec3,
    pub yaw: f64,
    /// Player position, if a player ship is alive.
    pub target: Option<DVec3>,
    /// Behavior chosen on the previous evaluation.
    pub behavior: EnemyBehavior,
    /// Seconds covered by this evaluation.
    pub dt: f64,
    /// False while the ship's minimum fire interval is still running.
    pub weapons_ready: bool,
}

/// A helm command: direction plus a fraction of the ship's max turn rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelmOrder {
    pub turn: Turn,
    pub multiplier: f64,
}

/// Output from the enemy FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyOrders {
    pub behavior: EnemyBehavior,
    /// New helm command. `None` keeps the current one.
    pub helm: Option<HelmOrder>,
    pub throttle: Throttle,
    pub throttle_multiplier: f64,
    pub fire: bool,
    pub behavior_changed: bool,
}

/// Evaluate the FSM for one enemy ship.
pub fn evaluate<R: Rng + ?Sized>(ctx: &EnemyContext, rng: &mut R) -> EnemyOrders {
    let orders = match ctx.target {
        Some(target) if ctx.position.distance(target) < AI_ENGAGE_RANGE => {
            pursue(ctx, target, rng)
        }
        _ => wander(ctx, rng),
    };
    EnemyOrders {
        behavior_changed: orders.behavior != ctx.behavior,
        ..orders
    }
}

/// Scale a per-reference-frame probability to the evaluated time span.
pub fn frame_chance(per_frame: f64, dt: f64) -> f64 {
    (per_frame * dt / AI_REFERENCE_FRAME_SECS).clamp(0.0, 1.0)
}

/// Which way to turn to bring `target` toward the bow.
pub fn turn_toward(position: DVec3, yaw: f64, target: DVec3) -> Turn {
    let bow = forward(yaw);
    let to_target = (target - position).normalize_or_zero();
    if bow.cross(to_target).y > 0.0 {
        Turn::Left
    } else {
        Turn::Right
    }
}

/// Angle between the bow and the direction to `target` (radians, `0..=PI`).
pub fn heading_error(position: DVec3, yaw: f64, target: DVec3) -> f64 {
    let to_target = (target - position).normalize_or_zero();
    if to_target == DVec3::ZERO {
        return 0.0;
    }
    forward(yaw).angle_between(to_target)
}

fn pursue<R: Rng + ?Sized>(ctx: &EnemyContext, target: DVec3, rng: &mut R) -> EnemyOrders {
    let distance = ctx.position.distance(target);
    let helm = HelmOrder {
        turn: turn_toward(ctx.position, ctx.yaw, target),
        multiplier: AI_PURSUIT_TURN_MULTIPLIER,
    };

    // Close in slower as the range shrinks.
    let throttle_multiplier = (distance / AI_FULL_THROTTLE_RANGE).min(1.0);

    let mut fire = false;
    if ctx.weapons_ready && heading_error(ctx.position, ctx.yaw, target) < AI_FIRE_CONE {
        let chance = AI_FIRE_CHANCE * (1.0 - distance / AI_ENGAGE_RANGE);
        fire = rng.gen::<f64>() < frame_chance(chance, ctx.dt);
    }

    EnemyOrders {
        behavior: EnemyBehavior::Pursue,
        helm: Some(helm),
        throttle: Throttle::Forward,
        throttle_multiplier,
        fire,
        behavior_changed: false,
    }
}

fn wander<R: Rng + ?Sized>(ctx: &EnemyContext, rng: &mut R) -> EnemyOrders {
    let helm = if rng.gen::<f64>() < frame_chance(AI_WANDER_CHANCE, ctx.dt) {
        let roll: f64 = rng.gen();
        Some(if roll < 1.0 / 3.0 {
            HelmOrder {
                turn: Turn::Left,
                multiplier: AI_WANDER_TURN_MULTIPLIER,
            }
        } else if roll < 2.0 / 3.0 {
            HelmOrder {
                turn: Turn::Right,
                multiplier: AI_WANDER_TURN_MULTIPLIER,
            }
        } else {
            HelmOrder {
                turn: Turn::None,
                multiplier: 0.0,
            }
        })
    } else {
        None
    };

    EnemyOrders {
        behavior: EnemyBehavior::Wander,
        helm,
        throttle: Throttle::Forward,
        throttle_multiplier: 1.0,
        fire: false,
        behavior_changed: false,
    }
}
