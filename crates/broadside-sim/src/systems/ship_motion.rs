//! Ship motion: smoothed speed and turn rate, integration, terrain bumps.
//!
//! Speed and turn rate never jump to their commanded values. Each tick they
//! move toward the target by a bounded step whose size depends on whether the
//! ship is speeding up, coasting down, or reversing direction.

use hecs::{Entity, World};

use broadside_core::components::{Bounds, Hull, ShipMotion, Transform};
use broadside_core::constants::*;
use broadside_core::enums::{Throttle, Turn};
use broadside_core::events::SimEvent;
use broadside_core::types::{forward, Aabb};
use broadside_terrain::TerrainField;

use crate::error::SimError;
use crate::session::Session;
use crate::systems::entity_id;

/// Per-calibrated-frame step sizes for one approach.
#[derive(Debug, Clone, Copy)]
pub struct ApproachRates {
    /// Moving away from zero toward the target.
    pub accelerate: f64,
    /// Easing back toward zero.
    pub decelerate: f64,
    /// Target on the opposite side of zero.
    pub brake: f64,
}

/// Calibrated frame count for a wall-clock frame: `max(frame, 1/60) * 30`.
///
/// The floor applies to the real frame. Time scaling multiplies the result,
/// so a slowed game also slows ships.
pub fn frame_scale(frame_secs: f64) -> f64 {
    frame_secs.max(MIN_FRAME_SECS) * FRAME_CALIBRATION
}

/// Motion scale for one step: `frame_scale(frame) * time_scale`.
pub fn motion_scale(frame_secs: f64, time_scale: f64) -> f64 {
    frame_scale(frame_secs) * time_scale
}

/// Move `current` toward `target` by one bounded step. Never overshoots and
/// snaps onto the target once within `snap`.
pub fn approach(current: f64, target: f64, rates: ApproachRates, snap: f64, scale: f64) -> f64 {
    if current == target {
        return target;
    }

    let rate = if target == 0.0 {
        rates.decelerate
    } else if current != 0.0 && current.signum() != target.signum() {
        rates.brake
    } else if target.abs() > current.abs() {
        rates.accelerate
    } else {
        rates.decelerate
    };

    let step = rate * scale;
    let next = if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    };

    if (next - target).abs() < snap {
        target
    } else {
        next
    }
}

pub fn speed_rates(motion: &ShipMotion) -> ApproachRates {
    ApproachRates {
        accelerate: motion.acceleration_rate,
        decelerate: motion.deceleration_rate,
        brake: motion.braking_rate,
    }
}

pub fn turn_rates(motion: &ShipMotion) -> ApproachRates {
    ApproachRates {
        accelerate: motion.turn_acceleration_rate,
        decelerate: motion.turn_deceleration_rate,
        brake: motion.turn_deceleration_rate,
    }
}

/// Command a throttle setting. Target speed is `±max_speed * multiplier`.
pub fn set_throttle(motion: &mut ShipMotion, throttle: Throttle, multiplier: f64) {
    motion.throttle = throttle;
    motion.throttle_multiplier = multiplier;
    motion.target_speed = match throttle {
        Throttle::Forward => motion.max_speed * multiplier,
        Throttle::Backward => -motion.max_speed * multiplier,
        Throttle::None => 0.0,
    };
}

/// Command a turn. Target turn rate is `±max_turn_rate * multiplier`, left positive.
pub fn set_turn(motion: &mut ShipMotion, turn: Turn, multiplier: f64) {
    motion.target_turn_rate = match turn {
        Turn::Left => motion.max_turn_rate * multiplier,
        Turn::Right => -motion.max_turn_rate * multiplier,
        Turn::None => 0.0,
    };
}

/// World box of a hull: half extents rotated by yaw, from the water line up.
pub fn ship_bounds(transform: &Transform, hull: &Hull) -> Aabb {
    let (sin, cos) = transform.yaw.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let he = hull.half_extents;
    let hx = cos * he.x + sin * he.z;
    let hz = sin * he.x + cos * he.z;
    let p = transform.position;

    Aabb::new(
        glam::DVec3::new(p.x - hx, p.y, p.z - hz),
        glam::DVec3::new(p.x + hx, p.y + he.y * 2.0, p.z + hz),
    )
}

/// Advance speed, turn rate, heading and position by one tick of `scale`
/// calibrated frames. Heading turns before the hull moves. Returns `true` if
/// the ship changed position.
pub fn integrate(transform: &mut Transform, motion: &mut ShipMotion, scale: f64) -> bool {
    motion.speed = approach(
        motion.speed,
        motion.target_speed,
        speed_rates(motion),
        SPEED_SNAP_EPSILON,
        scale,
    );
    motion.turn_rate = approach(
        motion.turn_rate,
        motion.target_turn_rate,
        turn_rates(motion),
        TURN_SNAP_EPSILON,
        scale,
    );

    transform.yaw += motion.turn_rate * scale;
    motion.last_valid_position = transform.position;
    if motion.speed == 0.0 {
        return false;
    }
    transform.position += forward(transform.yaw) * motion.speed * scale;
    true
}

/// Move one ship and resolve terrain contact.
///
/// `scale` is the calibrated frame count for this tick, already multiplied by
/// the time scale. On contact the ship returns to its previous position and
/// loses half its speed. The player also gets collision feedback, at most once
/// per cooldown. A ship that did not move is never tested against terrain.
pub fn advance_ship(
    world: &mut World,
    entity: Entity,
    terrain: &TerrainField,
    dt: f64,
    scale: f64,
    is_player: bool,
    session: &mut Session,
) -> Result<(), SimError> {
    let (transform, motion, hull, bounds) =
        world.query_one_mut::<(&mut Transform, &mut ShipMotion, &Hull, &mut Bounds)>(entity)?;

    let moved = integrate(transform, motion, scale);
    bounds.0 = ship_bounds(transform, hull);

    if moved && terrain.check_ship_collision(&bounds.0) {
        transform.position = motion.last_valid_position;
        motion.speed *= TERRAIN_BUMP_SPEED_FACTOR;
        bounds.0 = ship_bounds(transform, hull);

        if is_player && motion.collision_cooldown <= 0.0 {
            motion.collision_cooldown = COLLISION_FEEDBACK_COOLDOWN;
            session.emit(SimEvent::CollisionFeedback {
                ship: entity_id(entity),
            });
        }
    }

    motion.collision_cooldown = (motion.collision_cooldown - dt).max(0.0);
    Ok(())
}

/// Advance every listed ship still present in the world.
pub fn run(
    world: &mut World,
    ships: &[Entity],
    player: Option<Entity>,
    terrain: &TerrainField,
    dt: f64,
    scale: f64,
    session: &mut Session,
) {
    for &ship in ships {
        if !world.contains(ship) {
            continue;
        }
        let is_player = Some(ship) == player;
        if let Err(err) = advance_ship(world, ship, terrain, dt, scale, is_player, session) {
            log::warn!("Skipping motion for ship {ship:?}: {err}");
        }
    }
}
