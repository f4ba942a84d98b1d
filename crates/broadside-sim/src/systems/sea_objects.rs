//! Sea objects: aging, bobbing, bomb glow and ship contact.
//!
//! Contact rules by kind:
//! - bomb: explodes and deals fixed damage to any ship.
//! - skittle: slows the player. Any ship knocks it clear of the hull. Not destroyed.
//! - powerup: applies one effect to the player and is consumed.

use glam::DVec3;
use hecs::{Entity, World};

use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::{EffectKind, PowerupKind, SeaObjectKind};
use broadside_core::events::SimEvent;
use broadside_core::types::{forward, Aabb};

use crate::error::SimError;
use crate::session::{Session, TickRoster};
use crate::systems::combat::{apply_damage, heal};
use crate::systems::effects;
use crate::systems::entity_id;

/// Bomb glow: steady until the last stretch of life, then pulsing.
pub fn bomb_glow(age: f64, lifespan: f64) -> f64 {
    if lifespan - age <= BOMB_PULSE_WINDOW_SECS {
        0.5 + 0.5 * (age * 5.0).sin()
    } else {
        1.0
    }
}

/// Timed effect granted by a powerup. Health pickups heal instantly instead.
pub fn powerup_effect(kind: PowerupKind) -> Option<EffectKind> {
    match kind {
        PowerupKind::Speed => Some(EffectKind::SpeedBoost),
        PowerupKind::Shield => Some(EffectKind::Shield),
        PowerupKind::RapidFire => Some(EffectKind::RapidFire),
        PowerupKind::Health => None,
    }
}

/// Age and animate one object. Returns `false` once it has expired.
pub fn advance(
    transform: &mut Transform,
    object: &mut SeaObject,
    bounds: &mut Bounds,
    dt: f64,
) -> bool {
    object.age += dt;
    if object.age >= object.lifespan - TIMER_EPSILON {
        return false;
    }

    transform.yaw += object.rotation_speed * dt / MIN_FRAME_SECS;
    transform.position.y =
        object.base_y + (object.age * object.bob_speed).sin() * object.bob_height;
    if object.kind == SeaObjectKind::Bomb {
        object.glow = bomb_glow(object.age, object.lifespan);
    }
    bounds.0 = Aabb::from_center(transform.position, object.half_extents);
    true
}

/// First ship in roster order whose box touches the object.
fn find_contact(
    world: &World,
    roster: &TickRoster,
    object_bounds: &Aabb,
) -> Option<(Entity, bool)> {
    for ship in roster.ships() {
        let Ok(mut query) = world.query_one::<(&Bounds, Option<&PlayerShip>)>(ship) else {
            continue;
        };
        let Some((bounds, player)) = query.get() else {
            continue;
        };
        if bounds.0.intersects(object_bounds) {
            return Some((ship, player.is_some()));
        }
    }
    None
}

/// Age one object and resolve its contact with a ship, if any.
pub fn update_sea_object(
    world: &mut World,
    object: Entity,
    roster: &TickRoster,
    dt: f64,
    session: &mut Session,
) -> Result<(), SimError> {
    let alive = {
        let (transform, sea_object, bounds) =
            world.query_one_mut::<(&mut Transform, &mut SeaObject, &mut Bounds)>(object)?;
        advance(transform, sea_object, bounds, dt).then_some((sea_object.kind, bounds.0))
    };

    let Some((kind, object_bounds)) = alive else {
        let _ = world.despawn(object);
        return Ok(());
    };

    let Some((ship, is_player)) = find_contact(world, roster, &object_bounds) else {
        return Ok(());
    };

    match kind {
        SeaObjectKind::Bomb => {
            let _ = world.despawn(object);
            session.emit(SimEvent::Explosion {
                point: object_bounds.center(),
            });
            apply_damage(world, ship, BOMB_CONTACT_DAMAGE, session)?;
        }
        SeaObjectKind::Skittle => {
            if is_player {
                effects::apply(world, ship, EffectKind::Slow, session)?;
                session.skittles_hit += 1;
                session.award(SCORE_SKITTLE_CONTACT);
            }
            knock_back(world, object, ship)?;
        }
        SeaObjectKind::Powerup(powerup) if is_player => {
            let _ = world.despawn(object);
            match powerup_effect(powerup) {
                Some(effect) => effects::apply(world, ship, effect, session)?,
                None => {
                    heal(world, ship, HEALTH_PICKUP_AMOUNT, session)?;
                }
            }
            session.powerups_collected += 1;
            session.emit(SimEvent::PowerupCollected {
                ship: entity_id(ship),
                kind: powerup,
            });
            session.award(SCORE_POWERUP);
        }
        // Powerups ignore enemy ships.
        SeaObjectKind::Powerup(_) => {}
    }

    Ok(())
}

/// Push a skittle horizontally away from the ship that touched it.
///
/// The push is at least `SKITTLE_KNOCKBACK` and always far enough to clear the
/// hull, so one touch is resolved in one tick.
fn knock_back(world: &mut World, object: Entity, ship: Entity) -> Result<(), SimError> {
    let ship_transform = *world.get::<&Transform>(ship)?;
    let hull = world.get::<&Bounds>(ship)?.0;
    let (transform, sea_object, bounds) =
        world.query_one_mut::<(&mut Transform, &SeaObject, &mut Bounds)>(object)?;

    let offset = transform.position - ship_transform.position;
    let mut away = DVec3::new(offset.x, 0.0, offset.z).normalize_or_zero();
    if away == DVec3::ZERO {
        away = forward(ship_transform.yaw);
    }

    let start = Aabb::from_center(transform.position, sea_object.half_extents);
    let distance = clearance(&start, &hull, away).max(SKITTLE_KNOCKBACK);
    transform.position += away * distance;
    bounds.0 = Aabb::from_center(transform.position, sea_object.half_extents);
    Ok(())
}

/// Shortest travel along the horizontal unit vector `away` that takes `object`
/// past `hull` on the x or z axis, plus `SKITTLE_CLEARANCE`.
fn clearance(object: &Aabb, hull: &Aabb, away: DVec3) -> f64 {
    let axis = |dir: f64, obj_min: f64, obj_max: f64, hull_min: f64, hull_max: f64| {
        if dir > 0.0 {
            (hull_max - obj_min) / dir
        } else if dir < 0.0 {
            (hull_min - obj_max) / dir
        } else {
            f64::INFINITY
        }
    };
    let along_x = axis(away.x, object.min.x, object.max.x, hull.min.x, hull.max.x);
    let along_z = axis(away.z, object.min.z, object.max.z, hull.min.z, hull.max.z);
    along_x.min(along_z).max(0.0) + SKITTLE_CLEARANCE
}

/// Advance every sea object alive at tick start.
pub fn run(world: &mut World, roster: &TickRoster, dt: f64, session: &mut Session) {
    for &object in &roster.sea_objects {
        if !world.contains(object) {
            continue;
        }
        if let Err(err) = update_sea_object(world, object, roster, dt, session) {
            log::warn!("Skipping sea object {object:?}: {err}");
        }
    }
}
