//! Projectile ballistics and collision resolution.
//!
//! Each projectile ages, moves in a straight line, then tests for hits in a
//! fixed order: ships, sea objects, terrain. The first hit ends it. Tests are
//! per-tick point checks, so a fast projectile can pass through a thin target
//! between ticks.

use glam::DVec3;
use hecs::{Entity, World};

use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::{Faction, SeaObjectKind, ShipClass};
use broadside_core::events::SimEvent;
use broadside_core::profiles::scaled_damage;
use broadside_terrain::TerrainField;

use crate::error::SimError;
use crate::session::{Session, TickRoster};
use crate::systems::combat::{apply_damage, DamageOutcome};
use crate::systems::effects::is_invulnerable;
use crate::systems::entity_id;

/// How a projectile met a ship.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ShipHit {
    /// Absorbed by an active shield.
    Shield { ship: Entity },
    Hull {
        ship: Entity,
        class: ShipClass,
        is_player: bool,
    },
}

/// Advance one projectile and resolve its first collision, if any.
pub fn update_projectile(
    world: &mut World,
    projectile: Entity,
    roster: &TickRoster,
    terrain: &TerrainField,
    dt: f64,
    session: &mut Session,
) -> Result<(), SimError> {
    let moved = {
        let (transform, shot) =
            world.query_one_mut::<(&mut Transform, &mut Projectile)>(projectile)?;
        shot.age += dt;
        if shot.age >= shot.lifespan - TIMER_EPSILON {
            None
        } else {
            transform.position += shot.direction * shot.speed * dt * FRAME_CALIBRATION;
            Some((transform.position, shot.owner, shot.damage))
        }
    };

    let Some((point, owner, damage)) = moved else {
        let _ = world.despawn(projectile);
        return Ok(());
    };

    if let Some(hit) = find_ship_hit(world, roster, point, owner) {
        let _ = world.despawn(projectile);
        resolve_ship_hit(world, hit, point, owner, damage, session)?;
        return Ok(());
    }

    if let Some((object, kind, object_point)) = find_sea_object_hit(world, roster, point) {
        let _ = world.despawn(projectile);
        let _ = world.despawn(object);
        resolve_sea_object_hit(kind, object_point, point, owner, session);
        return Ok(());
    }

    if terrain.check_point_collision(point) {
        let _ = world.despawn(projectile);
        session.emit(SimEvent::HitEffect { point });
    }

    Ok(())
}

fn find_ship_hit(
    world: &World,
    roster: &TickRoster,
    point: DVec3,
    owner: Faction,
) -> Option<ShipHit> {
    for ship in roster.ships() {
        let Ok(mut query) = world.query_one::<(
            &Faction,
            &Transform,
            &Bounds,
            &TimedEffects,
            &Hull,
            Option<&PlayerShip>,
        )>(ship) else {
            continue;
        };
        let Some((faction, transform, bounds, effects, hull, player)) = query.get() else {
            continue;
        };
        if *faction == owner {
            continue;
        }

        if is_invulnerable(effects) {
            if transform.position.distance(point) < SHIELD_RADIUS {
                return Some(ShipHit::Shield { ship });
            }
            continue;
        }

        if bounds.0.contains_point(point) {
            return Some(ShipHit::Hull {
                ship,
                class: hull.class,
                is_player: player.is_some(),
            });
        }
    }
    None
}

fn resolve_ship_hit(
    world: &mut World,
    hit: ShipHit,
    point: DVec3,
    owner: Faction,
    damage: f64,
    session: &mut Session,
) -> Result<(), SimError> {
    match hit {
        ShipHit::Shield { ship } => {
            session.emit(SimEvent::ShieldImpact {
                ship: entity_id(ship),
                point,
            });
        }
        ShipHit::Hull {
            ship,
            class,
            is_player,
        } => {
            session.emit(SimEvent::HitEffect { point });
            let amount = scaled_damage(damage, class, is_player);
            let outcome = apply_damage(world, ship, amount, session)?;

            if owner == Faction::Player && !is_player {
                session.award(SCORE_ENEMY_HIT);
                if outcome == DamageOutcome::Destroyed {
                    session.award(SCORE_KILL_BONUS);
                }
            }
        }
    }
    Ok(())
}

/// Bombs and skittles can be shot; powerups cannot.
fn find_sea_object_hit(
    world: &World,
    roster: &TickRoster,
    point: DVec3,
) -> Option<(Entity, SeaObjectKind, DVec3)> {
    for &object in &roster.sea_objects {
        let Ok(mut query) = world.query_one::<(&SeaObject, &Transform, &Bounds)>(object) else {
            continue;
        };
        let Some((sea_object, transform, bounds)) = query.get() else {
            continue;
        };
        if matches!(sea_object.kind, SeaObjectKind::Powerup(_)) {
            continue;
        }
        if bounds.0.contains_point(point) {
            return Some((object, sea_object.kind, transform.position));
        }
    }
    None
}

fn resolve_sea_object_hit(
    kind: SeaObjectKind,
    object_point: DVec3,
    point: DVec3,
    owner: Faction,
    session: &mut Session,
) {
    let by_player = owner == Faction::Player;
    match kind {
        SeaObjectKind::Bomb => {
            session.emit(SimEvent::Explosion {
                point: object_point,
            });
            if by_player {
                session.bombs_destroyed += 1;
                session.award(SCORE_BOMB_SHOT);
            }
        }
        SeaObjectKind::Skittle => {
            session.emit(SimEvent::SkittleDestroyed {
                point: object_point,
            });
            if by_player {
                session.skittles_hit += 1;
                session.award(SCORE_SKITTLE_SHOT);
            }
        }
        SeaObjectKind::Powerup(_) => {}
    }
    session.emit(SimEvent::HitEffect { point });
}

/// Advance every projectile alive at tick start.
pub fn run(
    world: &mut World,
    roster: &TickRoster,
    terrain: &TerrainField,
    dt: f64,
    session: &mut Session,
) {
    for &projectile in &roster.projectiles {
        if !world.contains(projectile) {
            continue;
        }
        if let Err(err) = update_projectile(world, projectile, roster, terrain, dt, session) {
            log::warn!("Skipping projectile {projectile:?}: {err}");
        }
    }
}
