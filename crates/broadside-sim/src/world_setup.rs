//! Entity spawn factories for setting up the simulation world.
//!
//! Creates ships, projectiles and sea objects with the appropriate component
//! bundles. Ship stats come from the class profile table.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;

use broadside_ai::fsm::EnemyBehavior;
use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::*;
use broadside_core::profiles::{ship_profile, spawn_weight, ShipProfile, PLAYER_PROFILE};
use broadside_core::types::{forward, rotate_y, Aabb};

use crate::error::SimError;
use crate::systems::ship_motion::ship_bounds;

/// Spawn the player's ship.
pub fn spawn_player(world: &mut World, position: DVec3, yaw: f64) -> Entity {
    let (transform, motion, hull) =
        ship_components(&PLAYER_PROFILE, ShipClass::Standard, position, yaw);
    let bounds = Bounds(ship_bounds(&transform, &hull));

    world.spawn((
        PlayerShip,
        Faction::Player,
        transform,
        motion,
        hull,
        bounds,
        TimedEffects::default(),
        Gunnery {
            since_last_shot: BASE_FIRE_COOLDOWN,
            shots_fired: 0,
        },
    ))
}

/// Spawn an AI-controlled ship of the given class.
pub fn spawn_enemy<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    class: ShipClass,
    position: DVec3,
    yaw: f64,
    randomize_stats: bool,
) -> Entity {
    let mut profile = ship_profile(class);
    if randomize_stats {
        profile.max_speed *= 1.0 + rng.gen_range(-ENEMY_STAT_JITTER..ENEMY_STAT_JITTER);
        profile.max_turn_rate *= 1.0 + rng.gen_range(-ENEMY_STAT_JITTER..ENEMY_STAT_JITTER);
    }

    let (transform, motion, hull) = ship_components(&profile, class, position, yaw);
    let bounds = Bounds(ship_bounds(&transform, &hull));

    log::debug!("Spawned {class:?} at ({:.0}, {:.0})", position.x, position.z);

    world.spawn((
        EnemyShip,
        Faction::Enemy,
        transform,
        motion,
        hull,
        bounds,
        TimedEffects::default(),
        Gunnery {
            since_last_shot: ENEMY_MIN_FIRE_INTERVAL,
            shots_fired: 0,
        },
        EnemyBehavior::default(),
    ))
}

fn ship_components(
    profile: &ShipProfile,
    class: ShipClass,
    position: DVec3,
    yaw: f64,
) -> (Transform, ShipMotion, Hull) {
    let transform = Transform { position, yaw };
    let motion = ShipMotion {
        speed: 0.0,
        target_speed: 0.0,
        turn_rate: 0.0,
        target_turn_rate: 0.0,
        max_speed: profile.max_speed,
        original_max_speed: profile.max_speed,
        max_turn_rate: profile.max_turn_rate,
        acceleration_rate: profile.acceleration_rate,
        deceleration_rate: SHIP_DECELERATION_RATE,
        braking_rate: SHIP_BRAKING_RATE,
        turn_acceleration_rate: SHIP_TURN_ACCELERATION_RATE,
        turn_deceleration_rate: SHIP_TURN_DECELERATION_RATE,
        throttle: Throttle::None,
        throttle_multiplier: 1.0,
        last_valid_position: position,
        collision_cooldown: 0.0,
    };
    let hull = Hull {
        class,
        health: profile.health,
        max_health: profile.health,
        half_extents: DVec3::from_array(HULL_HALF_EXTENTS) * profile.scale,
        color: profile.color,
    };
    (transform, motion, hull)
}

/// Spawn a projectile.
pub fn spawn_projectile(
    world: &mut World,
    owner: Faction,
    position: DVec3,
    direction: DVec3,
    speed: f64,
    damage: f64,
) -> Entity {
    world.spawn((
        Transform {
            position,
            yaw: direction.x.atan2(direction.z),
        },
        Projectile {
            owner,
            direction: direction.normalize_or_zero(),
            speed,
            damage,
            age: 0.0,
            lifespan: PROJECTILE_LIFESPAN_SECS,
        },
    ))
}

/// Fire a projectile from a ship's muzzle along its heading.
///
/// Speed and damage depend on the shooter's faction.
pub fn fire_from(world: &mut World, shooter: Entity) -> Result<Entity, SimError> {
    let transform = *world.get::<&Transform>(shooter)?;
    let faction = *world.get::<&Faction>(shooter)?;

    let muzzle = transform.position + rotate_y(DVec3::from_array(MUZZLE_OFFSET), transform.yaw);
    let (speed, damage) = match faction {
        Faction::Player => (PLAYER_PROJECTILE_SPEED, PLAYER_PROJECTILE_DAMAGE),
        Faction::Enemy => (ENEMY_PROJECTILE_SPEED, ENEMY_PROJECTILE_DAMAGE),
    };

    Ok(spawn_projectile(
        world,
        faction,
        muzzle,
        forward(transform.yaw),
        speed,
        damage,
    ))
}

/// Spawn a sea object with randomized bobbing and spin.
pub fn spawn_sea_object<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    kind: SeaObjectKind,
    position: DVec3,
) -> Entity {
    let (lifespan, half_extents) = match kind {
        SeaObjectKind::Bomb => (BOMB_LIFESPAN_SECS, DVec3::splat(BOMB_HALF_EXTENT)),
        SeaObjectKind::Skittle => (
            SKITTLE_LIFESPAN_SECS,
            DVec3::from_array(SKITTLE_HALF_EXTENTS),
        ),
        SeaObjectKind::Powerup(_) => (POWERUP_LIFESPAN_SECS, DVec3::splat(POWERUP_HALF_EXTENT)),
    };
    let position = DVec3::new(position.x, SEA_OBJECT_BASE_Y, position.z);

    world.spawn((
        Transform {
            position,
            yaw: 0.0,
        },
        SeaObject {
            kind,
            age: 0.0,
            lifespan,
            base_y: SEA_OBJECT_BASE_Y,
            bob_speed: rng.gen_range(0.5..1.0),
            bob_height: rng.gen_range(0.5..1.0),
            rotation_speed: rng.gen_range(0.005..0.015),
            half_extents,
            glow: 1.0,
        },
        Bounds(Aabb::from_center(position, half_extents)),
    ))
}

/// Draw a sea object type: 40% bomb, 40% skittle, 20% powerup of a uniform subtype.
pub fn random_sea_object_kind<R: Rng + ?Sized>(rng: &mut R) -> SeaObjectKind {
    let roll: f64 = rng.gen();
    if roll < SEA_OBJECT_BOMB_CHANCE {
        SeaObjectKind::Bomb
    } else if roll < SEA_OBJECT_BOMB_CHANCE + SEA_OBJECT_SKITTLE_CHANCE {
        SeaObjectKind::Skittle
    } else {
        let index = rng.gen_range(0..PowerupKind::ALL.len());
        SeaObjectKind::Powerup(PowerupKind::ALL[index])
    }
}

/// Draw an enemy class from the spawn weight table.
pub fn random_ship_class<R: Rng + ?Sized>(rng: &mut R) -> ShipClass {
    let total: u32 = ShipClass::ALL.iter().map(|c| spawn_weight(*c)).sum();
    let mut roll = rng.gen_range(0..total);
    for class in ShipClass::ALL {
        let weight = spawn_weight(class);
        if roll < weight {
            return class;
        }
        roll -= weight;
    }
    ShipClass::Standard
}

/// Random point on the sea plane between `min` and `max` units from `center`.
pub fn ring_position<R: Rng + ?Sized>(rng: &mut R, center: DVec3, min: f64, max: f64) -> DVec3 {
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    let distance = rng.gen_range(min..max);
    DVec3::new(
        center.x + angle.sin() * distance,
        0.0,
        center.z + angle.cos() * distance,
    )
}
