//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use broadside_core::components::*;
use broadside_core::enums::*;
use broadside_core::events::SimEvent;
use broadside_core::state::*;
use broadside_core::types::SimTime;
use broadside_terrain::TerrainField;

use crate::session::Session;
use crate::systems::entity_id;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    session: &Session,
    terrain: &TerrainField,
    fps: f64,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    let ships = build_ships(world);
    let player = ships.iter().find(|s| s.faction == Faction::Player).cloned();

    GameStateSnapshot {
        time: *time,
        phase,
        score: session.score,
        player,
        ships,
        projectiles: build_projectiles(world),
        sea_objects: build_sea_objects(world),
        terrain: TerrainView {
            formations_total: terrain.len() as u32,
            formations_risen: terrain.risen_count() as u32,
        },
        stats: session.stats(fps, time.elapsed_secs),
        events,
    }
}

/// Every ship, player included.
fn build_ships(world: &World) -> Vec<ShipView> {
    let mut query = world.query::<(
        &Faction,
        &Transform,
        &ShipMotion,
        &Hull,
        &Bounds,
        &TimedEffects,
    )>();
    query
        .iter()
        .map(
            |(entity, (faction, transform, motion, hull, bounds, effects))| ShipView {
                id: entity_id(entity),
                faction: *faction,
                class: hull.class,
                position: transform.position,
                yaw: transform.yaw,
                speed: motion.speed,
                max_speed: motion.max_speed,
                health: hull.health,
                max_health: hull.max_health,
                color: hull.color,
                bounds: bounds.0,
                shielded: effects.shield.is_some(),
                slowed: effects.slow.is_some(),
                speed_boosted: effects.speed_boost.is_some(),
                rapid_fire: effects.rapid_fire.is_some(),
            },
        )
        .collect()
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut query = world.query::<(&Transform, &Projectile)>();
    query
        .iter()
        .map(|(entity, (transform, projectile))| ProjectileView {
            id: entity_id(entity),
            owner: projectile.owner,
            position: transform.position,
            direction: projectile.direction,
            age: projectile.age,
        })
        .collect()
}

fn build_sea_objects(world: &World) -> Vec<SeaObjectView> {
    let mut query = world.query::<(&Transform, &SeaObject)>();
    query
        .iter()
        .map(|(entity, (transform, object))| SeaObjectView {
            id: entity_id(entity),
            kind: object.kind,
            position: transform.position,
            yaw: transform.yaw,
            age: object.age,
            glow: object.glow,
        })
        .collect()
}
