//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! Per-entity failures are logged and skipped so one bad entity never halts a tick.

pub mod combat;
pub mod effects;
pub mod enemy_ai;
pub mod player_control;
pub mod projectiles;
pub mod sea_objects;
pub mod ship_motion;
pub mod snapshot;
pub mod spawner;

use hecs::Entity;

use broadside_core::types::EntityId;

/// Stable id of an entity as exposed to events and snapshots.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}
