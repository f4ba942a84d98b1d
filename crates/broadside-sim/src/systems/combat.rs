//! Damage, healing and ship destruction.

use hecs::{Entity, World};

use broadside_core::components::{Hull, PlayerShip};
use broadside_core::enums::Faction;
use broadside_core::events::SimEvent;

use crate::error::SimError;
use crate::session::Session;
use crate::systems::entity_id;

/// Result of applying damage to a ship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    Damaged { health: f64 },
    Destroyed,
}

/// Subtract `amount` from a ship's health, destroying it at zero.
///
/// Destroying the player ends the session with the score at that moment.
/// Despawning the ship drops its timed effects along with it.
pub fn apply_damage(
    world: &mut World,
    ship: Entity,
    amount: f64,
    session: &mut Session,
) -> Result<DamageOutcome, SimError> {
    let (hull, faction, player) =
        world.query_one_mut::<(&mut Hull, &Faction, Option<&PlayerShip>)>(ship)?;
    hull.health -= amount;
    let health = hull.health;
    let class = hull.class;
    let faction = *faction;
    let is_player = player.is_some();

    let id = entity_id(ship);
    if is_player {
        session.emit(SimEvent::HealthChanged { ship: id, health });
        session.emit(SimEvent::DamageFeedback { ship: id });
    }

    if health > 0.0 {
        return Ok(DamageOutcome::Damaged { health });
    }

    let _ = world.despawn(ship);
    session.emit(SimEvent::ShipDestroyed {
        ship: id,
        class,
        faction,
    });

    if is_player {
        session.game_over = true;
        session.emit(SimEvent::GameOver {
            final_score: session.score,
        });
        log::info!("Player ship destroyed, final score {}", session.score);
    } else {
        session.enemies_destroyed += 1;
        log::debug!("{class:?} destroyed");
    }

    Ok(DamageOutcome::Destroyed)
}

/// Restore health, capped at the hull maximum.
pub fn heal(
    world: &mut World,
    ship: Entity,
    amount: f64,
    session: &mut Session,
) -> Result<f64, SimError> {
    let hull = world.query_one_mut::<&mut Hull>(ship)?;
    hull.health = (hull.health + amount).min(hull.max_health);
    let health = hull.health;
    session.emit(SimEvent::HealthChanged {
        ship: entity_id(ship),
        health,
    });
    Ok(health)
}
