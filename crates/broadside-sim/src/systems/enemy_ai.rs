//! Enemy AI system: evaluates the enemy FSM for each AI ship and applies
//! the resulting helm, throttle and fire orders.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;

use broadside_ai::fsm::{evaluate, EnemyBehavior, EnemyContext};
use broadside_core::components::{Gunnery, ShipMotion, Transform};
use broadside_core::constants::{ENEMY_MIN_FIRE_INTERVAL, TIMER_EPSILON};
use broadside_core::enums::Faction;
use broadside_core::events::SimEvent;

use crate::error::SimError;
use crate::session::Session;
use crate::systems::entity_id;
use crate::systems::ship_motion::{set_throttle, set_turn};
use crate::world_setup;

/// Decide and apply orders for one enemy ship.
pub fn update_enemy<R: Rng + ?Sized>(
    world: &mut World,
    enemy: Entity,
    target: Option<DVec3>,
    rng: &mut R,
    dt: f64,
    session: &mut Session,
) -> Result<(), SimError> {
    let fire = {
        let (transform, motion, gunnery, behavior) = world.query_one_mut::<(
            &Transform,
            &mut ShipMotion,
            &mut Gunnery,
            &mut EnemyBehavior,
        )>(enemy)?;

        gunnery.since_last_shot += dt;
        let ctx = EnemyContext {
            position: transform.position,
            yaw: transform.yaw,
            target,
            behavior: *behavior,
            dt,
            weapons_ready: gunnery.since_last_shot >= ENEMY_MIN_FIRE_INTERVAL - TIMER_EPSILON,
        };
        let orders = evaluate(&ctx, rng);

        if orders.behavior_changed {
            log::debug!("Enemy {enemy:?} now {:?}", orders.behavior);
        }
        *behavior = orders.behavior;

        if let Some(helm) = orders.helm {
            set_turn(motion, helm.turn, helm.multiplier);
        }
        set_throttle(motion, orders.throttle, orders.throttle_multiplier);

        if orders.fire {
            gunnery.since_last_shot = 0.0;
            gunnery.shots_fired += 1;
        }
        orders.fire
    };

    if fire {
        world_setup::fire_from(world, enemy)?;
        session.emit(SimEvent::ShotFired {
            ship: entity_id(enemy),
            faction: Faction::Enemy,
        });
    }

    Ok(())
}

/// Run the AI for every listed enemy still present in the world.
pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    enemies: &[Entity],
    player: Option<Entity>,
    rng: &mut R,
    dt: f64,
    session: &mut Session,
) {
    let target = player.and_then(|p| world.get::<&Transform>(p).ok().map(|t| t.position));

    for &enemy in enemies {
        if !world.contains(enemy) {
            continue;
        }
        if let Err(err) = update_enemy(world, enemy, target, rng, dt, session) {
            log::warn!("Skipping AI for enemy {enemy:?}: {err}");
        }
    }
}
