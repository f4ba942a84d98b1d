//! Player control: maps the sampled input intent onto the player ship.

use hecs::{Entity, World};

use broadside_core::commands::InputIntent;
use broadside_core::components::{Gunnery, ShipMotion, TimedEffects};
use broadside_core::constants::{TIMER_EPSILON, TURBO_MULTIPLIER};
use broadside_core::enums::{Faction, Throttle, Turn};
use broadside_core::events::SimEvent;

use crate::error::SimError;
use crate::session::Session;
use crate::systems::effects::fire_cooldown;
use crate::systems::entity_id;
use crate::systems::ship_motion::{set_throttle, set_turn};
use crate::world_setup;

/// Forward wins over backward.
pub fn throttle_from_input(input: &InputIntent) -> Throttle {
    if input.forward {
        Throttle::Forward
    } else if input.backward {
        Throttle::Backward
    } else {
        Throttle::None
    }
}

/// Left and right together cancel out.
pub fn turn_from_input(input: &InputIntent) -> Turn {
    match (input.left, input.right) {
        (true, false) => Turn::Left,
        (false, true) => Turn::Right,
        _ => Turn::None,
    }
}

/// Apply one tick of input to the player ship and fire if allowed.
///
/// `turbo_was_active` carries the turbo flag between ticks so the turbo
/// effect fires only when turbo is first engaged.
pub fn run(
    world: &mut World,
    player: Entity,
    input: &InputIntent,
    turbo_was_active: &mut bool,
    dt: f64,
    session: &mut Session,
) -> Result<(), SimError> {
    let wants_to_fire = {
        let (motion, gunnery, effects) =
            world.query_one_mut::<(&mut ShipMotion, &mut Gunnery, &TimedEffects)>(player)?;

        let multiplier = if input.turbo_active {
            TURBO_MULTIPLIER
        } else {
            1.0
        };
        set_throttle(motion, throttle_from_input(input), multiplier);
        set_turn(motion, turn_from_input(input), 1.0);

        gunnery.since_last_shot += dt;
        let ready = gunnery.since_last_shot >= fire_cooldown(effects) - TIMER_EPSILON;
        if input.fire && ready {
            gunnery.since_last_shot = 0.0;
            gunnery.shots_fired += 1;
            true
        } else {
            false
        }
    };

    if input.turbo_active && !*turbo_was_active {
        session.emit(SimEvent::TurboEffect {
            ship: entity_id(player),
        });
    }
    *turbo_was_active = input.turbo_active;

    if wants_to_fire {
        world_setup::fire_from(world, player)?;
        session.shots_fired += 1;
        session.emit(SimEvent::ShotFired {
            ship: entity_id(player),
            faction: Faction::Player,
        });
    }

    Ok(())
}
