//! Timed effects: countdowns, derived max speed and fire cooldown.
//!
//! Effects never stack. Re-applying an active effect resets its countdown,
//! and every derived value is recomputed from the set of active effects.

use hecs::{Entity, World};

use broadside_core::components::{ShipMotion, TimedEffects};
use broadside_core::constants::*;
use broadside_core::enums::EffectKind;
use broadside_core::events::SimEvent;

use crate::error::SimError;
use crate::session::Session;
use crate::systems::entity_id;
use crate::systems::ship_motion::set_throttle;

const ALL_EFFECTS: [EffectKind; 4] = [
    EffectKind::Slow,
    EffectKind::SpeedBoost,
    EffectKind::Shield,
    EffectKind::RapidFire,
];

pub fn duration(kind: EffectKind) -> f64 {
    match kind {
        EffectKind::Slow => SLOW_DURATION_SECS,
        EffectKind::SpeedBoost => SPEED_BOOST_DURATION_SECS,
        EffectKind::Shield => SHIELD_DURATION_SECS,
        EffectKind::RapidFire => RAPID_FIRE_DURATION_SECS,
    }
}

fn slot(effects: &mut TimedEffects, kind: EffectKind) -> &mut Option<f64> {
    match kind {
        EffectKind::Slow => &mut effects.slow,
        EffectKind::SpeedBoost => &mut effects.speed_boost,
        EffectKind::Shield => &mut effects.shield,
        EffectKind::RapidFire => &mut effects.rapid_fire,
    }
}

/// A shielded ship takes no projectile damage.
pub fn is_invulnerable(effects: &TimedEffects) -> bool {
    effects.shield.is_some()
}

pub fn fire_cooldown(effects: &TimedEffects) -> f64 {
    if effects.rapid_fire.is_some() {
        RAPID_FIRE_COOLDOWN
    } else {
        BASE_FIRE_COOLDOWN
    }
}

/// Profile top speed scaled by the active slow and boost effects.
pub fn effective_max_speed(original: f64, effects: &TimedEffects) -> f64 {
    let mut max_speed = original;
    if effects.slow.is_some() {
        max_speed *= SLOW_FACTOR;
    }
    if effects.speed_boost.is_some() {
        max_speed *= SPEED_BOOST_FACTOR;
    }
    max_speed
}

/// Recompute max speed and re-issue the last throttle command against it.
fn refresh_max_speed(motion: &mut ShipMotion, effects: &TimedEffects) {
    let max_speed = effective_max_speed(motion.original_max_speed, effects);
    if max_speed != motion.max_speed {
        motion.max_speed = max_speed;
        set_throttle(motion, motion.throttle, motion.throttle_multiplier);
    }
}

/// Start an effect, or restart its countdown if already active.
pub fn apply(
    world: &mut World,
    ship: Entity,
    kind: EffectKind,
    session: &mut Session,
) -> Result<(), SimError> {
    let (motion, effects) = world.query_one_mut::<(&mut ShipMotion, &mut TimedEffects)>(ship)?;
    *slot(effects, kind) = Some(duration(kind));
    refresh_max_speed(motion, effects);
    session.emit(SimEvent::EffectStarted {
        ship: entity_id(ship),
        kind,
    });
    Ok(())
}

/// Count down one ship's effects, ending any that run out.
pub fn tick_ship(
    world: &mut World,
    ship: Entity,
    dt: f64,
    session: &mut Session,
) -> Result<(), SimError> {
    let (motion, effects) = world.query_one_mut::<(&mut ShipMotion, &mut TimedEffects)>(ship)?;

    for kind in ALL_EFFECTS {
        let timer = slot(effects, kind);
        let Some(left) = *timer else {
            continue;
        };
        let left = left - dt;
        if left <= TIMER_EPSILON {
            *timer = None;
            session.emit(SimEvent::EffectEnded {
                ship: entity_id(ship),
                kind,
            });
        } else {
            *timer = Some(left);
        }
    }

    refresh_max_speed(motion, effects);
    Ok(())
}

pub fn run(world: &mut World, ships: &[Entity], dt: f64, session: &mut Session) {
    for &ship in ships {
        if !world.contains(ship) {
            continue;
        }
        if let Err(err) = tick_ship(world, ship, dt, session) {
            log::warn!("Skipping effects for ship {ship:?}: {err}");
        }
    }
}
