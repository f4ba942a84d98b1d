//! Callback-style view of simulation events.
//!
//! Presentation layers that prefer callbacks over matching on [`SimEvent`]
//! implement [`SimObserver`] and pass a tick's events to [`dispatch`].

use glam::DVec3;

use crate::enums::{EffectKind, PowerupKind};
use crate::events::SimEvent;
use crate::types::EntityId;

/// Receiver for simulation notifications. All methods default to no-ops.
pub trait SimObserver {
    fn on_shield_impact(&mut self, _ship: EntityId, _point: DVec3) {}
    fn on_explosion(&mut self, _point: DVec3) {}
    fn on_hit_effect(&mut self, _point: DVec3) {}
    fn on_skittle_destroyed(&mut self, _point: DVec3) {}
    fn on_turbo_effect(&mut self, _ship: EntityId) {}
    fn on_collision_feedback(&mut self, _ship: EntityId) {}
    fn on_damage_feedback(&mut self, _ship: EntityId) {}
    fn on_effect_started(&mut self, _ship: EntityId, _kind: EffectKind) {}
    fn on_effect_ended(&mut self, _ship: EntityId, _kind: EffectKind) {}
    fn on_powerup_collected(&mut self, _ship: EntityId, _kind: PowerupKind) {}
    fn on_score_changed(&mut self, _score: u32) {}
    fn on_health_changed(&mut self, _ship: EntityId, _health: f64) {}
    fn on_game_over(&mut self, _final_score: u32) {}
}

/// Forward each event to the matching observer method, in order.
pub fn dispatch<O: SimObserver + ?Sized>(events: &[SimEvent], observer: &mut O) {
    for event in events {
        match *event {
            SimEvent::ShieldImpact { ship, point } => observer.on_shield_impact(ship, point),
            SimEvent::Explosion { point } => observer.on_explosion(point),
            SimEvent::HitEffect { point } => observer.on_hit_effect(point),
            SimEvent::SkittleDestroyed { point } => observer.on_skittle_destroyed(point),
            SimEvent::TurboEffect { ship } => observer.on_turbo_effect(ship),
            SimEvent::CollisionFeedback { ship } => observer.on_collision_feedback(ship),
            SimEvent::DamageFeedback { ship } => observer.on_damage_feedback(ship),
            SimEvent::EffectStarted { ship, kind } => observer.on_effect_started(ship, kind),
            SimEvent::EffectEnded { ship, kind } => observer.on_effect_ended(ship, kind),
            SimEvent::PowerupCollected { ship, kind } => observer.on_powerup_collected(ship, kind),
            SimEvent::ScoreChanged { score } => observer.on_score_changed(score),
            SimEvent::HealthChanged { ship, health } => observer.on_health_changed(ship, health),
            SimEvent::GameOver { final_score } => observer.on_game_over(final_score),
            SimEvent::ShotFired { .. } | SimEvent::ShipDestroyed { .. } => {}
        }
    }
}
