//! Events emitted by the simulation for effects, audio and UI feedback.
//!
//! Events are fire-and-forget: the presentation layer consumes them after the
//! tick and never feeds anything back into the simulation.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A shield absorbed a projectile.
    ShieldImpact { ship: EntityId, point: DVec3 },
    /// A bomb went off.
    Explosion { point: DVec3 },
    /// A projectile struck a ship, sea object or terrain.
    HitEffect { point: DVec3 },
    /// A projectile burst a skittle.
    SkittleDestroyed { point: DVec3 },
    /// The player engaged turbo.
    TurboEffect { ship: EntityId },
    /// The player bumped into terrain.
    CollisionFeedback { ship: EntityId },
    /// The player took damage.
    DamageFeedback { ship: EntityId },
    /// A projectile was fired.
    ShotFired { ship: EntityId, faction: Faction },
    /// A ship was destroyed.
    ShipDestroyed { ship: EntityId, class: ShipClass, faction: Faction },
    /// A timed effect was applied or refreshed.
    EffectStarted { ship: EntityId, kind: EffectKind },
    /// A timed effect ran out.
    EffectEnded { ship: EntityId, kind: EffectKind },
    /// A powerup was collected.
    PowerupCollected { ship: EntityId, kind: PowerupKind },
    ScoreChanged { score: u32 },
    HealthChanged { ship: EntityId, health: f64 },
    GameOver { final_score: u32 },
}
