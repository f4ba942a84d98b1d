//! Scripted pilot for headless runs.
//!
//! Chases the nearest enemy in range and shoots when lined up, otherwise
//! cruises in a slow weave. Backs off for a moment after bumping terrain.

use broadside_ai::fsm::{heading_error, turn_toward};
use broadside_core::commands::InputIntent;
use broadside_core::constants::AI_FIRE_CONE;
use broadside_core::enums::{Faction, Turn};
use broadside_core::events::SimEvent;
use broadside_core::state::{GameStateSnapshot, ShipView};

/// Enemies closer than this are chased.
const ENGAGE_RANGE: f64 = 300.0;

/// Ticks spent reversing after a terrain bump.
const REVERSE_TICKS: u32 = 90;

/// Weave period and the share of it spent turning (ticks).
const WEAVE_PERIOD: u64 = 480;
const WEAVE_TURN: u64 = 90;

#[derive(Debug, Default)]
pub struct Autopilot {
    reversing: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls for the tick after `snapshot`.
    pub fn steer(&mut self, snapshot: &GameStateSnapshot) -> InputIntent {
        let Some(player) = &snapshot.player else {
            return InputIntent::default();
        };

        let bumped = snapshot
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::CollisionFeedback { .. }));
        if bumped {
            self.reversing = REVERSE_TICKS;
        }
        if self.reversing > 0 {
            self.reversing -= 1;
            return InputIntent {
                backward: true,
                right: true,
                ..Default::default()
            };
        }

        let mut input = InputIntent {
            forward: true,
            turbo_active: player.slowed,
            ..Default::default()
        };

        match nearest_enemy(player, &snapshot.ships) {
            Some(enemy) => {
                match turn_toward(player.position, player.yaw, enemy.position) {
                    Turn::Left => input.left = true,
                    Turn::Right => input.right = true,
                    Turn::None => {}
                }
                input.fire =
                    heading_error(player.position, player.yaw, enemy.position) < AI_FIRE_CONE;
            }
            None => input.left = snapshot.time.tick % WEAVE_PERIOD < WEAVE_TURN,
        }
        input
    }
}

fn nearest_enemy<'a>(player: &ShipView, ships: &'a [ShipView]) -> Option<&'a ShipView> {
    ships
        .iter()
        .filter(|s| s.faction == Faction::Enemy)
        .map(|s| (s.position.distance(player.position), s))
        .filter(|(d, _)| *d < ENGAGE_RANGE)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, s)| s)
}
