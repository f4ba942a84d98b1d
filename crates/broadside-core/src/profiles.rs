//! Ship stat profiles.
//!
//! Data-driven table keyed by [`ShipClass`]; looked up once at construction.

use serde::{Deserialize, Serialize};

use crate::enums::ShipClass;

/// Stat profile for a ship.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipProfile {
    /// Top speed (units per calibrated frame).
    pub max_speed: f64,
    /// Top yaw rate (radians per calibrated frame).
    pub max_turn_rate: f64,
    pub health: f64,
    pub acceleration_rate: f64,
    /// Uniform hull scale.
    pub scale: f64,
    /// Hull color (0xRRGGBB) for the presentation layer.
    pub color: u32,
    /// Multiplier on incoming projectile damage (non-player targets only).
    pub damage_multiplier: f64,
}

/// Fixed high-performance profile used by the player ship.
pub const PLAYER_PROFILE: ShipProfile = ShipProfile {
    max_speed: 1.5,
    max_turn_rate: 0.02,
    health: 100.0,
    acceleration_rate: 0.05,
    scale: 1.0,
    color: 0x3366ff,
    damage_multiplier: 1.0,
};

/// Get the stat profile for an enemy ship class.
pub fn ship_profile(class: ShipClass) -> ShipProfile {
    match class {
        ShipClass::Standard => ShipProfile {
            max_speed: 0.8,
            max_turn_rate: 0.01,
            health: 100.0,
            acceleration_rate: 0.05,
            scale: 1.0,
            color: 0xff3333,
            damage_multiplier: 1.0,
        },
        ShipClass::Destroyer => ShipProfile {
            max_speed: 1.1,
            max_turn_rate: 0.014,
            health: 70.0,
            acceleration_rate: 0.07,
            scale: 0.85,
            color: 0xff6633,
            damage_multiplier: 1.2,
        },
        ShipClass::Battleship => ShipProfile {
            max_speed: 0.5,
            max_turn_rate: 0.006,
            health: 200.0,
            acceleration_rate: 0.03,
            scale: 1.4,
            color: 0x993333,
            damage_multiplier: 0.6,
        },
        ShipClass::Cruiser => ShipProfile {
            max_speed: 0.8,
            max_turn_rate: 0.01,
            health: 120.0,
            acceleration_rate: 0.05,
            scale: 1.1,
            color: 0xcc3333,
            damage_multiplier: 0.8,
        },
        ShipClass::Submarine => ShipProfile {
            max_speed: 0.7,
            max_turn_rate: 0.012,
            health: 90.0,
            acceleration_rate: 0.045,
            scale: 0.9,
            color: 0x333366,
            damage_multiplier: 0.9,
        },
        ShipClass::Carrier => ShipProfile {
            max_speed: 0.4,
            max_turn_rate: 0.005,
            health: 250.0,
            acceleration_rate: 0.025,
            scale: 1.6,
            color: 0x666666,
            damage_multiplier: 0.5,
        },
    }
}

/// Relative spawn weight of each enemy class.
pub fn spawn_weight(class: ShipClass) -> u32 {
    match class {
        ShipClass::Standard => 30,
        ShipClass::Destroyer => 20,
        ShipClass::Cruiser => 20,
        ShipClass::Submarine => 15,
        ShipClass::Battleship => 10,
        ShipClass::Carrier => 5,
    }
}

/// Incoming projectile damage after the class multiplier, rounded up.
///
/// The player ship always takes the raw amount.
pub fn scaled_damage(base: f64, class: ShipClass, is_player: bool) -> f64 {
    if is_player {
        return base;
    }
    // Tolerance keeps exact products like 25 * 1.2 from rounding up past 30.
    (base * ship_profile(class).damage_multiplier - 1e-9).ceil()
}
