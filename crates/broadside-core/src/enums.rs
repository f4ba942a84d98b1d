//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side a ship or projectile fights for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Player,
    Enemy,
}

/// Ship class. Selects the stat profile and incoming-damage multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    #[default]
    Standard,
    /// Fast and fragile.
    Destroyer,
    /// Slow and tanky.
    Battleship,
    /// Balanced.
    Cruiser,
    /// Stealthy, moderate stats.
    Submarine,
    /// Slow, very tanky.
    Carrier,
}

impl ShipClass {
    pub const ALL: [ShipClass; 6] = [
        ShipClass::Standard,
        ShipClass::Destroyer,
        ShipClass::Battleship,
        ShipClass::Cruiser,
        ShipClass::Submarine,
        ShipClass::Carrier,
    ];
}

/// Powerup subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Doubles max speed for a while.
    Speed,
    /// Absorbs all projectile damage for a while.
    Shield,
    /// Shortens the fire cooldown for a while.
    RapidFire,
    /// Instant heal.
    Health,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Speed,
        PowerupKind::Shield,
        PowerupKind::RapidFire,
        PowerupKind::Health,
    ];
}

/// Sea object type. Immutable after spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "subtype")]
pub enum SeaObjectKind {
    Bomb,
    Skittle,
    Powerup(PowerupKind),
}

/// Timed effects a ship can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Skittle slow: halves max speed.
    Slow,
    SpeedBoost,
    Shield,
    RapidFire,
}

/// Throttle command for a ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Throttle {
    #[default]
    None,
    Forward,
    Backward,
}

/// Turn command for a ship. Left is positive yaw rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    #[default]
    None,
    Left,
    Right,
}

/// Terrain formation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationKind {
    Mountain,
    /// Rock scattered around a mountain.
    Rock,
    /// Rock belonging to a standalone cluster.
    ClusterRock,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Lobby,
    Active,
    Paused,
    GameOver,
}
