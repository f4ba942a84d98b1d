//! Simulation configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use broadside_core::constants::*;
use broadside_terrain::TerrainParams;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub terrain: TerrainParams,
    /// Master switch for terrain collision.
    pub terrain_collision: bool,
    pub enemy_spawn_interval_secs: f64,
    pub enemy_spawn_interval_min_secs: f64,
    pub sea_object_spawn_interval_secs: f64,
    pub max_sea_objects: usize,
    /// Jitter enemy speed and turn rate around their class profile.
    pub randomize_enemy_stats: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            terrain: TerrainParams::default(),
            terrain_collision: true,
            enemy_spawn_interval_secs: ENEMY_SPAWN_INTERVAL_SECS,
            enemy_spawn_interval_min_secs: ENEMY_SPAWN_INTERVAL_MIN_SECS,
            sea_object_spawn_interval_secs: SEA_OBJECT_SPAWN_INTERVAL_SECS,
            max_sea_objects: MAX_SEA_OBJECTS,
            randomize_enemy_stats: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=MAX_TIME_SCALE).contains(&self.time_scale) {
            return Err(invalid(
                "time_scale",
                format!("{} is outside 0..={MAX_TIME_SCALE}", self.time_scale),
            ));
        }
        if !is_positive(self.terrain.map_radius) {
            return Err(invalid("terrain.map_radius", "must be positive".into()));
        }
        if self.terrain.sector_count == 0 {
            return Err(invalid("terrain.sector_count", "must be at least 1".into()));
        }
        if !is_positive(self.enemy_spawn_interval_min_secs) {
            return Err(invalid(
                "enemy_spawn_interval_min_secs",
                "must be positive".into(),
            ));
        }
        if self.enemy_spawn_interval_secs < self.enemy_spawn_interval_min_secs {
            return Err(invalid(
                "enemy_spawn_interval_secs",
                format!(
                    "{} is below the minimum interval {}",
                    self.enemy_spawn_interval_secs, self.enemy_spawn_interval_min_secs
                ),
            ));
        }
        if !is_positive(self.sea_object_spawn_interval_secs) {
            return Err(invalid(
                "sea_object_spawn_interval_secs",
                "must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value > 0.0
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
