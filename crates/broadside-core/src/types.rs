//! Fundamental geometric and simulation types.
//!
//! Coordinates follow the rendering convention of the game: x/z span the sea
//! plane, y is up. A heading (yaw) of 0 faces +z.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Stable identifier for an entity, as exposed to snapshots and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
    /// Duration of the most recent tick in seconds.
    pub last_dt: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
        self.last_dt = dt;
    }
}

/// Forward unit vector for a yaw angle: `(sin(yaw), 0, cos(yaw))`.
pub fn forward(yaw: f64) -> DVec3 {
    DVec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Rotate a local-space offset about the vertical axis by `yaw`.
pub fn rotate_y(offset: DVec3, yaw: f64) -> DVec3 {
    let (sin, cos) = yaw.sin_cos();
    DVec3::new(
        offset.x * cos + offset.z * sin,
        offset.y,
        -offset.x * sin + offset.z * cos,
    )
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: DVec3::ZERO,
            max: DVec3::ZERO,
        }
    }
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with the given half extents.
    pub fn from_center(center: DVec3, half_extents: DVec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box enclosing every point. Returns `None` for an empty slice.
    pub fn from_points(points: &[DVec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: DVec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Inclusive overlap test.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn translated(&self, offset: DVec3) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}
