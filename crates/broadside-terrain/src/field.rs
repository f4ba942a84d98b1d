//! TerrainField: every formation of a session plus collision queries.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use broadside_core::types::Aabb;

use crate::formation::Formation;

/// All terrain formations generated for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainField {
    formations: Vec<Formation>,
    /// Master switch for terrain collision.
    pub collision_enabled: bool,
}

impl Default for TerrainField {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl TerrainField {
    pub fn new(formations: Vec<Formation>) -> Self {
        Self {
            formations,
            collision_enabled: true,
        }
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn len(&self) -> usize {
        self.formations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formations.is_empty()
    }

    /// Number of formations that have finished rising.
    pub fn risen_count(&self) -> usize {
        self.formations.iter().filter(|f| !f.is_rising()).count()
    }

    /// Advance every rise animation. Returns how many formations settled this call.
    pub fn update(&mut self, dt: f64) -> usize {
        self.formations
            .iter_mut()
            .map(|f| f.advance_rise(dt))
            .filter(|settled| *settled)
            .count()
    }

    /// Finish every rise animation immediately.
    #[cfg(test)]
    pub fn settle_all(&mut self) {
        for formation in self.formations.iter_mut().filter(|f| f.is_rising()) {
            formation.settle();
        }
    }

    /// True if the ship box overlaps any risen formation's collision box.
    pub fn check_ship_collision(&self, ship_bounds: &Aabb) -> bool {
        self.collision_enabled
            && self
                .active_boxes()
                .any(|collision| collision.intersects(ship_bounds))
    }

    /// True if the point lies inside any risen formation's collision box.
    pub fn check_point_collision(&self, point: DVec3) -> bool {
        self.collision_enabled
            && self
                .active_boxes()
                .any(|collision| collision.contains_point(point))
    }

    fn active_boxes(&self) -> impl Iterator<Item = &Aabb> {
        self.formations.iter().filter_map(Formation::collision_box)
    }
}
