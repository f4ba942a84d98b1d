//! A single terrain formation: placement, rise animation and collision box.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use broadside_core::constants::{
    TERRAIN_COLLISION_HEIGHT_FRACTION, TERRAIN_COLLISION_SHRINK, TERRAIN_RISE_FRAME_SECS,
};
use broadside_core::enums::FormationKind;
use broadside_core::types::{rotate_y, Aabb};

use crate::mesh::FormationMesh;

/// Mountain or rock with an independent rise animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub kind: FormationKind,
    /// Origin of the formation. `y` climbs from below the water to `rest_y`.
    pub position: DVec3,
    pub yaw: f64,
    pub base_radius: f64,
    pub height: f64,
    pub mesh: FormationMesh,
    pub rest_y: f64,
    /// Rise per reference frame (units).
    pub rise_speed: f64,
    rising: bool,
    /// Visual bounds relative to `position`.
    local_bounds: Aabb,
    collision_box: Option<Aabb>,
}

impl Formation {
    pub fn new(
        kind: FormationKind,
        position: DVec3,
        yaw: f64,
        base_radius: f64,
        height: f64,
        mesh: FormationMesh,
        rise_speed: f64,
    ) -> Self {
        let rotated: Vec<DVec3> = mesh.local_vertices().map(|v| rotate_y(v, yaw)).collect();
        let local_bounds = Aabb::from_points(&rotated).unwrap_or_default();

        Self {
            kind,
            position,
            yaw,
            base_radius,
            height,
            mesh,
            rest_y: 0.0,
            rise_speed,
            rising: true,
            local_bounds,
            collision_box: None,
        }
    }

    pub fn is_rising(&self) -> bool {
        self.rising
    }

    /// World-space bounds of the rendered shape.
    pub fn visual_bounds(&self) -> Aabb {
        self.local_bounds.translated(self.position)
    }

    /// Collision volume. `None` until the rise has completed.
    pub fn collision_box(&self) -> Option<&Aabb> {
        self.collision_box.as_ref()
    }

    /// Advance the rise animation. Returns `true` on the tick the formation settles.
    pub fn advance_rise(&mut self, dt: f64) -> bool {
        if !self.rising {
            return false;
        }
        self.position.y += self.rise_speed * dt / TERRAIN_RISE_FRAME_SECS;
        if self.position.y >= self.rest_y {
            self.settle();
            return true;
        }
        false
    }

    /// Jump to the resting height and activate collision.
    pub fn settle(&mut self) {
        self.position.y = self.rest_y;
        self.rising = false;
        self.collision_box = Some(collision_box_from_visual(&self.visual_bounds()));
    }
}

/// Shrink visual bounds to the solid bulk of a formation: the horizontal
/// footprint keeps `TERRAIN_COLLISION_SHRINK` of its size around the center and
/// the vertical extent keeps only the lower `TERRAIN_COLLISION_HEIGHT_FRACTION`.
pub fn collision_box_from_visual(visual: &Aabb) -> Aabb {
    let center = visual.center();
    let size = visual.size();
    let half_x = size.x * TERRAIN_COLLISION_SHRINK * 0.5;
    let half_z = size.z * TERRAIN_COLLISION_SHRINK * 0.5;

    Aabb::new(
        DVec3::new(center.x - half_x, visual.min.y, center.z - half_z),
        DVec3::new(
            center.x + half_x,
            visual.min.y + size.y * TERRAIN_COLLISION_HEIGHT_FRACTION,
            center.z + half_z,
        ),
    )
}
