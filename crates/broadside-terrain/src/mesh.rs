//! Perturbed cone meshes for mountains and rocks.
//!
//! A cone is stored as its apex followed by one ring of base vertices, in
//! local space centered on the cone's mid-height (apex at `+height / 2`).

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape parameters for one cone.
#[derive(Debug, Clone, Copy)]
pub struct ConeParams {
    pub radius: f64,
    pub height: f64,
    pub segments: u32,
    /// Random radial noise amplitude as a fraction of the radius.
    pub noise: f64,
    /// Ridge sinusoid amplitude as a fraction of the radius.
    pub ridge: f64,
}

/// Cone vertices plus a vertical offset from the formation origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConeMesh {
    pub vertices: Vec<DVec3>,
    pub offset_y: f64,
    pub color: u32,
}

/// Visual shape of a formation: body plus optional snow cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormationMesh {
    pub body: ConeMesh,
    pub snow_cap: Option<ConeMesh>,
}

impl FormationMesh {
    /// All vertices in formation-local space, offsets applied.
    pub fn local_vertices(&self) -> impl Iterator<Item = DVec3> + '_ {
        let body = self
            .body
            .vertices
            .iter()
            .map(move |v| *v + DVec3::Y * self.body.offset_y);
        let cap = self.snow_cap.iter().flat_map(|cap| {
            cap.vertices
                .iter()
                .map(move |v| *v + DVec3::Y * cap.offset_y)
        });
        body.chain(cap)
    }
}

/// Build a cone whose base ring is pushed in and out by per-vertex noise and a
/// low-frequency ridge keyed to the polar angle. The apex is left untouched.
pub fn perturbed_cone<R: Rng + ?Sized>(rng: &mut R, params: ConeParams) -> Vec<DVec3> {
    let segments = params.segments.max(3);
    let half_height = params.height * 0.5;
    let mut vertices = Vec::with_capacity(segments as usize + 1);
    vertices.push(DVec3::new(0.0, half_height, 0.0));

    for i in 0..segments {
        let angle = i as f64 / segments as f64 * std::f64::consts::TAU;
        let noise = (rng.gen::<f64>() - 0.5) * params.radius * params.noise;
        let ridge =
            (angle * segments as f64 * 0.25).sin() * params.radius * params.ridge;
        let r = (params.radius + noise + ridge).max(params.radius * 0.1);
        vertices.push(DVec3::new(r * angle.sin(), -half_height, r * angle.cos()));
    }

    vertices
}
