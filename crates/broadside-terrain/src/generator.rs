//! Procedural terrain layout.
//!
//! Mountains are spread over angular sectors of a disc with a three-band
//! radial distribution, topped up with a forward-biased batch so terrain is
//! always visible ahead of the starting heading. Rocks are scattered around
//! most mountains and in standalone clusters.

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use broadside_core::constants::*;
use broadside_core::enums::FormationKind;

use crate::field::TerrainField;
use crate::formation::Formation;
use crate::mesh::{perturbed_cone, ConeMesh, ConeParams, FormationMesh};
use crate::palette::{adjust_color, pick, MOUNTAIN_COLORS, SNOW_COLORS};

/// Radius the distance bands below were tuned for.
const REFERENCE_RADIUS: f64 = 2000.0;

/// Inner / middle / outer distance bands, as fractions of the map radius.
const DISTANCE_BANDS: [(f64, f64); 3] = [(0.15, 0.5), (0.5, 0.9), (0.9, 1.5)];

/// Cumulative probability of the inner and middle bands.
const BAND_CUMULATIVE: [f64; 2] = [0.3, 0.7];

/// Forward batch distance tiers, as fractions of the map radius.
const FORWARD_TIERS: [(f64, f64); 3] = [(0.5, 0.75), (0.75, 1.1), (1.1, 1.5)];

/// Half-width of the forward arc (radians).
const FORWARD_ARC: f64 = std::f64::consts::FRAC_PI_4;

const MOUNTAIN_START_Y: f64 = -20.0;
const ROCK_START_Y: f64 = -10.0;
const CLUSTER_ROCK_START_Y: f64 = -15.0;

/// Chance that a mountain gets surrounding rocks.
const SURROUNDING_ROCK_CHANCE: f64 = 0.8;

/// Layout parameters for one session's terrain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub map_radius: f64,
    pub sector_count: u32,
    pub mountain_count: u32,
    pub standalone_clusters: u32,
    /// Heading the player starts facing (radians).
    pub forward_heading: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            map_radius: TERRAIN_MAP_RADIUS,
            sector_count: TERRAIN_SECTOR_COUNT,
            mountain_count: TERRAIN_MOUNTAIN_COUNT,
            standalone_clusters: TERRAIN_STANDALONE_CLUSTERS,
            forward_heading: 0.0,
        }
    }
}

/// Generate the full terrain field for a session.
pub fn generate<R: Rng + ?Sized>(params: &TerrainParams, rng: &mut R) -> TerrainField {
    let mut builder = Builder {
        rng,
        scale: params.map_radius / REFERENCE_RADIUS,
        formations: Vec::new(),
    };

    let sectors = params.sector_count.max(1);
    let per_sector = params.mountain_count / sectors;
    let remainder = params.mountain_count % sectors;

    for sector in 0..sectors {
        for _ in 0..per_sector {
            builder.mountain_in_sector(sector, sectors);
        }
    }
    for _ in 0..remainder {
        let sector = builder.rng.gen_range(0..sectors);
        builder.mountain_in_sector(sector, sectors);
    }

    builder.forward_mountains(params.forward_heading);

    for _ in 0..params.standalone_clusters {
        let sector = builder.rng.gen_range(0..sectors);
        builder.standalone_cluster(sector, sectors);
    }

    let mountains = builder
        .formations
        .iter()
        .filter(|f| f.kind == FormationKind::Mountain)
        .count();
    log::info!(
        "Generated terrain: {} formations ({} mountains) over {} sectors, radius {}",
        builder.formations.len(),
        mountains,
        sectors,
        params.map_radius
    );

    TerrainField::new(builder.formations)
}

/// Uniform angle within a sector.
pub fn sector_angle<R: Rng + ?Sized>(rng: &mut R, sector: u32, sector_count: u32) -> f64 {
    let width = std::f64::consts::TAU / sector_count as f64;
    (sector as f64 + rng.gen::<f64>()) * width
}

/// Distance drawn from the 30% / 40% / 30% inner / middle / outer bands.
pub fn band_distance<R: Rng + ?Sized>(rng: &mut R, map_radius: f64) -> f64 {
    let zone: f64 = rng.gen();
    let (lo, hi) = if zone < BAND_CUMULATIVE[0] {
        DISTANCE_BANDS[0]
    } else if zone < BAND_CUMULATIVE[1] {
        DISTANCE_BANDS[1]
    } else {
        DISTANCE_BANDS[2]
    };
    rng.gen_range(lo..hi) * map_radius
}

/// Point on the sea plane at `angle` (from +z toward +x) and `distance` from `origin`.
fn polar(origin: DVec3, angle: f64, distance: f64, y: f64) -> DVec3 {
    DVec3::new(
        origin.x + angle.sin() * distance,
        y,
        origin.z + angle.cos() * distance,
    )
}

struct Builder<'r, R: Rng + ?Sized> {
    rng: &'r mut R,
    scale: f64,
    formations: Vec<Formation>,
}

impl<R: Rng + ?Sized> Builder<'_, R> {
    fn mountain_in_sector(&mut self, sector: u32, sector_count: u32) {
        let angle = sector_angle(self.rng, sector, sector_count);
        let distance = band_distance(self.rng, REFERENCE_RADIUS * self.scale);
        let base_radius = self.rng.gen_range(40.0..220.0);
        let height = self.rng.gen_range(100.0..500.0);
        self.mountain_at(polar(DVec3::ZERO, angle, distance, 0.0), base_radius, height);
    }

    fn forward_mountains(&mut self, heading: f64) {
        let count = self.rng.gen_range(5..=8);
        for i in 0..count {
            let angle = heading + self.rng.gen_range(-FORWARD_ARC..FORWARD_ARC);
            let (lo, hi) = match i {
                0 | 1 => FORWARD_TIERS[0],
                2 | 3 => FORWARD_TIERS[1],
                _ => FORWARD_TIERS[2],
            };
            let distance = self.rng.gen_range(lo..hi) * REFERENCE_RADIUS * self.scale;
            let base_radius = self.rng.gen_range(80.0..280.0);
            let height = self.rng.gen_range(200.0..700.0);
            self.mountain_at(polar(DVec3::ZERO, angle, distance, 0.0), base_radius, height);
        }
    }

    fn mountain_at(&mut self, at: DVec3, base_radius: f64, height: f64) {
        let segments = self.rng.gen_range(16..32);
        let body = ConeMesh {
            vertices: perturbed_cone(
                self.rng,
                ConeParams {
                    radius: base_radius,
                    height,
                    segments,
                    noise: 0.3,
                    ridge: 0.1,
                },
            ),
            offset_y: 0.0,
            color: pick(self.rng, &MOUNTAIN_COLORS),
        };

        let cap_height = height * self.rng.gen_range(0.3..0.7);
        let snow_cap = ConeMesh {
            vertices: perturbed_cone(
                self.rng,
                ConeParams {
                    radius: base_radius * 0.95,
                    height: cap_height,
                    segments,
                    noise: 0.15,
                    ridge: 0.05,
                },
            ),
            offset_y: height * 0.5 - cap_height * 0.5,
            color: pick(self.rng, &SNOW_COLORS),
        };

        let rise_speed = self.rng.gen_range(0.05..0.45);
        self.formations.push(Formation::new(
            FormationKind::Mountain,
            DVec3::new(at.x, MOUNTAIN_START_Y, at.z),
            0.0,
            base_radius,
            height,
            FormationMesh {
                body,
                snow_cap: Some(snow_cap),
            },
            rise_speed,
        ));

        if self.rng.gen_bool(SURROUNDING_ROCK_CHANCE) {
            self.surrounding_rocks(at, base_radius);
        }
    }

    fn surrounding_rocks(&mut self, center: DVec3, base_radius: f64) {
        let count = self.rng.gen_range(2..=5);
        for _ in 0..count {
            let distance = base_radius * self.rng.gen_range(0.8..2.3);
            let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
            let radius = base_radius * self.rng.gen_range(0.1..0.4);
            let rise_speed = self.rng.gen_range(0.05..0.25);
            self.rock_at(
                FormationKind::Rock,
                polar(center, angle, distance, ROCK_START_Y),
                radius,
                0.5,
                rise_speed,
            );
        }
    }

    fn standalone_cluster(&mut self, sector: u32, sector_count: u32) {
        let angle = sector_angle(self.rng, sector, sector_count);
        let distance = band_distance(self.rng, REFERENCE_RADIUS * self.scale);
        let center = polar(DVec3::ZERO, angle, distance, 0.0);
        let count = self.rng.gen_range(3..=6);
        let cluster_radius = self.rng.gen_range(30.0..100.0);

        for _ in 0..count {
            let offset = self.rng.gen::<f64>() * cluster_radius;
            let rock_angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
            let radius = self.rng.gen_range(10.0..40.0);
            let rise_speed = self.rng.gen_range(0.05..0.2);
            self.rock_at(
                FormationKind::ClusterRock,
                polar(center, rock_angle, offset, CLUSTER_ROCK_START_Y),
                radius,
                0.4,
                rise_speed,
            );
        }
    }

    fn rock_at(
        &mut self,
        kind: FormationKind,
        at: DVec3,
        radius: f64,
        snow_chance: f64,
        rise_speed: f64,
    ) {
        let height = radius * self.rng.gen_range(1.0..3.0);
        let variation = self.rng.gen_range(0.1..0.3);
        let base_color = pick(self.rng, &MOUNTAIN_COLORS);
        let body = ConeMesh {
            vertices: perturbed_cone(
                self.rng,
                ConeParams {
                    radius,
                    height,
                    segments: 8,
                    noise: 0.0,
                    ridge: 0.0,
                },
            ),
            offset_y: 0.0,
            color: adjust_color(self.rng, base_color, variation),
        };

        let snow_cap = if self.rng.gen_bool(snow_chance) {
            let cap_height = height * self.rng.gen_range(0.2..0.5);
            Some(ConeMesh {
                vertices: perturbed_cone(
                    self.rng,
                    ConeParams {
                        radius: radius * 0.95,
                        height: cap_height,
                        segments: 8,
                        noise: 0.0,
                        ridge: 0.0,
                    },
                ),
                offset_y: height * 0.5 - cap_height * 0.5,
                color: pick(self.rng, &SNOW_COLORS),
            })
        } else {
            None
        };

        let yaw = self.rng.gen_range(0.0..std::f64::consts::TAU);
        self.formations.push(Formation::new(
            kind,
            at,
            yaw,
            radius,
            height,
            FormationMesh { body, snow_cap },
            rise_speed,
        ));
    }
}
