//! Implicit terrain surface and sphere-tracing raymarcher.
//!
//! The terrain is a height field perturbed by fbm and ridged noise, expressed
//! as an implicit function and sphere-traced as if it were a signed distance
//! field. It is not a true SDF (the noise has no Lipschitz bound), so each
//! step is under-relaxed to avoid overshooting the surface. Keep the
//! relaxation factor as-is; it is tuned to this field and changing it (or
//! "fixing" the field into a real SDF) changes the rendered image.

use glam::Vec3A;

use crate::noise::{fbm_noise, ridged_noise};

/// Sentinel distance returned by [`raymarch_terrain`] on a miss.
pub const TERRAIN_MAX_DIST: f32 = 100.0;

/// Vertical offset of the mean terrain surface below y = 0.
const TERRAIN_OFFSET: f32 = 2.5;
/// Amplitude of the rolling fbm component.
const FBM_AMP: f32 = 1.2;
/// Signed amplitude of the ridged component; negative pushes ridges upward.
const RIDGE_AMP: f32 = -0.8;

const MAX_STEPS: u32 = 100;
/// Under-relaxation applied to every sphere-tracing step.
const RELAXATION: f32 = 0.8;
const HIT_EPS: f32 = 0.001;
const NORMAL_EPS: f32 = 0.01;

/// Approximate signed distance from `pos` to the terrain surface.
///
/// Height-field style: `y + offset + fbm(xz) * A + ridged(xz) * B`. Positive
/// above the surface, negative below, but only distance-like near it.
pub fn scene_sdf(pos: Vec3A) -> f32 {
    let rolling = Vec3A::new(pos.x * 0.25, 0.0, pos.z * 0.25);
    let ridges = Vec3A::new(pos.x * 0.15, 0.0, pos.z * 0.15);
    pos.y + TERRAIN_OFFSET + fbm_noise(rolling, 4, 2.0, 0.5) * FBM_AMP + ridged_noise(ridges, 3) * RIDGE_AMP
}

/// Sphere-trace the terrain from `origin` along unit direction `dir`.
///
/// Returns the hit distance, or [`TERRAIN_MAX_DIST`] if the ray escapes.
/// Bounded at 100 iterations; terminates early on a hit (field value under
/// epsilon) or once the accumulated distance leaves the far range.
pub fn raymarch_terrain(origin: Vec3A, dir: Vec3A) -> f32 {
    let mut t = 0.0;

    for _ in 0..MAX_STEPS {
        let d = scene_sdf(origin + dir * t);
        if d < HIT_EPS {
            return t;
        }
        t += d * RELAXATION;
        if t > TERRAIN_MAX_DIST {
            return TERRAIN_MAX_DIST;
        }
    }

    TERRAIN_MAX_DIST
}

/// Surface normal by central finite differences of [`scene_sdf`].
pub fn scene_normal(pos: Vec3A) -> Vec3A {
    let ex = Vec3A::new(NORMAL_EPS, 0.0, 0.0);
    let ey = Vec3A::new(0.0, NORMAL_EPS, 0.0);
    let ez = Vec3A::new(0.0, 0.0, NORMAL_EPS);

    Vec3A::new(
        scene_sdf(pos + ex) - scene_sdf(pos - ex),
        scene_sdf(pos + ey) - scene_sdf(pos - ey),
        scene_sdf(pos + ez) - scene_sdf(pos - ez),
    )
    .normalize()
}
