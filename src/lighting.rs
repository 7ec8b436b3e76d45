//! Light transport approximations for clouds and terrain.
//!
//! Beer-Lambert shadow transmittance through the density field, the
//! Henyey-Greenstein phase function, a cheap multiple-scattering boost and
//! the terrain surface shading model. All closed-form or bounded-iteration;
//! nothing here can fail at runtime.

use glam::Vec3A;

use crate::noise::fbm_noise;

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Sun radiance color (slightly warm white).
pub const SUN_COLOR: Color = Vec3A::new(1.0, 0.98, 0.94);
/// HDR intensity multiplier for direct sunlight on clouds.
pub const SUN_INTENSITY: f32 = 4.0;
/// Ambient sky radiance reaching cloud interiors.
pub const AMBIENT_SKY: Color = Vec3A::new(0.42, 0.55, 0.75);

/// Scattering coefficient of the cloud medium.
pub const SCATTERING: f32 = 0.9;
/// Absorption coefficient of the cloud medium.
pub const ABSORPTION: f32 = 0.15;
/// Total extinction per unit density per unit length.
pub const EXTINCTION: f32 = SCATTERING + ABSORPTION;

/// Forward-scattering anisotropy for the cloud phase function.
pub const PHASE_G: f32 = 0.55;

/// Length of the shadow march toward the sun, in world units.
const SHADOW_MARCH_LENGTH: f32 = 4.0;
/// Below this transmittance the shadow march stops contributing.
const SHADOW_CUTOFF: f32 = 0.01;

/// Unit vector toward the sun.
pub fn sun_direction() -> Vec3A {
    Vec3A::new(0.35, 0.5, 0.25).normalize()
}

/// Beer-Lambert light transmittance from `pos` toward `light_dir`.
///
/// Marches a short fixed-step ray through `density`, multiplying in
/// `exp(-density * step * extinction)` per sample and bailing out once the
/// remaining transmittance is negligible. The density field is injected so
/// the integrator and tests can supply the same sampler they march with.
pub fn cloud_shadowing<F>(density: &F, pos: Vec3A, light_dir: Vec3A, time: f32, samples: u32) -> f32
where
    F: Fn(Vec3A, f32) -> f32,
{
    let step = SHADOW_MARCH_LENGTH / samples as f32;
    let mut transmittance = 1.0;

    for i in 0..samples {
        let sample_pos = pos + light_dir * (step * (i as f32 + 0.5));
        let rho = density(sample_pos, time);
        if rho > 0.0 {
            transmittance *= (-rho * step * EXTINCTION).exp();
        }
        if transmittance < SHADOW_CUTOFF {
            break;
        }
    }

    transmittance
}

/// Henyey-Greenstein phase function.
///
/// `cos_theta` is the cosine of the angle between the light and view
/// directions; `g` in (-1, 1) biases the lobe forward (positive) or backward.
pub fn henyey_greenstein_phase(cos_theta: f32, g: f32) -> f32 {
    let g2 = g * g;
    let denom = (1.0 + g2 - 2.0 * g * cos_theta).max(1e-4);
    (1.0 - g2) / (4.0 * std::f32::consts::PI * denom * denom.sqrt())
}

/// Heuristic multiple-scattering boost.
///
/// `0.2 + 0.8 * attenuation^0.25` brightens partially shadowed regions the
/// way real multi-bounce scattering would, at none of the cost. The density
/// argument is part of the sampling interface; the current approximation
/// depends only on the attenuation.
pub fn multiple_scattering(_density: f32, light_attenuation: f32) -> f32 {
    0.2 + 0.8 * light_attenuation.powf(0.25)
}

/// Shade a terrain surface point.
///
/// Lambertian diffuse plus a power-16 specular reflection of the sun about
/// the normal, a flat ambient floor, and an albedo that drifts between earth
/// tones with low-frequency fbm for procedural material variation.
pub fn shade_terrain(pos: Vec3A, normal: Vec3A, ray_dir: Vec3A, _time: f32) -> Color {
    let sun = sun_direction();

    // Procedural albedo: low-frequency blend between rock and scrub tones
    let variation = fbm_noise(pos * 0.15, 3, 2.0, 0.5) * 0.5 + 0.5;
    let rock = Vec3A::new(0.45, 0.38, 0.32);
    let scrub = Vec3A::new(0.30, 0.42, 0.22);
    let albedo = rock.lerp(scrub, variation);

    let diffuse = normal.dot(sun).max(0.0);

    let reflected = reflect(-sun, normal);
    let view = -ray_dir;
    let specular = reflected.dot(view).max(0.0).powi(16);

    let ambient = 0.22;

    albedo * (SUN_COLOR * diffuse + Vec3A::splat(ambient)) + SUN_COLOR * (specular * 0.25)
}

/// Reflect a vector off a surface using the law of reflection.
fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}
