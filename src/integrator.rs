//! Primary per-ray integrator.
//!
//! One ray per pixel walks a small state machine: sphere-trace the terrain,
//! pick a background (shaded terrain surface or analytic sky), volumetrically
//! integrate the cloud field front-to-back over the march interval, composite
//! the cloud radiance over the background, then apply distance fog. The whole
//! path is a pure function of the ray and the simulation time, so pixels can
//! be evaluated in any order or fully in parallel.

use glam::Vec3A;

use crate::clouds;
use crate::interval::Interval;
use crate::lighting::{
    cloud_shadowing, henyey_greenstein_phase, multiple_scattering, shade_terrain, sun_direction,
    Color, ABSORPTION, AMBIENT_SKY, PHASE_G, SCATTERING, SUN_COLOR, SUN_INTENSITY,
};
use crate::ray::Ray;
use crate::sky::sky_radiance;
use crate::terrain::{raymarch_terrain, scene_normal, TERRAIN_MAX_DIST};

/// Fixed number of samples for the volumetric cloud march.
pub const CLOUD_STEPS: u32 = 80;
/// Number of samples for each shadow march toward the sun.
pub const SHADOW_SAMPLES: u32 = 6;

/// March start distance in front of the camera.
const MARCH_START: f32 = 1.0;
/// March end distance when the ray misses the terrain.
const SKY_MARCH_END: f32 = 80.0;
/// Cap on the march end distance when the ray hits terrain.
const TERRAIN_MARCH_CAP: f32 = 50.0;
/// Pull the march end slightly in front of the terrain hit.
const HIT_MARGIN: f32 = 0.05;

/// Densities below this contribute nothing and skip the lighting work.
const DENSITY_CUTOFF: f32 = 0.01;
/// Once ray transmittance collapses below this the rest of the interval is
/// skipped entirely; the exponential decay guarantees the remainder would be
/// negligible anyway.
const TRANSMITTANCE_CUTOFF: f32 = 0.01;

/// Sub-step offset applied to every sample to reduce banding.
const STEP_JITTER: f32 = 0.3;

/// Fog starts past this distance.
const FOG_START: f32 = 40.0;
/// Exponential fog falloff per world unit of excess distance.
const FOG_FALLOFF: f32 = 0.06;

/// Result of integrating the cloud field along one ray.
///
/// Starts at (transmittance 1, radiance 0); the march only ever decreases
/// transmittance and adds radiance, and the accumulator lives no longer than
/// the ray it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct CloudSample {
    /// Radiance scattered toward the camera by the cloud medium.
    pub radiance: Color,
    /// Fraction of the background that survives passage through the clouds.
    pub transmittance: f32,
}

/// Integrate the cloud density field front-to-back along `ray`.
///
/// Evaluates `density` at [`CLOUD_STEPS`] jittered positions within
/// `interval`, accumulating single-scattered sunlight (shadowed, phase
/// weighted, multiple-scatter boosted) plus an ambient term, attenuated by
/// the running transmittance. Samples are strictly front-to-back; once the
/// transmittance collapses the remainder of the interval is never evaluated.
///
/// The density field is a parameter so tests can substitute degenerate media;
/// the renderer passes [`clouds::cloud_density`].
pub fn integrate_clouds<F>(ray: &Ray, interval: Interval, time: f32, density: &F) -> CloudSample
where
    F: Fn(Vec3A, f32) -> f32,
{
    let mut result = CloudSample {
        radiance: Vec3A::ZERO,
        transmittance: 1.0,
    };

    if interval.is_empty() {
        return result;
    }

    let step = interval.size() / CLOUD_STEPS as f32;
    let sun = sun_direction();
    // Phase depends only on the ray/sun angle, constant along the march
    let phase = henyey_greenstein_phase(ray.direction.dot(sun), PHASE_G);

    for i in 0..CLOUD_STEPS {
        let t = interval.min + (i as f32 + STEP_JITTER) * step;
        let pos = ray.at(t);
        let rho = density(pos, time);
        if rho <= DENSITY_CUTOFF {
            continue;
        }

        let shadow = cloud_shadowing(density, pos, sun, time, SHADOW_SAMPLES);
        let boost = multiple_scattering(rho, shadow);
        let sun_term = SUN_COLOR * (SUN_INTENSITY * shadow * phase * boost);
        let ambient_term = AMBIENT_SKY * 0.3;

        result.radiance +=
            result.transmittance * (sun_term + ambient_term) * (rho * step * SCATTERING);
        result.transmittance *= (-(SCATTERING + ABSORPTION) * rho * step).exp();

        if result.transmittance < TRANSMITTANCE_CUTOFF {
            break;
        }
    }

    result
}

/// Compute the HDR radiance arriving along one primary ray.
pub fn pixel_radiance(ray: &Ray, time: f32) -> Color {
    let hit_t = raymarch_terrain(ray.origin, ray.direction);
    let hit = hit_t < TERRAIN_MAX_DIST;

    let (background, interval) = if hit {
        let pos = ray.at(hit_t);
        let normal = scene_normal(pos);
        let surface = shade_terrain(pos, normal, ray.direction, time);
        let march_end = (hit_t - HIT_MARGIN).min(TERRAIN_MARCH_CAP);
        (surface, Interval::new(MARCH_START, march_end))
    } else {
        let sky = sky_radiance(ray.direction, sun_direction());
        (sky, Interval::new(MARCH_START, SKY_MARCH_END))
    };

    let cloud = integrate_clouds(ray, interval, time, &clouds::cloud_density);

    // Stylized compositing: the blend alpha comes from the magnitude of the
    // accumulated cloud radiance, not from the integrated transmittance
    let alpha = cloud.radiance.length().clamp(0.0, 1.0);
    let mut color = background * (1.0 - alpha) + cloud.radiance;

    // Distance fog toward the sky color for far terrain hits
    if hit && hit_t > FOG_START {
        let fog = 1.0 - (-(hit_t - FOG_START) * FOG_FALLOFF).exp();
        let far = sky_radiance(ray.direction, sun_direction());
        color = color.lerp(far, fog);
    }

    color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_ray() -> Ray {
        Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.35, -1.0))
    }

    #[test]
    fn vacuum_integrates_to_nothing() {
        let vacuum = |_: Vec3A, _: f32| 0.0;
        let sample = integrate_clouds(&level_ray(), Interval::new(1.0, 80.0), 0.0, &vacuum);
        assert_eq!(sample.radiance, Vec3A::ZERO);
        assert_eq!(sample.transmittance, 1.0);
    }

    #[test]
    fn empty_interval_integrates_to_nothing() {
        let solid = |_: Vec3A, _: f32| 1.0;
        let sample = integrate_clouds(&level_ray(), Interval::new(1.0, 0.5), 0.0, &solid);
        assert_eq!(sample.radiance, Vec3A::ZERO);
        assert_eq!(sample.transmittance, 1.0);
    }

    #[test]
    fn transmittance_decays_monotonically_with_march_length() {
        let solid = |_: Vec3A, _: f32| 0.4;
        let ray = level_ray();
        let mut previous = 1.0;
        for end in [2.0f32, 5.0, 10.0, 20.0, 40.0, 80.0] {
            let sample = integrate_clouds(&ray, Interval::new(1.0, end), 0.0, &solid);
            assert!(
                sample.transmittance <= previous + 1e-6,
                "transmittance increased: {} -> {}",
                previous,
                sample.transmittance
            );
            assert!(sample.transmittance > 0.0);
            previous = sample.transmittance;
        }
    }

    #[test]
    fn dense_medium_collapses_transmittance() {
        let solid = |_: Vec3A, _: f32| 1.0;
        let sample = integrate_clouds(&level_ray(), Interval::new(1.0, 80.0), 0.0, &solid);
        // Extinction over 79 units of unit density leaves essentially nothing
        assert!(sample.transmittance < 0.01 + 1e-3);
        assert!(sample.radiance.min_element() > 0.0);
    }

    #[test]
    fn sky_ray_reduces_to_background_in_vacuum() {
        // With clouds contributing nothing, the pixel is exactly the sky model
        let ray = level_ray();
        let sample = integrate_clouds(&ray, Interval::new(1.0, 80.0), 0.0, &|_, _| 0.0);
        let background = sky_radiance(ray.direction, sun_direction());
        let alpha = sample.radiance.length().clamp(0.0, 1.0);
        let composited = background * (1.0 - alpha) + sample.radiance;
        assert!((composited - background).length() < 1e-6);
    }

    #[test]
    fn pixel_radiance_is_finite_and_non_negative() {
        for i in 0..16 {
            let dir = Vec3A::new(i as f32 * 0.1 - 0.8, 0.3, -1.0);
            let c = pixel_radiance(&Ray::new(Vec3A::ZERO, dir), 0.0);
            assert!(c.is_finite(), "non-finite radiance: {:?}", c);
            assert!(c.min_element() >= 0.0, "negative radiance: {:?}", c);
        }
    }
}
