//! Analytic sky radiance model.
//!
//! Closed-form horizon/zenith gradient with a sun disk, halo and a
//! Rayleigh-like brightening term. Used both as the background for rays that
//! miss the terrain and as the far color for distance fog. Output is linear
//! HDR; the sun disk intentionally exceeds 1.0 by a wide margin.

use glam::Vec3A;

use crate::lighting::{Color, SUN_COLOR};
use crate::noise::smoothstep;

/// Sky color near the horizon.
pub const HORIZON_COLOR: Color = Vec3A::new(0.65, 0.70, 0.82);
/// Sky color at the zenith.
pub const ZENITH_COLOR: Color = Vec3A::new(0.18, 0.38, 0.78);

/// HDR radiance multiplier for the sun disk itself.
const SUN_DISK_INTENSITY: f32 = 40.0;

/// Sky radiance along unit view direction `dir` with the sun at `sun_dir`.
///
/// Pure function of the two directions; no iteration anywhere.
pub fn sky_radiance(dir: Vec3A, sun_dir: Vec3A) -> Color {
    // Horizon-to-zenith gradient on view elevation
    let gradient = smoothstep(-0.05, 0.45, dir.y);
    let base = HORIZON_COLOR.lerp(ZENITH_COLOR, gradient);

    let cos_sun = dir.dot(sun_dir).clamp(-1.0, 1.0);

    // Rayleigh-like 1 + cos^2 brightening toward and away from the sun
    let rayleigh = 1.0 + cos_sun * cos_sun;
    let mut color = base * (0.75 * rayleigh);

    // Wide halo around the sun
    let halo = cos_sun.max(0.0).powf(8.0) * 0.25;
    color += SUN_COLOR * halo;

    // The disk itself, a narrow smoothstep on the cosine
    let disk = smoothstep(0.9995, 0.9999, cos_sun);
    color += SUN_COLOR * (disk * SUN_DISK_INTENSITY);

    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::sun_direction;

    #[test]
    fn zenith_view_trends_blue() {
        let c = sky_radiance(Vec3A::new(0.0, 1.0, 0.0), sun_direction());
        // Zenith is strongly blue-dominant
        assert!(c.z > c.x * 2.0, "zenith not blue enough: {:?}", c);
    }

    #[test]
    fn horizon_view_trends_toward_horizon_color() {
        // Look level, away from the sun so disk and halo stay out of frame
        let c = sky_radiance(Vec3A::new(0.0, 0.0, 1.0), sun_direction());
        let ratio = c.z / c.x;
        let expected = HORIZON_COLOR.z / HORIZON_COLOR.x;
        assert!((ratio - expected).abs() < 0.05, "horizon hue off: {}", ratio);
    }

    #[test]
    fn sun_disk_is_hdr_bright() {
        let sun = sun_direction();
        let c = sky_radiance(sun, sun);
        assert!(c.max_element() > 10.0, "sun disk should exceed LDR range");
    }

    #[test]
    fn radiance_is_non_negative() {
        for i in 0..64 {
            let theta = i as f32 * 0.1;
            let dir = Vec3A::new(theta.cos() * 0.6, (theta * 0.7).sin(), theta.sin() * 0.6)
                .normalize();
            let c = sky_radiance(dir, sun_direction());
            assert!(c.min_element() >= 0.0, "negative sky radiance: {:?}", c);
        }
    }
}
