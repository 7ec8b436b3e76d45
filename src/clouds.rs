//! Volumetric cloud density field.
//!
//! Layers the noise library into a scalar "how much cloud is here" function
//! of world position and simulation time. The evaluation order is a cost
//! ladder: the cheap altitude and base-shape rejections run before the
//! expensive erosion and curl-turbulence stages, so empty sky samples bail
//! out almost immediately.

use glam::Vec3A;

use crate::noise::{billow_noise, curl_noise, fbm_noise, lerp, ridged_noise, smoothstep};

/// Altitude of the bottom of the cloud band, in world units.
pub const CLOUD_BASE: f32 = 6.0;
/// Altitude of the top of the cloud band, in world units.
pub const CLOUD_TOP: f32 = 18.0;

/// Wind drift direction (unnormalized, scaled by [`WIND_SPEED`]).
const WIND: Vec3A = Vec3A::new(1.0, 0.0, 0.6);
/// Wind drift speed in world units per second.
const WIND_SPEED: f32 = 0.8;

/// Cloud density in [0, 1] at a world position and simulation time.
///
/// Recomputed on every query; there is no caching and no hidden state, so
/// the same `(world_pos, time)` pair always yields the same density.
pub fn cloud_density(world_pos: Vec3A, time: f32) -> f32 {
    // Linear wind advection: sample the field upstream of the drift
    let p = world_pos + WIND * (WIND_SPEED * time);

    // Altitude mask: soft ramp-in above the base, soft ramp-out below the top
    let height_gradient = smoothstep(CLOUD_BASE - 1.0, CLOUD_BASE + 1.0, p.y)
        * (1.0 - smoothstep(CLOUD_TOP - 2.0, CLOUD_TOP + 1.0, p.y));
    if height_gradient <= 0.0 {
        return 0.0;
    }

    // Base shape: low-frequency fbm blended with billow, then hard-thresholded
    // so sub-threshold noise produces exactly zero density
    let base_fbm = fbm_noise(p * 0.12, 4, 2.0, 0.5) * 0.5 + 0.5;
    let bill = billow_noise(p * 0.2, 3);
    let base_shape = smoothstep(0.4, 0.8, lerp(base_fbm, bill, 0.35));
    if base_shape <= 0.0 {
        return 0.0;
    }

    // Detail erosion: high-frequency ridged/fbm blend eats away cloud edges
    let detail_fbm = fbm_noise(p * 0.85, 3, 2.0, 0.5) * 0.5 + 0.5;
    let detail = lerp(ridged_noise(p * 0.6, 3), detail_fbm, 0.5);
    let erosion = 1.0 - smoothstep(0.1, 0.9, detail);
    let eroded = base_shape * erosion;

    // Curl-driven turbulence: displace the sample and modulate the result
    let displaced = p + curl_noise(p * 0.35) * 0.5;
    let turbulence = fbm_noise(displaced * 0.5, 3, 2.0, 0.5);
    let turbulence_factor = 1.0 + turbulence * 0.3;

    (eroded * height_gradient * turbulence_factor).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_below_and_above_band() {
        for i in 0..32 {
            let x = i as f32 * 3.7 - 50.0;
            let z = i as f32 * -2.1 + 13.0;
            let below = Vec3A::new(x, CLOUD_BASE - 1.5, z);
            let above = Vec3A::new(x, CLOUD_TOP + 1.5, z);
            assert_eq!(cloud_density(below, 0.0), 0.0);
            assert_eq!(cloud_density(above, 0.0), 0.0);
        }
    }

    proptest! {
        #[test]
        fn density_always_in_unit_range(
            x in -200.0f32..200.0,
            y in -50.0f32..100.0,
            z in -200.0f32..200.0,
            time in 0.0f32..1000.0,
        ) {
            let d = cloud_density(Vec3A::new(x, y, z), time);
            prop_assert!((0.0..=1.0).contains(&d), "density out of range: {}", d);
        }

        #[test]
        fn zero_outside_band_for_any_time(
            x in -200.0f32..200.0,
            z in -200.0f32..200.0,
            time in 0.0f32..1000.0,
            offset in 1.5f32..50.0,
        ) {
            let below = Vec3A::new(x, CLOUD_BASE - offset, z);
            let above = Vec3A::new(x, CLOUD_TOP + offset, z);
            prop_assert_eq!(cloud_density(below, time), 0.0);
            prop_assert_eq!(cloud_density(above, time), 0.0);
        }
    }
}
