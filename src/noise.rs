//! Procedural noise library for density and terrain synthesis.
//!
//! Provides lattice hashes, gradient noise and the derived fbm, billow,
//! ridged and curl variants used by the cloud and terrain fields. Every
//! function here is pure and total over finite inputs, so the same position
//! always hashes to the same value regardless of evaluation order.

use glam::{Vec3A, Vec3Swizzles};

/// Linear interpolation between `a` and `b` by factor `t`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep: 0 below `edge0`, 1 above `edge1`, smooth in between.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// GL-style fractional part (`x - floor(x)`), always in [0, 1).
fn fract(v: Vec3A) -> Vec3A {
    v - v.floor()
}

/// Deterministic scalar hash of a 3D position, in [0, 1).
///
/// Fractional-part folding followed by a dot-product mix. Stable under
/// floor-based cell lookup: equal inputs always produce equal outputs.
pub fn hash13(p: Vec3A) -> f32 {
    let mut p3 = fract(p * 0.1031);
    p3 += Vec3A::splat(p3.dot(p3.yzx() + Vec3A::splat(33.33)));
    let v = (p3.x + p3.y) * p3.z;
    v - v.floor()
}

/// Deterministic vector hash of a 3D position, each component in [0, 1).
pub fn hash33(p: Vec3A) -> Vec3A {
    let mut p3 = fract(p * Vec3A::new(0.1031, 0.1030, 0.0973));
    p3 += Vec3A::splat(p3.dot(p3.yxz() + Vec3A::splat(33.33)));
    fract((p3.xxy() + p3.yxx()) * p3.zyx())
}

/// Lattice gradient noise in roughly [-1, 1].
///
/// Hashes the 8 corners of the unit cell around `p` and blends them with the
/// quintic fade curve `f*f*f*(f*(f*6-15)+10)`. The quintic fade gives C2
/// continuity across cell boundaries; linear or cubic weights would introduce
/// visible derivative discontinuities in the derived fbm fields.
pub fn gradient_noise(p: Vec3A) -> f32 {
    let i = p.floor();
    let f = p - i;

    // Quintic fade applied per axis before trilinear blending
    let u = f * f * f * (f * (f * 6.0 - Vec3A::splat(15.0)) + Vec3A::splat(10.0));

    let n000 = hash13(i);
    let n100 = hash13(i + Vec3A::new(1.0, 0.0, 0.0));
    let n010 = hash13(i + Vec3A::new(0.0, 1.0, 0.0));
    let n110 = hash13(i + Vec3A::new(1.0, 1.0, 0.0));
    let n001 = hash13(i + Vec3A::new(0.0, 0.0, 1.0));
    let n101 = hash13(i + Vec3A::new(1.0, 0.0, 1.0));
    let n011 = hash13(i + Vec3A::new(0.0, 1.0, 1.0));
    let n111 = hash13(i + Vec3A::new(1.0, 1.0, 1.0));

    let nx00 = lerp(n000, n100, u.x);
    let nx10 = lerp(n010, n110, u.x);
    let nx01 = lerp(n001, n101, u.x);
    let nx11 = lerp(n011, n111, u.x);

    let nxy0 = lerp(nx00, nx10, u.y);
    let nxy1 = lerp(nx01, nx11, u.y);

    // Remap [0,1] to [-1,1]
    2.0 * lerp(nxy0, nxy1, u.z) - 1.0
}

/// Fractional Brownian motion over `octaves` layers of gradient noise.
///
/// Amplitude starts at 0.5 and is multiplied by `gain` each octave while the
/// frequency is multiplied by `lacunarity`. The sum is normalized by the
/// total amplitude so the result stays in roughly [-1, 1] for any octave
/// count. Callers must pass `octaves >= 1`; zero octaves would divide by zero
/// in the normalization.
pub fn fbm_noise(p: Vec3A, octaves: u32, lacunarity: f32, gain: f32) -> f32 {
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    let mut sum = 0.0;
    let mut total_amplitude = 0.0;

    for _ in 0..octaves {
        sum += amplitude * gradient_noise(p * frequency);
        total_amplitude += amplitude;
        amplitude *= gain;
        frequency *= lacunarity;
    }

    sum / total_amplitude
}

/// Billowy noise: accumulates `|gradient_noise|` per octave.
///
/// Amplitude halves and frequency doubles each octave. Intentionally not
/// normalized by the total amplitude, so the output scale depends on the
/// octave count and lands in roughly [0, 1].
pub fn billow_noise(p: Vec3A, octaves: u32) -> f32 {
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    let mut sum = 0.0;

    for _ in 0..octaves {
        sum += amplitude * gradient_noise(p * frequency).abs();
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    sum
}

/// Ridged noise: accumulates `amplitude * (1 - |n|)^2` per octave.
///
/// The inverted absolute value sharpens the zero crossings of the underlying
/// noise into ridges. Same halving/doubling schedule as [`billow_noise`],
/// also unnormalized.
pub fn ridged_noise(p: Vec3A, octaves: u32) -> f32 {
    let mut amplitude = 0.5;
    let mut frequency = 1.0;
    let mut sum = 0.0;

    for _ in 0..octaves {
        let n = gradient_noise(p * frequency);
        let ridge = 1.0 - n.abs();
        sum += amplitude * ridge * ridge;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    sum
}

/// Unit-length curl of the [`hash33`] vector field, by central differences.
///
/// Finite-difference step is 0.1. This is a purely visual turbulence vector,
/// not a divergence-free flow field; it only needs to look swirly, and the
/// density field scales it down before use.
pub fn curl_noise(p: Vec3A) -> Vec3A {
    const EPS: f32 = 0.1;

    let dx = Vec3A::new(EPS, 0.0, 0.0);
    let dy = Vec3A::new(0.0, EPS, 0.0);
    let dz = Vec3A::new(0.0, 0.0, EPS);

    let field_dy = (hash33(p + dy) - hash33(p - dy)) / (2.0 * EPS);
    let field_dz = (hash33(p + dz) - hash33(p - dz)) / (2.0 * EPS);
    let field_dx = (hash33(p + dx) - hash33(p - dx)) / (2.0 * EPS);

    let curl = Vec3A::new(
        field_dy.z - field_dz.y,
        field_dz.x - field_dx.z,
        field_dx.y - field_dy.x,
    );

    curl.normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hash_is_deterministic() {
        let p = Vec3A::new(12.7, -3.4, 88.01);
        assert_eq!(hash13(p), hash13(p));
        assert_eq!(hash33(p), hash33(p));
    }

    #[test]
    fn hash_range() {
        for i in 0..100 {
            let p = Vec3A::new(i as f32 * 1.7, -(i as f32) * 0.3, i as f32 * 9.1);
            let h = hash13(p);
            assert!((0.0..1.0).contains(&h), "hash13 out of range: {}", h);
            let v = hash33(p);
            for c in [v.x, v.y, v.z] {
                assert!((0.0..1.0).contains(&c), "hash33 out of range: {}", c);
            }
        }
    }

    #[test]
    fn gradient_noise_bounded() {
        for i in -50..50 {
            let p = Vec3A::new(i as f32 * 0.37, i as f32 * 0.11, -(i as f32) * 0.53);
            let n = gradient_noise(p);
            assert!(n.abs() <= 1.0 + 1e-4, "gradient noise out of range: {}", n);
        }
    }

    #[test]
    fn curl_noise_is_unit_or_zero() {
        for i in 0..64 {
            let p = Vec3A::new(i as f32 * 0.91, i as f32 * -0.47, i as f32 * 0.23);
            let c = curl_noise(p);
            let len = c.length();
            assert!(len < 1e-6 || (len - 1.0).abs() < 1e-3, "curl length: {}", len);
        }
    }

    proptest! {
        #[test]
        fn fbm_normalized_for_any_octave_count(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            z in -100.0f32..100.0,
            octaves in 1u32..=8,
        ) {
            let n = fbm_noise(Vec3A::new(x, y, z), octaves, 2.0, 0.5);
            prop_assert!(n.abs() <= 1.0 + 1e-3, "fbm out of range: {}", n);
        }

        #[test]
        fn billow_and_ridged_non_negative(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            z in -100.0f32..100.0,
        ) {
            let p = Vec3A::new(x, y, z);
            prop_assert!(billow_noise(p, 3) >= 0.0);
            prop_assert!(ridged_noise(p, 3) >= 0.0);
        }
    }
}
