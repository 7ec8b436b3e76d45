//! HDR to LDR tone-mapping pass.
//!
//! The second of the two frame passes, independent of the first: it reads the
//! finished HDR buffer and writes an 8-bit RGBA buffer. Exposure scaling,
//! then one of four interchangeable curve operators, then gamma correction
//! and quantization. Per-pixel and parallel, like the render pass.
//!
//! Non-positive exposure or gamma produce undefined (possibly NaN) output by
//! design; validating those is the caller's contract, not a runtime error.

use clap::ValueEnum;
use glam::Vec3A;
use image::{Rgba, RgbaImage};
use log::info;
use rayon::prelude::*;

use crate::camera::HdrImage;

/// Tone-mapping curve operators, in wire order (mode 0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToneMapping {
    /// Pass-through; only exposure and gamma are applied.
    Linear,
    /// Reinhard `c / (1 + c)`; output always below 1.
    Reinhard,
    /// Hejl/Burgess-Dawson style filmic curve with a black-point offset.
    Filmic,
    /// ACES fit, clamped to [0, 1].
    Aces,
}

impl ToneMapping {
    /// Map an integer mode to an operator.
    ///
    /// Unrecognized values fall back to Reinhard.
    pub fn from_index(mode: u32) -> Self {
        match mode {
            0 => ToneMapping::Linear,
            1 => ToneMapping::Reinhard,
            2 => ToneMapping::Filmic,
            3 => ToneMapping::Aces,
            _ => ToneMapping::Reinhard,
        }
    }
}

/// Apply the selected curve operator to an exposed linear color.
pub fn apply_operator(color: Vec3A, mode: ToneMapping) -> Vec3A {
    match mode {
        ToneMapping::Linear => color,
        ToneMapping::Reinhard => color / (Vec3A::ONE + color),
        ToneMapping::Filmic => {
            let x = (color - Vec3A::splat(0.004)).max(Vec3A::ZERO);
            (x * (6.2 * x + Vec3A::splat(0.5)))
                / (x * (6.2 * x + Vec3A::splat(1.7)) + Vec3A::splat(0.06))
        }
        ToneMapping::Aces => {
            let mapped = (color * (2.51 * color + Vec3A::splat(0.03)))
                / (color * (2.43 * color + Vec3A::splat(0.59)) + Vec3A::splat(0.14));
            mapped.clamp(Vec3A::ZERO, Vec3A::ONE)
        }
    }
}

/// Tone-map one HDR pixel to 8-bit RGB.
///
/// Exposure multiply, curve operator, gamma `pow(max(c, 0), 1/gamma)`, then
/// quantization with clamping to [0, 255].
pub fn tonemap_pixel(hdr: Vec3A, exposure: f32, mode: ToneMapping, gamma: f32) -> [u8; 3] {
    let exposed = hdr * exposure;
    let mapped = apply_operator(exposed, mode);
    let corrected = mapped.max(Vec3A::ZERO).powf(1.0 / gamma);

    let quantize = |c: f32| (c * 255.0).clamp(0.0, 255.0) as u8;
    [quantize(corrected.x), quantize(corrected.y), quantize(corrected.z)]
}

/// Tone-map a whole HDR frame into an LDR RGBA buffer (alpha always 255).
///
/// Runs only after the HDR pass has written every pixel; within the pass each
/// pixel is independent and processed in parallel.
pub fn tonemap_frame(hdr: &HdrImage, exposure: f32, mode: ToneMapping, gamma: f32) -> RgbaImage {
    let start = std::time::Instant::now();
    let mut ldr = RgbaImage::new(hdr.width(), hdr.height());

    ldr.enumerate_pixels_mut().par_bridge().for_each(|(x, y, pixel)| {
        let p = hdr.get_pixel(x, y);
        let [r, g, b] = tonemap_pixel(Vec3A::new(p[0], p[1], p[2]), exposure, mode, gamma);
        *pixel = Rgba([r, g, b, 255]);
    });

    info!("Tone-map pass ({:?}) finished in {:.2?}", mode, start.elapsed());
    ldr
}
