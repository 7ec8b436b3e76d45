//! Camera pose, per-pixel ray generation and the HDR render pass.
//!
//! The camera is the uniform input of one frame: an orientation matrix, a
//! world position and a simulation time, all read-only while pixel work is
//! outstanding. `render` is the first of the two frame passes; it maps every
//! pixel independently to an HDR radiance value, in parallel, with no shared
//! mutable state beyond the output buffer itself.

use glam::{Mat3A, Vec3A};
use image::{ImageBuffer, Rgba};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::integrator;
use crate::ray::Ray;

/// HDR frame buffer: row-major RGBA f32, alpha always 1.0.
pub type HdrImage = ImageBuffer<Rgba<f32>, Vec<f32>>;

/// Distance from the eye to the virtual image plane, in camera units.
///
/// 1.5 gives a vertical field of view of about 67 degrees.
const FOCAL_LENGTH: f32 = 1.5;

/// Camera pose and frame uniforms for one render invocation.
///
/// The orientation maps camera space (+x right, +y up, -z forward) to world
/// space. With the identity orientation the camera looks down -Z.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixels (must be > 0)
    pub image_width: u32,
    /// Rendered image height in pixels (must be > 0)
    pub image_height: u32,
    /// Rotation from camera space to world space
    pub orientation: Mat3A,
    /// Camera position in world space
    pub position: Vec3A,
    /// Simulation time in seconds; drives wind advection
    pub time: f32,
}

impl Camera {
    /// Create a camera at the origin looking down -Z at time zero.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            orientation: Mat3A::IDENTITY,
            position: Vec3A::ZERO,
            time: 0.0,
        }
    }

    /// Set the pose from a row-major 4x4 matrix and a world position.
    ///
    /// Only the upper-left 3x3 rotation block of the matrix is used; the
    /// translation slots are ignored in favor of `position`.
    pub fn set_pose(&mut self, row_major: &[f32; 16], position: Vec3A) {
        self.orientation = orientation_from_row_major(row_major);
        self.position = position;
    }

    /// Generate the primary ray through pixel (i, j).
    ///
    /// Rays pass through pixel centers; there is no stochastic sampling
    /// anywhere in the pipeline, which keeps frames bit-for-bit reproducible.
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let aspect = self.image_width as f32 / self.image_height as f32;
        let u = (2.0 * (i as f32 + 0.5) / self.image_width as f32 - 1.0) * aspect;
        let v = 1.0 - 2.0 * (j as f32 + 0.5) / self.image_height as f32;

        let direction = self.orientation * Vec3A::new(u, v, -FOCAL_LENGTH);
        Ray::new(self.position, direction)
    }

    /// Render the frame to an HDR buffer.
    ///
    /// Evaluates every pixel independently with Rayon; each pixel is a pure
    /// function of its index and the frame uniforms. Returns linear radiance
    /// with alpha fixed at 1.0.
    pub fn render(&self) -> HdrImage {
        let mut image: HdrImage = ImageBuffer::new(self.image_width, self.image_height);

        info!(
            "Rendering {}x{} using {} CPU cores...",
            self.image_width,
            self.image_height,
            rayon::current_num_threads()
        );
        let render_start = std::time::Instant::now();
        let pb = ProgressBar::new((self.image_width * self.image_height) as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40} {pos}/{len} ETA: {eta}")
                .unwrap(),
        );

        // Parallel pixel processing using Rayon
        image.enumerate_pixels_mut().par_bridge().for_each(|(i, j, pixel)| {
            let ray = self.get_ray(i, j);
            let radiance = integrator::pixel_radiance(&ray, self.time);
            *pixel = Rgba([radiance.x, radiance.y, radiance.z, 1.0]);
            pb.inc(1);
        });

        pb.finish();
        info!("HDR pass finished in {:.2?}", render_start.elapsed());

        image
    }
}

/// Extract the 3x3 rotation block of a row-major 4x4 matrix.
pub fn orientation_from_row_major(m: &[f32; 16]) -> Mat3A {
    // Row-major rows become glam columns after the transpose baked in here,
    // so multiplying a vector applies the matrix rows as expected
    Mat3A::from_cols(
        Vec3A::new(m[0], m[4], m[8]),
        Vec3A::new(m[1], m[5], m[9]),
        Vec3A::new(m[2], m[6], m[10]),
    )
}

/// Build a row-major 4x4 camera rotation matrix from Euler angles (radians).
///
/// Same pitch/yaw/roll composition as the interactive host supplies, so CLI
/// angles reproduce the same framing.
pub fn rotation_from_angles(pitch: f32, yaw: f32, roll: f32) -> [f32; 16] {
    let (sin_p, cos_p) = pitch.sin_cos();
    let (sin_y, cos_y) = yaw.sin_cos();
    let (sin_r, cos_r) = roll.sin_cos();

    [
        cos_y * cos_r,
        -cos_y * sin_r,
        sin_y,
        0.0,
        sin_p * sin_y * cos_r + cos_p * sin_r,
        -sin_p * sin_y * sin_r + cos_p * cos_r,
        -sin_p * cos_y,
        0.0,
        -cos_p * sin_y * cos_r + sin_p * sin_r,
        cos_p * sin_y * sin_r + sin_p * cos_r,
        cos_p * cos_y,
        0.0,
        0.0,
        0.0,
        0.0,
        1.0,
    ]
}
