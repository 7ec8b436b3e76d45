//! End-to-end pipeline scenarios: full HDR render plus tone-map pass.

use glam::Vec3A;
use skymarch::camera::Camera;
use skymarch::lighting::{shade_terrain, sun_direction};
use skymarch::sky::{sky_radiance, HORIZON_COLOR, ZENITH_COLOR};
use skymarch::terrain::{raymarch_terrain, scene_normal, TERRAIN_MAX_DIST};
use skymarch::tonemap::{tonemap_frame, ToneMapping};

/// Average HDR color of one pixel row.
fn row_mean(image: &skymarch::camera::HdrImage, row: u32) -> Vec3A {
    let mut sum = Vec3A::ZERO;
    for x in 0..image.width() {
        let p = image.get_pixel(x, row);
        sum += Vec3A::new(p[0], p[1], p[2]);
    }
    sum / image.width() as f32
}

/// Blue dominance of a color, the hue signature of the sky gradient.
fn blue_ratio(c: Vec3A) -> f32 {
    c.z / c.x
}

#[test]
fn level_view_renders_sky_gradient() {
    // 64x64, t = 0, camera at the origin looking down -Z with no rotation
    let camera = Camera::new(64, 64);
    let hdr = camera.render();

    // No terrain lies directly ahead
    let center = camera.get_ray(32, 32);
    assert_eq!(
        raymarch_terrain(center.origin, center.direction),
        TERRAIN_MAX_DIST
    );

    // Every pixel is finite, non-negative, alpha exactly 1
    for pixel in hdr.pixels() {
        for c in [pixel[0], pixel[1], pixel[2]] {
            assert!(c.is_finite() && c >= 0.0, "bad HDR value: {}", c);
        }
        assert_eq!(pixel[3], 1.0);
    }

    // Rows 0 and 28 both look at sky (row 28 is barely above the horizon,
    // below the cloud band's march reach; the lowest rows strike terrain).
    // The top row must trend toward the zenith hue, the near-horizon row
    // toward the horizon hue.
    let top = row_mean(&hdr, 0);
    let low_sky = row_mean(&hdr, 28);
    assert!(top.z > top.x, "top row lost blue dominance: {:?}", top);
    assert!(
        blue_ratio(top) > blue_ratio(low_sky),
        "vertical hue gradient inverted: top {:?} vs low {:?}",
        top,
        low_sky
    );

    // Same trend in the sky model itself along those view directions
    let up = sky_radiance(camera.get_ray(32, 0).direction, sun_direction());
    let low = sky_radiance(camera.get_ray(32, 28).direction, sun_direction());
    let zenith_ratio = blue_ratio(ZENITH_COLOR);
    let horizon_ratio = blue_ratio(HORIZON_COLOR);
    assert!((blue_ratio(up) - zenith_ratio).abs() < (blue_ratio(low) - zenith_ratio).abs());
    assert!((blue_ratio(low) - horizon_ratio).abs() < (blue_ratio(up) - horizon_ratio).abs());

    // The image must actually vary vertically
    assert!(
        (top - row_mean(&hdr, 63)).length() > 1e-3,
        "image is vertically constant"
    );
}

#[test]
fn full_pipeline_is_deterministic() {
    let camera = Camera::new(64, 64);

    let hdr_a = camera.render();
    let hdr_b = camera.render();
    let ldr_a = tonemap_frame(&hdr_a, 1.0, ToneMapping::Reinhard, 2.2);
    let ldr_b = tonemap_frame(&hdr_b, 1.0, ToneMapping::Reinhard, 2.2);

    // Byte-identical output: no hidden state, no uninitialized reads
    assert_eq!(hdr_a.as_raw(), hdr_b.as_raw());
    assert_eq!(ldr_a.as_raw(), ldr_b.as_raw());
}

#[test]
fn ldr_output_is_opaque_rgba() {
    let camera = Camera::new(32, 32);
    let hdr = camera.render();
    let ldr = tonemap_frame(&hdr, 1.0, ToneMapping::Aces, 2.2);

    assert_eq!(ldr.width(), 32);
    assert_eq!(ldr.height(), 32);
    for pixel in ldr.pixels() {
        assert_eq!(pixel[3], 255);
    }
}

#[test]
fn downward_view_hits_terrain_with_varying_albedo() {
    // Pitch the camera's forward axis straight at the ground
    let rotation =
        skymarch::camera::rotation_from_angles(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);
    let mut camera = Camera::new(16, 16);
    camera.set_pose(&rotation, Vec3A::new(0.0, 0.0, 0.0));

    // Every ray must strike the surface at a finite distance
    let mut shaded = Vec::new();
    for i in 0..16 {
        let ray = camera.get_ray(i, 8);
        assert!(
            ray.direction.y < -0.5,
            "expected downward ray, got {:?}",
            ray.direction
        );
        let t = raymarch_terrain(ray.origin, ray.direction);
        assert!(t < TERRAIN_MAX_DIST, "downward ray missed terrain");
        let pos = ray.at(t);
        let normal = scene_normal(pos);
        shaded.push(shade_terrain(pos, normal, ray.direction, 0.0));
    }

    // Procedural albedo variation: nearby pixels sample different noise
    // phases, so the shaded colors cannot all be identical
    let first = shaded[0];
    assert!(
        shaded.iter().any(|c| (*c - first).length() > 1e-4),
        "terrain shading is constant across the row"
    );
}

#[test]
fn exr_and_png_sinks_accept_frame_buffers() {
    let dir = std::env::temp_dir();
    let camera = Camera::new(8, 8);
    let hdr = camera.render();
    let ldr = tonemap_frame(&hdr, 1.0, ToneMapping::Filmic, 2.2);

    let exr_path = dir.join("skymarch_test_frame.exr");
    let png_path = dir.join("skymarch_test_frame.png");
    skymarch::output::save_image_as_exr(&hdr, exr_path.to_str().unwrap());
    skymarch::output::save_image_as_png(&ldr, png_path.to_str().unwrap());

    assert!(exr_path.exists());
    assert!(png_path.exists());
    let _ = std::fs::remove_file(exr_path);
    let _ = std::fs::remove_file(png_path);
}
