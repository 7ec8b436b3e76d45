//! Image output: PNG, EXR and TEV live viewing.
//!
//! Three sinks for a finished frame:
//! - PNG takes the LDR buffer produced by the tone-map pass, already
//!   gamma-corrected and quantized, and writes it as-is.
//! - EXR takes the HDR buffer and preserves full linear radiance, so the
//!   tone-map stage can be redone offline with different settings.
//! - TEV streams the HDR buffer to a running TEV viewer over TCP for
//!   inspection with interactive exposure control.
//!
//! I/O failures are logged as warnings and never panic; a frame that fails
//! to save is simply lost, which is acceptable for a stateless renderer.

use exr::prelude::*;
use image::RgbaImage;
use log::{debug, info, warn};
use std::net::TcpStream;
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::camera::HdrImage;

/// Send an HDR frame to TEV for real-time visualization.
///
/// Connects over TCP (default port 14158 when none is given), creates an RGB
/// image and streams the pixel data in TEV's planar channel layout.
pub fn send_image_to_tev(image: &HdrImage, tev_address: &str) {
    let width = image.width();
    let height = image.height();

    // Add default port if not specified
    let tev_address = if tev_address.contains(':') {
        tev_address.to_string()
    } else {
        format!("{}:14158", tev_address)
    };

    debug!("Attempting to connect to TEV at {}", tev_address);

    match TcpStream::connect(&tev_address) {
        Ok(stream) => {
            if let Err(e) = stream.set_nodelay(true) {
                debug!("Failed to set TCP_NODELAY: {}", e);
            }

            let mut client = TevClient::wrap(stream);

            let create_packet = PacketCreateImage {
                image_name: "skymarch_output",
                width,
                height,
                channel_names: &["R", "G", "B"],
                grab_focus: true,
            };

            if let Err(e) = client.send(create_packet) {
                warn!("Failed to create image in TEV: {}", e);
                return;
            }

            // Convert from interleaved RGBA to planar RGB (RRR...GGG...BBB...)
            let pixel_count = (width * height) as usize;
            let mut rgb_data = Vec::with_capacity(pixel_count * 3);
            for channel in 0..3 {
                for pixel in image.pixels() {
                    rgb_data.push(pixel[channel]);
                }
            }

            let start_time = std::time::Instant::now();
            let update_packet = PacketUpdateImage {
                image_name: "skymarch_output",
                grab_focus: false,
                channel_names: &["R", "G", "B"],
                x: 0,
                y: 0,
                width,
                height,
                channel_offsets: &[0, (width * height) as u64, (2 * width * height) as u64],
                channel_strides: &[1, 1, 1],
                data: &rgb_data,
            };

            match client.send(update_packet) {
                Ok(_) => info!(
                    "Image sent to TEV at {} in {:.2?}",
                    tev_address,
                    start_time.elapsed()
                ),
                Err(e) => warn!("Failed to send image data to TEV: {}", e),
            }
        }
        Err(e) => warn!("Failed to connect to TEV on {}: {}", tev_address, e),
    }
}

/// Save a tone-mapped LDR frame as PNG.
///
/// The buffer is already gamma-corrected and quantized by the tone-map pass,
/// so this is a straight encode.
pub fn save_image_as_png(image: &RgbaImage, output_path: &str) {
    match image.save(output_path) {
        Ok(_) => info!("Image saved as {}", output_path),
        Err(e) => warn!("Failed to save image: {}", e),
    }
}

/// Save an HDR frame as EXR with full linear precision.
///
/// No tone mapping and no gamma; values above 1.0 (the sun disk, bright
/// cloud rims) are preserved exactly for offline grading or TEV viewing.
pub fn save_image_as_exr(image: &HdrImage, output_path: &str) {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let result = write_rgb_file(output_path, width, height, |x, y| {
        let pixel = image.get_pixel(x as u32, y as u32);
        (pixel[0], pixel[1], pixel[2])
    });

    match result {
        Ok(_) => info!("HDR image saved as EXR: {}", output_path),
        Err(e) => warn!("Failed to save EXR image: {}", e),
    }
}
