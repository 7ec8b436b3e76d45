use clap::Parser;
use glam::Vec3A;
use log::info;

mod camera;
mod cli;
mod clouds;
mod integrator;
mod interval;
mod lighting;
mod logger;
mod noise;
mod output;
mod ray;
mod sky;
mod terrain;
mod tonemap;

use camera::{rotation_from_angles, Camera};
use cli::Args;
use logger::init_logger;
use output::{save_image_as_exr, save_image_as_png, send_image_to_tev};
use tonemap::{tonemap_frame, ToneMapping};

/// Build the camera for one frame from CLI pose arguments
fn create_camera(args: &Args, time: f32) -> Camera {
    let mut camera = Camera::new(args.width, args.height);
    let rotation = rotation_from_angles(
        args.pitch.to_radians(),
        args.yaw.to_radians(),
        args.roll.to_radians(),
    );
    let position = Vec3A::new(args.camera[0], args.camera[1], args.camera[2]);
    camera.set_pose(&rotation, position);
    camera.time = time;
    camera
}

/// Output path for one frame of a sequence ("out.png" -> "out_0003.png")
fn frame_output_path(base: &str, frame: u32, total_frames: u32) -> String {
    if total_frames <= 1 {
        return base.to_string();
    }
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_{:04}.{}", stem, frame, ext),
        None => format!("{}_{:04}", base, frame),
    }
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    // Log application startup with version information
    info!("Skymarch - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    let tone_mapping = match args.tone_mode {
        Some(mode) => ToneMapping::from_index(mode),
        None => args.tone_mapping,
    };
    info!(
        "Resolution: {}x{}, tone mapping: {:?}, exposure: {}, gamma: {}",
        args.width, args.height, tone_mapping, args.exposure, args.gamma
    );

    if !args.output.ends_with(".png") && !args.output.ends_with(".exr") {
        log::error!(
            "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
            std::path::Path::new(&args.output)
                .extension()
                .unwrap_or_default()
                .to_string_lossy()
        );
        std::process::exit(1);
    }

    for frame in 0..args.frames {
        let time = args.time + frame as f32 / args.fps;
        if args.frames > 1 {
            info!("Frame {}/{} (t = {:.3}s)", frame + 1, args.frames, time);
        }

        let camera = create_camera(&args, time);
        let hdr = camera.render();

        // Send image to TEV if requested
        let should_send_to_tev = args.tev || args.tev_address.is_some();
        if should_send_to_tev {
            let tev_address = args.tev_address.as_deref().unwrap_or("localhost:14158");
            send_image_to_tev(&hdr, tev_address);
        }

        let path = frame_output_path(&args.output, frame, args.frames);
        if path.ends_with(".exr") {
            save_image_as_exr(&hdr, &path);
        } else {
            let ldr = tonemap_frame(&hdr, args.exposure, tone_mapping, args.gamma);
            save_image_as_png(&ldr, &path);
        }
    }
}
