use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::tonemap::ToneMapping;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "skymarch")]
#[command(about = "Procedural sky, terrain and volumetric cloud raymarcher")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600", help = "Image height in pixels")]
    pub height: u32,

    /// Simulation time in seconds (drives cloud wind drift)
    #[arg(long, short = 't', default_value = "0.0", help = "Simulation time in seconds")]
    pub time: f32,

    /// Number of frames to render, advancing time between frames
    #[arg(long, default_value = "1", help = "Number of frames to render")]
    pub frames: u32,

    /// Frame rate used to advance time when rendering multiple frames
    #[arg(long, default_value = "30.0", help = "Frames per second for --frames sequences")]
    pub fps: f32,

    /// Camera world position as X Y Z
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values = ["0.0", "0.0", "0.0"],
          allow_negative_numbers = true, help = "Camera world position")]
    pub camera: Vec<f32>,

    /// Camera pitch angle in degrees
    #[arg(long, default_value = "0.0", allow_negative_numbers = true, help = "Camera pitch in degrees")]
    pub pitch: f32,

    /// Camera yaw angle in degrees
    #[arg(long, default_value = "0.0", allow_negative_numbers = true, help = "Camera yaw in degrees")]
    pub yaw: f32,

    /// Camera roll angle in degrees
    #[arg(long, default_value = "0.0", allow_negative_numbers = true, help = "Camera roll in degrees")]
    pub roll: f32,

    /// Exposure multiplier applied before the tone curve (must be > 0)
    #[arg(long, short = 'e', default_value = "1.0", help = "Exposure multiplier")]
    pub exposure: f32,

    /// Tone-mapping operator for the LDR pass
    #[arg(long, value_enum, default_value = "reinhard", help = "Tone-mapping operator")]
    pub tone_mapping: ToneMapping,

    /// Integer tone-mapping mode (0=linear, 1=reinhard, 2=filmic, 3=aces);
    /// overrides --tone-mapping, unrecognized values fall back to reinhard
    #[arg(long, help = "Integer tone-mapping mode 0-3 (overrides --tone-mapping)")]
    pub tone_mode: Option<u32>,

    /// Display gamma (must be > 0)
    #[arg(long, default_value = "2.2", help = "Display gamma")]
    pub gamma: f32,

    /// Send image to TEV for real-time visualization
    #[arg(long, help = "Send image to TEV for real-time visualization")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Output file path (.png for 8-bit tone-mapped, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png",
          help = "Output file path (.png for 8-bit tone-mapped, .exr for HDR linear)")]
    pub output: String,
}
