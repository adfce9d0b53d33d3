//! Command line arguments and logger setup.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::scenes::SceneKind;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render a scene of spheres to a PPM (or PNG) image.
///
/// Camera values are taken from the built-in defaults, then the `--config`
/// file, then any flags given here.
#[derive(Parser, Debug)]
#[command(name = "raytrace", version)]
pub struct Args {
    /// Render with a pool of workers instead of a single scanline pass
    #[arg(long)]
    pub parallel: bool,

    /// Built-in scene to render
    #[arg(long, value_enum, default_value_t = SceneKind::Simple)]
    pub scene: SceneKind,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Aspect ratio as `W:H` or a decimal, e.g. `16:9` or `1.5`
    #[arg(long, value_parser = parse_aspect_ratio)]
    pub aspect_ratio: Option<f64>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of ray bounces
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Worker count for --parallel (defaults to available cores minus two)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Seed for reproducible scenes and renders
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file; `.png` writes a PNG, anything else a P3 PPM.
    /// Writes PPM to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON file with camera settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Logging level (RUST_LOG still applies per module)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

/// Initialize the logger with the specified level
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn parse_aspect_ratio(value: &str) -> Result<f64, String> {
    let ratio = match value.split_once(':') {
        Some((w, h)) => {
            let w: f64 = w.trim().parse().map_err(|e| format!("bad width `{w}`: {e}"))?;
            let h: f64 = h.trim().parse().map_err(|e| format!("bad height `{h}`: {e}"))?;
            w / h
        }
        None => value.trim().parse().map_err(|e| format!("bad ratio `{value}`: {e}"))?,
    };

    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(format!("aspect ratio must be positive, got `{value}`"))
    }
}
