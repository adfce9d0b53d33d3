//! Camera settings loaded from JSON and overridden from the command line.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use raytrace_renderer::{Camera, Vec3};
use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Camera settings. Missing fields in a settings file keep their defaults,
/// which frame the complex scene from above and to the side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub aspect_ratio: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    pub vfov: f64,
    pub look_from: [f64; 3],
    pub look_at: [f64; 3],
    pub vup: [f64; 3],

    pub defocus_angle: f64,
    pub focus_dist: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 1200,
            samples_per_pixel: 500,
            max_depth: 50,
            vfov: 20.0,
            look_from: [13.0, 2.0, 3.0],
            look_at: [0.0, 0.0, 0.0],
            vup: [0.0, 1.0, 0.0],
            defocus_angle: 0.6,
            focus_dist: 10.0,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply any values given on the command line.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(width) = args.width {
            self.image_width = width;
        }
        if let Some(aspect_ratio) = args.aspect_ratio {
            self.aspect_ratio = aspect_ratio;
        }
        if let Some(samples) = args.samples {
            self.samples_per_pixel = samples;
        }
        if let Some(max_depth) = args.max_depth {
            self.max_depth = max_depth;
        }
    }

    pub fn camera(&self) -> Camera {
        Camera::new()
            .with_resolution(self.image_width, self.aspect_ratio)
            .with_quality(self.samples_per_pixel, self.max_depth)
            .with_position(
                Vec3::from_array(self.look_from),
                Vec3::from_array(self.look_at),
                Vec3::from_array(self.vup),
            )
            .with_lens(self.vfov, self.defocus_angle, self.focus_dist)
    }
}
