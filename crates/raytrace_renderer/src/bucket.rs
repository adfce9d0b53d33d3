//! Chunk-based tile rendering.
//!
//! The parallel renderer divides the image into a `workers x workers`
//! grid of chunks (buckets). Chunks never overlap and together cover
//! every pixel, so workers can fill the shared [`Image`] without locks.

use crate::renderer::render_pixel;
use crate::{Camera, Hittable, Image, ImageError};
use rand::RngCore;
use std::num::NonZeroUsize;

/// Logical cores kept free for the rest of the system.
const RESERVED_CORES: usize = 2;

/// Fraction of workers kept on each shrink step for tiny images.
const WORKER_SHRINK_FACTOR: f64 = 0.8;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in queue order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive end column.
    pub fn x_end(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive end row.
    pub fn y_end(&self) -> u32 {
        self.y + self.height
    }
}

/// Default worker count: available parallelism minus some headroom, at least 1.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .saturating_sub(RESERVED_CORES)
        .max(1)
}

/// Shrink `workers` by 20% at a time until every chunk band is at least
/// one pixel wide and tall, or only one worker is left.
pub fn fit_worker_count(workers: usize, width: u32, height: u32) -> usize {
    let mut workers = workers.max(1);
    let degenerate =
        |w: usize| (width as usize) / w == 0 || (height as usize) / w == 0;

    while workers > 1 && degenerate(workers) {
        workers = ((workers as f64 * WORKER_SHRINK_FACTOR) as usize).max(1);
    }

    workers
}

/// Split a `width x height` image into `workers x workers` buckets.
///
/// Each axis is cut into `workers` bands of `len / workers` pixels; the
/// last band on each axis absorbs the remainder. Buckets are returned
/// row by row, top to bottom.
pub fn generate_buckets(width: u32, height: u32, workers: usize) -> Vec<Bucket> {
    let bands = workers.max(1) as u32;
    let band_width = width / bands;
    let band_height = height / bands;

    let mut buckets = Vec::with_capacity((bands * bands) as usize);
    let mut y = 0;
    for row in 0..bands {
        let y_end = if row == bands - 1 { height } else { y + band_height };

        let mut x = 0;
        for column in 0..bands {
            let x_end = if column == bands - 1 { width } else { x + band_width };
            let index = buckets.len();
            buckets.push(Bucket::new(x, y, x_end - x, y_end - y, index));
            x = x_end;
        }
        y = y_end;
    }

    buckets
}

/// Render every pixel of `bucket` into the shared image.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    world: &dyn Hittable,
    image: &Image,
    rng: &mut dyn RngCore,
) -> Result<(), ImageError> {
    for y in bucket.y..bucket.y_end() {
        for x in bucket.x..bucket.x_end() {
            let color = render_pixel(camera, world, x, y, rng);
            image.set(x, y, color)?;
        }
    }
    Ok(())
}
