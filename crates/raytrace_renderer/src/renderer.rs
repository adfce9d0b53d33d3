//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by the camera's max depth
//! - Anti-aliasing and defocus blur via multi-sampling
//! - Gamma correction and 8-bit quantization
//! - A sequential scanline driver and a chunked parallel driver

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use raytrace_math::{unit_vector, Interval, Ray};
use thiserror::Error;

use crate::bucket::{default_worker_count, fit_worker_count, generate_buckets, render_bucket};
use crate::{Camera, Color, Hittable, Image, ImageError, PixelSink};

/// Hits closer than this to a ray origin are ignored so bounced rays do
/// not re-hit the surface they left.
const SHADOW_ACNE_EPSILON: f64 = 1e-3;

/// Channel values are clamped here before scaling by 256.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Spreads chunk indices across the seed space.
const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Stream reserved for scene construction.
pub const SCENE_STREAM: u64 = u64::MAX;

/// Errors that abort a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("image store rejected a write: {0}")]
    Image(#[from] ImageError),

    #[error("pixel ({x}, {y}) was never rendered")]
    MissingPixel { x: u32, y: u32 },

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How the pixel grid is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One thread, scanlines top to bottom, pixels streamed as produced.
    #[default]
    Sequential,
    /// A fixed pool of workers renders disjoint chunks into a shared image.
    Parallel,
}

/// Render configuration.
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Worker count for parallel mode; `None` picks from available cores
    pub workers: Option<usize>,
    /// Seed for reproducible output; `None` draws from OS entropy
    pub seed: Option<u64>,
}

/// Observational progress events. Never part of the image output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderProgress {
    ScanlinesRemaining(u32),
    ChunksRemaining(usize),
    Done(Duration),
}

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub width: u32,
    pub height: u32,
    pub workers: usize,
    pub chunks: usize,
    pub elapsed: Duration,
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. Each bounce multiplies the
/// light by the surface attenuation; absorbed rays and exhausted depth
/// contribute black, escaped rays pick up the sky gradient.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY)) else {
        return sky_gradient(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, rng)
        }
        None => Color::ZERO,
    }
}

/// Compute sky gradient background, white at the bottom to blue at the top.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = unit_vector(ray.direction());
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    (1.0 - a) * white + a * blue
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), rng);
    }

    pixel_color * camera.pixel_sample_scale()
}

/// Render the scene and stream the result into `sink`.
///
/// Initializes the camera, then drives the pixel grid according to
/// `config.mode`. `progress` receives status updates from whichever
/// thread produced them.
pub fn render(
    camera: &mut Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    sink: &mut dyn PixelSink,
    progress: &(dyn Fn(RenderProgress) + Sync),
) -> Result<RenderStats, RenderError> {
    camera.initialize();
    let camera = &*camera;

    let start = Instant::now();
    let (workers, chunks) = match config.mode {
        RenderMode::Sequential => {
            let mut rng = stream_rng(config.seed, 0);
            render_sequential(camera, world, &mut rng, sink, progress)?;
            (1, 1)
        }
        RenderMode::Parallel => render_parallel(camera, world, config, sink, progress)?,
    };

    let elapsed = start.elapsed();
    progress(RenderProgress::Done(elapsed));
    log::info!("Done in {:.2}s", elapsed.as_secs_f64());

    Ok(RenderStats {
        width: camera.image_width(),
        height: camera.image_height(),
        workers,
        chunks,
        elapsed,
    })
}

/// Single threaded scanline render; pixels are written as soon as they
/// are computed.
fn render_sequential(
    camera: &Camera,
    world: &dyn Hittable,
    rng: &mut dyn RngCore,
    sink: &mut dyn PixelSink,
    progress: &(dyn Fn(RenderProgress) + Sync),
) -> Result<(), RenderError> {
    let (width, height) = (camera.image_width(), camera.image_height());
    log::info!("Rendering {}x{} sequentially", width, height);

    sink.begin(width, height)?;
    for y in 0..height {
        progress(RenderProgress::ScanlinesRemaining(height - y));
        for x in 0..width {
            let color = render_pixel(camera, world, x, y, rng);
            sink.write_pixel(color_to_rgb(color))?;
        }
    }
    sink.finish()?;

    Ok(())
}

/// Chunked render on a fixed pool of workers.
///
/// All chunks are queued up front; the pool drains them, each chunk
/// with its own seeded generator, and joins before the image is read
/// back and written out. Returns the worker and chunk counts used.
fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    sink: &mut dyn PixelSink,
    progress: &(dyn Fn(RenderProgress) + Sync),
) -> Result<(usize, usize), RenderError> {
    let (width, height) = (camera.image_width(), camera.image_height());

    let requested = config.workers.unwrap_or_else(default_worker_count).max(1);
    let workers = fit_worker_count(requested, width, height);
    if workers != requested {
        log::warn!(
            "Image {}x{} too small for {} workers, using {}",
            width,
            height,
            requested,
            workers
        );
    }

    let buckets = generate_buckets(width, height, workers);
    log::info!(
        "Rendering {}x{} with {} workers in {} chunks",
        width,
        height,
        workers,
        buckets.len()
    );

    let image = Image::new(width, height);
    let remaining = AtomicUsize::new(buckets.len());
    progress(RenderProgress::ChunksRemaining(buckets.len()));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("render-worker-{i}"))
        .build()?;

    pool.install(|| {
        buckets.par_iter().try_for_each(|bucket| -> Result<(), ImageError> {
            let mut rng = stream_rng(config.seed, bucket.index as u64 + 1);
            render_bucket(bucket, camera, world, &image, &mut rng)?;

            let left = remaining.fetch_sub(1, Ordering::Relaxed) - 1;
            log::debug!("Chunk {} done, {} remaining", bucket.index, left);
            progress(RenderProgress::ChunksRemaining(left));
            Ok(())
        })
    })?;

    // Every worker has joined; read back in raster order
    let pixels = read_back(&image)?;

    sink.begin(image.width(), image.height())?;
    for rgb in pixels {
        sink.write_pixel(rgb)?;
    }
    sink.finish()?;

    Ok((workers, buckets.len()))
}

/// Collect the finished image in raster order, quantized for output.
fn read_back(image: &Image) -> Result<Vec<[u8; 3]>, RenderError> {
    let (width, height) = (image.width(), image.height());
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let color = image.get(x, y).ok_or(RenderError::MissingPixel { x, y })?;
            pixels.push(color_to_rgb(color));
        }
    }
    Ok(pixels)
}

/// Independent generator for one random stream.
///
/// Stream 0 is the sequential pass and chunk `i` uses stream `i + 1`;
/// callers that need randomness outside the render (scene layout) take
/// [`SCENE_STREAM`] so they never replay a render stream.
pub fn stream_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ stream.wrapping_mul(STREAM_STRIDE)),
        None => StdRng::from_entropy(),
    }
}
