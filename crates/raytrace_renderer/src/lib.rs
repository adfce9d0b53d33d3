//! CPU ray tracer.
//!
//! Casts rays from a thin-lens camera through each pixel, intersects them
//! against a linear list of spheres and follows diffuse, metallic and
//! dielectric bounces until the ray escapes to the sky or runs out of
//! depth. Images are produced either sequentially or by a worker pool
//! rendering disjoint chunks into a shared [`Image`].

mod bucket;
mod camera;
mod hittable;
mod image_buffer;
mod material;
mod output;
mod renderer;
mod sphere;

pub use bucket::{
    default_worker_count, fit_worker_count, generate_buckets, render_bucket, Bucket,
};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use image_buffer::{Image, ImageError};
pub use material::{Color, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{PixelSink, PngWriter, PpmWriter};
pub use renderer::{
    color_to_rgb, linear_to_gamma, ray_color, render, render_pixel, sky_gradient, stream_rng,
    RenderConfig, RenderError, RenderMode, RenderProgress, RenderStats, SCENE_STREAM,
};
pub use sphere::Sphere;

/// Re-export the math types used throughout the public API
pub use raytrace_math::{Interval, Point3, Ray, Vec3};
