//! Math primitives shared by the raytrace crates.
//!
//! Vectors are glam's double precision `DVec3`, re-exported under the
//! names the renderer uses. Sampling helpers take an explicit RNG so
//! every caller owns its random stream.

pub use glam::{dvec3, DVec3};

mod interval;
mod ray;
pub mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{
    near_zero, random_in_unit_disk, random_on_hemisphere, random_unit_vector, random_vector,
    reflect, refract, unit_vector,
};

/// Three component vector.
pub type Vec3 = DVec3;

/// A position in world space.
pub type Point3 = DVec3;
