//! Vector helpers used by the scattering models and the camera.
//!
//! Everything random takes `&mut dyn RngCore` so each render thread can
//! own an independent generator.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Components below this magnitude count as zero in [`near_zero`].
const NEAR_ZERO: f64 = 1e-8;

/// Squared lengths at or below this are rejected by [`random_unit_vector`]
/// so the normalization never divides by an underflowed length.
const MIN_SAMPLE_LENGTH_SQUARED: f64 = 1e-160;

/// Normalize `v`, returning zero for a zero-length vector instead of NaN.
#[inline]
pub fn unit_vector(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

/// True if every component of `v` is within `1e-8` of zero.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface using Snell's law.
///
/// The caller must already have ruled out total internal reflection.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// A vector with each component drawn uniformly from `[min, max)`.
pub fn random_vector(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    let mut component = || min + (max - min) * rng.gen::<f64>();
    Vec3::new(component(), component(), component())
}

/// A random unit vector, uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling inside the unit ball, then project to the surface
    loop {
        let p = random_vector(rng, -1.0, 1.0);
        let len_sq = p.length_squared();
        if MIN_SAMPLE_LENGTH_SQUARED < len_sq && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// A random unit vector in the hemisphere around `normal`.
pub fn random_on_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let on_unit_sphere = random_unit_vector(rng);
    if on_unit_sphere.dot(normal) > 0.0 {
        on_unit_sphere
    } else {
        -on_unit_sphere
    }
}

/// A random point strictly inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen::<f64>() * 2.0 - 1.0,
            rng.gen::<f64>() * 2.0 - 1.0,
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
