//! Material trait for surface scattering.

use crate::hittable::HitRecord;
use rand::{Rng, RngCore};
use raytrace_math::{near_zero, random_unit_vector, reflect, refract, unit_vector, Ray, Vec3};

/// Color type alias (linear RGB, components typically 0-1)
pub type Color = Vec3;

/// Outcome of a ray scattering off a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel multiplier applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// The continuation ray leaving the surface
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed, which contributes black.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = unit_vector(reflect(ray_in.direction(), rec.normal));
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz that pushes the ray below the surface is absorbed
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scattered_dir),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction, relative to the enclosing medium
    refraction_index: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond. Values
    ///   below 1 model a bubble of lower density inside another dielectric.
    pub fn new(refraction_index: f64) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = unit_vector(ray_in.direction());
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || rng.gen::<f64>() < Self::reflectance(cos_theta, refraction_ratio)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use raytrace_math::Point3;

    fn record<'a>(ray: &Ray, outward_normal: Vec3, material: &'a dyn Material) -> HitRecord<'a> {
        HitRecord::new(ray, 1.0, outward_normal, material)
    }

    #[test]
    fn test_lambertian_scatters_into_normal_hemisphere() {
        let material = Lambertian::new(Color::new(0.8, 0.3, 0.1));
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
        let rec = record(&ray, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.1));
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
            assert!(!near_zero(result.scattered.direction()));
        }
    }

    #[test]
    fn test_metal_mirror_reflects_exactly() {
        let material = Metal::new(Color::new(0.7, 0.6, 0.5), 0.0);
        let ray = Ray::new(Point3::new(-1.0, 2.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let rec = record(&ray, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(2);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = unit_vector(Vec3::new(1.0, 1.0, 0.0));
        assert!((result.scattered.direction() - expected).length() < 1e-12);
        assert_eq!(result.attenuation, Color::new(0.7, 0.6, 0.5));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -0.5).fuzz(), 0.0);
        assert_eq!(Metal::new(Color::ONE, 0.3).fuzz(), 0.3);
    }

    #[test]
    fn test_metal_grazing_fuzz_can_absorb() {
        // A nearly tangent ray on a maximally fuzzy metal must sometimes
        // be perturbed below the surface
        let material = Metal::new(Color::ONE, 1.0);
        let ray = Ray::new(Point3::new(-1.0, 1e-3, 0.0), Vec3::new(1.0, -1e-3, 0.0));
        let rec = record(&ray, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(3);

        let mut absorbed = 0;
        for _ in 0..200 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(rec.normal) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_reflectance_limits() {
        let n: f64 = 1.5;
        let r0 = ((1.0 - n) / (1.0 + n)).powi(2);

        // Head-on the angular term vanishes, leaving the base reflectance
        assert_eq!(Dielectric::reflectance(1.0, n), r0);
        // At grazing incidence everything reflects
        assert!((Dielectric::reflectance(0.0, n) - 1.0).abs() < 1e-15);
        // Matched media never reflect head-on
        assert_eq!(Dielectric::reflectance(1.0, 1.0), 0.0);
    }

    #[test]
    fn test_dielectric_is_transparent_and_always_scatters() {
        let material = Dielectric::new(1.5);
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vec3::new(0.3, -1.0, 0.1));
        let rec = record(&ray, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Leaving glass at a shallow angle cannot refract
        let material = Dielectric::new(1.5);
        let ray = Ray::new(Point3::ZERO, Vec3::new(1.0, 0.2, 0.0));
        let rec = record(&ray, Vec3::Y, &material);
        assert!(!rec.front_face);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = reflect(unit_vector(ray.direction()), rec.normal);
            assert!((result.scattered.direction() - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let material = Dielectric::new(1.5);
        let ray = Ray::new(Point3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
        let rec = record(&ray, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(6);

        let refracted = (0..1000)
            .filter_map(|_| material.scatter(&ray, &rec, &mut rng))
            .filter(|result| result.scattered.direction().y < 0.0)
            .count();

        // Base reflectance of glass is 4%
        assert!(refracted > 900, "only {refracted} of 1000 refracted");
    }
}
