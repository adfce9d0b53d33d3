//! Built-in scenes.

use std::sync::Arc;

use clap::ValueEnum;
use rand::{Rng, RngCore};
use raytrace_math::random_vector;
use raytrace_renderer::{Color, Dielectric, HittableList, Lambertian, Metal, Point3, Sphere};

/// Scene selectable with `--scene`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SceneKind {
    /// Four spheres on a yellow ground, including a hollow glass ball
    #[default]
    Simple,
    /// Field of small random spheres around three large ones
    Complex,
}

impl SceneKind {
    /// Build the scene; `rng` drives any random placement.
    pub fn build(self, rng: &mut dyn RngCore) -> HittableList {
        match self {
            SceneKind::Simple => simple(),
            SceneKind::Complex => complex(rng),
        }
    }
}

pub fn simple() -> HittableList {
    let ground = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass = Arc::new(Dielectric::new(1.5));
    let bubble = Arc::new(Dielectric::new(1.0 / 1.5));
    let metal = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.1));

    let mut world = HittableList::new();
    world.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground));
    world.add(Sphere::new(Point3::new(4.0, 0.0, 1.0), 0.5, center));
    world.add(Sphere::new(Point3::new(3.0, 0.0, 2.0), 0.5, glass));
    world.add(Sphere::new(Point3::new(3.0, 0.0, 2.0), 0.4, bubble));
    world.add(Sphere::new(Point3::new(3.0, 0.0, -0.5), 0.5, metal));
    world
}

pub fn complex(rng: &mut dyn RngCore) -> HittableList {
    let mut world = HittableList::new();

    let ground = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    world.add(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    // Small spheres stay clear of the metal feature sphere
    let keep_out = Point3::new(4.0, 0.2, 0.0);

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - keep_out).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_vector(rng, 0.0, 1.0);
                world.add(Sphere::new(center, 0.2, Arc::new(Lambertian::new(albedo))));
            } else if choose_mat < 0.95 {
                let albedo = random_vector(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                world.add(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))));
            } else {
                world.add(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))));
            }
        }
    }

    let glass = Arc::new(Dielectric::new(1.5));
    let diffuse = Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1)));
    let mirror = Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));

    world.add(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, glass));
    world.add(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, diffuse));
    world.add(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, mirror));

    log::debug!("Complex scene built with {} spheres", world.len());
    world
}
