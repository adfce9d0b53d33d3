use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use raytrace_renderer::{
    color_to_rgb, generate_buckets, render, render_bucket, sky_gradient, Bucket, Camera, Color,
    HittableList, Image, ImageError, Lambertian, Point3, PpmWriter, Ray, RenderConfig,
    RenderMode, Sphere, Vec3,
};

const WIDTH: u32 = 40;

fn world() -> HittableList {
    let mut world = HittableList::new();
    world.add(Sphere::new(
        Point3::new(0.0, 0.0, -1.0),
        0.5,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    ));
    world
}

fn camera() -> Camera {
    Camera::new().with_resolution(WIDTH, 1.0).with_quality(1, 1)
}

/// Parse a `P3` stream into its header lines and pixel triples.
fn parse_ppm(text: &str) -> (Vec<&str>, Vec<[u8; 3]>) {
    let mut lines = text.lines();
    let header: Vec<&str> = lines.by_ref().take(3).collect();
    let pixels = lines
        .map(|line| {
            let channels: Vec<u8> = line.split(' ').map(|c| c.parse().unwrap()).collect();
            [channels[0], channels[1], channels[2]]
        })
        .collect();
    (header, pixels)
}

fn render_to_text(mode: RenderMode) -> String {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut camera = camera();
    let config = RenderConfig {
        mode,
        workers: Some(4),
        seed: Some(2024),
    };
    let mut ppm = PpmWriter::new(Vec::new());
    render(&mut camera, &world(), &config, &mut ppm, &|_| {}).unwrap();
    String::from_utf8(ppm.into_inner()).unwrap()
}

/// The background color for the center of pixel (x, y), as the camera
/// with `camera()` settings would see it.
fn expected_background(x: u32, y: u32) -> [u8; 3] {
    // 90 degree fov at focus distance 10: the viewport is 20 units across
    let pixel_size = 20.0 / WIDTH as f64;
    let direction = Vec3::new(
        -10.0 + (x as f64 + 0.5) * pixel_size,
        10.0 - (y as f64 + 0.5) * pixel_size,
        -10.0,
    );
    color_to_rgb(sky_gradient(&Ray::new(Point3::ZERO, direction)))
}

fn assert_close(actual: [u8; 3], expected: [u8; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.abs_diff(e) <= 2, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn single_sphere_scene_end_to_end() {
    for mode in [RenderMode::Sequential, RenderMode::Parallel] {
        let text = render_to_text(mode);
        assert!(text.starts_with(&format!("P3\n{} {}\n255\n", WIDTH, WIDTH)));

        let (header, pixels) = parse_ppm(&text);
        assert_eq!(header, vec!["P3", "40 40", "255"]);
        assert_eq!(pixels.len(), (WIDTH * WIDTH) as usize);

        let at = |x: u32, y: u32| pixels[(y * WIDTH + x) as usize];

        // The center ray hits the sphere; with one bounce of depth the
        // scattered ray contributes nothing
        let center = at(WIDTH / 2, WIDTH / 2);
        assert_eq!(center, [0, 0, 0], "{mode:?}");
        assert_ne!(center, expected_background(WIDTH / 2, WIDTH / 2));

        // Corners miss and show the sky gradient for their direction
        for (x, y) in [(0, 0), (WIDTH - 1, 0), (0, WIDTH - 1), (WIDTH - 1, WIDTH - 1)] {
            assert_close(at(x, y), expected_background(x, y));
        }
    }
}

#[test]
fn top_rows_are_bluer_than_bottom_rows() {
    let (_, pixels) = parse_ppm(&render_to_text(RenderMode::Parallel));
    let top = pixels[0];
    let bottom = pixels[(WIDTH * (WIDTH - 1)) as usize];
    assert!(top[0] < bottom[0]);
    assert_eq!(top[2], 255);
    assert_eq!(bottom[2], 255);
}

#[test]
fn buckets_fill_every_pixel_exactly_once() {
    let mut camera = camera();
    camera.initialize();
    let world = world();
    let image = Image::new(camera.image_width(), camera.image_height());
    let mut rng = StdRng::seed_from_u64(1);

    for bucket in generate_buckets(camera.image_width(), camera.image_height(), 3) {
        render_bucket(&bucket, &camera, &world, &image, &mut rng).unwrap();
    }

    assert_eq!(image.written(), (WIDTH * WIDTH) as usize);
    assert!(image.get(WIDTH, 0).is_none());
}

#[test]
fn overlapping_bucket_is_a_contract_violation() {
    let mut camera = camera();
    camera.initialize();
    let world = world();
    let image = Image::new(camera.image_width(), camera.image_height());
    let mut rng = StdRng::seed_from_u64(2);

    let first = Bucket::new(0, 0, 10, 10, 0);
    let overlapping = Bucket::new(5, 5, 10, 10, 1);
    render_bucket(&first, &camera, &world, &image, &mut rng).unwrap();

    assert_eq!(
        render_bucket(&overlapping, &camera, &world, &image, &mut rng),
        Err(ImageError::AlreadyWritten { x: 5, y: 5 })
    );
}

#[test]
fn bucket_outside_image_is_a_contract_violation() {
    let mut camera = camera();
    camera.initialize();
    let world = world();
    let image = Image::new(camera.image_width(), camera.image_height());
    let mut rng = StdRng::seed_from_u64(3);

    let outside = Bucket::new(WIDTH - 2, 0, 4, 1, 0);
    let err = render_bucket(&outside, &camera, &world, &image, &mut rng).unwrap_err();
    assert_eq!(
        err,
        ImageError::OutOfBounds { x: WIDTH, y: 0, width: WIDTH, height: WIDTH }
    );
}
