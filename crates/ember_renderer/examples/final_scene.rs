//! Renders the closing scene: a field of small random spheres around three
//! large ones (diffuse, mirror metal, glass).
//!
//! Run with: cargo run --release --example final_scene -- [output.ppm] [camera.json]
//!
//! The optional JSON file overrides any subset of `CameraSettings` fields.

use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use ember_renderer::{
    render, Background, Camera, CameraSettings, Color, Dielectric, HittableList, Lambertian,
    Material, Metal, Point3, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 0x5eed;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let output = args.get(1).map(String::as_str).unwrap_or("output.ppm");

    let settings = match args.get(2) {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str::<CameraSettings>(&text).with_context(|| format!("parsing {path}"))?
        }
        None => default_settings(),
    };

    let mut rng = StdRng::seed_from_u64(SEED);

    let world = build_scene(&mut rng)?;
    log::info!("Created {} objects", world.len());

    let mut camera = Camera::new(settings);
    camera.initialize().context("invalid camera settings")?;

    let image = render(&camera, &world, &mut rng)?;
    image.save(output)?;

    Ok(())
}

fn default_settings() -> CameraSettings {
    CameraSettings {
        aspect_ratio: 16.0 / 9.0,
        image_width: 1200,
        samples_per_pixel: 100,
        max_depth: 25,
        vfov: 20.0,
        look_from: Point3::new(13.0, 2.0, 3.0),
        look_at: Point3::new(0.0, 0.0, 0.0),
        vup: Vec3::new(0.0, 1.0, 0.0),
        defocus_angle: 1.0,
        focus_dist: 10.0,
        background: Background::Sky,
    }
}

fn build_scene(rng: &mut StdRng) -> Result<HittableList> {
    let mut world = HittableList::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
    world.add(Box::new(Sphere::new(Point3::new(0.0, -1000.0, 0.0), 1000.0, ground)?));

    // Small random spheres; all glass ones share a single material
    let small_glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.2)?);

    for a in -5..5 {
        for b in -5..5 {
            let choose_mat: f64 = rng.gen();
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.4 * rng.gen::<f64>(),
            );

            // Keep clear of the large spheres along x = 4
            if (center - Point3::new(4.0, 1.0, 0.0)).length() <= 1.0 {
                continue;
            }

            let material: Arc<dyn Material> = if choose_mat < 0.75 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                small_glass.clone()
            };

            world.add(Box::new(Sphere::new(center, 0.2, material)?));
        }
    }

    let diffuse: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.2)));
    world.add(Box::new(Sphere::new(Point3::new(-4.0, 1.0, 0.0), 1.0, diffuse)?));

    let metal: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.4, 0.7, 0.1), 0.0));
    world.add(Box::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, metal)?));

    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5)?);
    world.add(Box::new(Sphere::new(Point3::new(4.0, 1.0, 0.0), 1.0, glass)?));

    Ok(world)
}

fn random_color(rng: &mut StdRng, min: f64, max: f64) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}
