//! Simple path tracer example.
//!
//! Renders a small scene using every primitive kind and saves it as PPM.
//!
//! Usage: `simple_render [config.json] [output-stem]`
//! Set `RUST_LOG=info` (or `debug`) to see progress.

use std::sync::Arc;

use anyhow::Context;
use glint_core::{Mesh, NoiseTexture, Perlin, Surface};
use glint_renderer::{
    Camera, Color, Model, ModelTransform, Quad, RenderConfig, Renderer, Scene, Sphere,
    SphereVolume, Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RenderConfig::from_file(&path).with_context(|| format!("reading {path}"))?,
        None => RenderConfig::default()
            .with_resolution(400, 225)
            .with_quality(64, 12),
    };
    let stem = args.next().unwrap_or_else(|| "output".to_string());

    let start = std::time::Instant::now();
    let scene = build_scene(config.seed.unwrap_or(2024))?;
    log::info!("Scene built in {:?} ({} primitives)", start.elapsed(), scene.len());

    let output = Renderer::new(config)?.render(&scene)?;
    log::info!("Stats: {:?}", output.stats);

    output.framebuffer.save(&stem)?;
    Ok(())
}

fn build_scene(seed: u64) -> anyhow::Result<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);

    let camera = Camera::new(
        Vec3::new(0.0, 1.5, 6.0),
        Vec3::new(0.0, -0.15, -1.0),
        Vec3::Y,
        1.2,
    )?;
    let mut scene = Scene::new(camera);

    // Ground with a marbled noise texture
    let perlin = Arc::new(Perlin::new(&mut rng).with_frequency(2.0));
    scene.add(Quad::new(
        Vec3::new(-20.0, 0.0, 20.0),
        Vec3::new(40.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -40.0),
        Surface::diffuse(NoiseTexture::new(perlin, Color::new(0.7, 0.7, 0.6))),
    )?);

    // Overhead light
    scene.add(Quad::new(
        Vec3::new(-2.0, 5.0, -1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 2.0),
        Surface::emissive(Color::splat(4.0)),
    )?);

    // Three main spheres
    scene.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Surface::dielectric(1.5)?)?);
    scene.add(Sphere::new(
        Vec3::new(-2.2, 1.0, -0.5),
        1.0,
        Surface::diffuse(Color::new(0.4, 0.2, 0.1)),
    )?);
    scene.add(Sphere::new(Vec3::new(2.2, 1.0, -0.5), 1.0, Surface::specular(0.05)?)?);

    // Fog bank behind the spheres
    scene.add(SphereVolume::new(
        Vec3::new(0.0, 1.0, -4.0),
        1.5,
        0.4,
        Color::splat(0.9),
    )?);

    // A triangle standing on the ground
    scene.add(Triangle::new(
        Vec3::new(-4.5, 0.0, -2.0),
        Vec3::new(-3.0, 0.0, -2.5),
        Vec3::new(-3.8, 2.0, -2.2),
        Surface::diffuse(Color::new(0.2, 0.5, 0.8)),
    ));

    // Two instances of one tetrahedron mesh
    let tetra = Arc::new(Mesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.9),
            Vec3::new(0.5, 0.8, 0.3),
        ],
        vec![0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3],
    )?);
    for (x, tint) in [(3.2, Color::new(0.8, 0.3, 0.3)), (-1.2, Color::new(0.3, 0.8, 0.3))] {
        let transform = ModelTransform::new(
            Vec3::new(x, 0.0, 1.5),
            Vec3::Z,
            Vec3::Y,
            Vec3::splat(0.6),
        );
        scene.add(Model::new(tetra.clone(), transform, Surface::diffuse(tint))?);
    }

    // Scattered small spheres
    for _ in 0..24 {
        let center = Vec3::new(rng.gen_range(-6.0..6.0), 0.2, rng.gen_range(-6.0..2.5));
        if (center - Vec3::new(0.0, 0.2, 0.0)).length() < 1.5 {
            continue;
        }
        let surface = match rng.gen_range(0..10) {
            0..=6 => Surface::diffuse(Color::new(rng.gen(), rng.gen(), rng.gen())),
            7 | 8 => Surface::specular(rng.gen_range(0.0..0.4))?,
            _ => Surface::dielectric(1.5)?,
        };
        scene.add(Sphere::new(center, 0.2, surface)?);
    }

    Ok(scene)
}
