//! Progressive render example.
//!
//! Builds a small scene with a checkered floor, a glass sphere, a mirror
//! sphere and a tinted glass box, then renders it in chunks the way an
//! interactive viewer would.
//!
//! Pass a JSON render config path as the first argument to override the
//! default settings.

use std::sync::Arc;

use anyhow::Result;
use ember_renderer::{
    Camera, Color, Container, ImageBuffer, Light, Material, PixelBudget, Plane, RenderConfig,
    RenderSession, Scene, Sphere, Texture, Vec3,
};

/// Pixels rendered per call, roughly one redraw's worth of work
const CHUNK: usize = 4096;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    log::info!("Scene built with {} objects in {:?}", scene.len(), start.elapsed());

    let camera = Camera::new()
        .with_resolution(640, 360)
        .with_location(Vec3::new(0.0, 1.5, 6.0))
        .with_rotation(Vec3::new(-0.15, 0.0, 0.0))
        .with_fov(55.0)
        .with_background(Color::new(0.05, 0.07, 0.12, 1.0));

    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => RenderConfig::default().with_oversample(4),
    };
    config.validate()?;

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    let mut session = RenderSession::new(0x5eed);

    log::info!(
        "Rendering {}x{} @ {} samples per pixel, fov {}",
        camera.image_width,
        camera.image_height,
        config.oversample,
        camera.fov()
    );

    let start = std::time::Instant::now();
    let mut chunks = 0;
    loop {
        let done = session.render_parallel(&scene, &camera, &mut image, PixelBudget::Pixels(CHUNK), &config);
        if done == 0 {
            break;
        }
        chunks += 1;
    }

    log::info!(
        "Rendered in {:?} over {} chunks, {} rays",
        start.elapsed(),
        chunks,
        session.rays_traced()
    );

    let rgba = image.to_rgba();
    let center = ((camera.image_height / 2 * camera.image_width + camera.image_width / 2) * 4) as usize;
    log::info!("Center pixel: {:?}", &rgba[center..center + 4]);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let mut scene = Scene::new();

    // Checkered floor
    let size = 8;
    let checker: Vec<Color> = (0..size * size)
        .map(|i| {
            if (i % size + i / size) % 2 == 0 {
                Color::new(0.9, 0.9, 0.9, 1.0)
            } else {
                Color::new(0.2, 0.2, 0.25, 1.0)
            }
        })
        .collect();
    let floor_texture = Arc::new(Texture::from_pixels(size as u32, size as u32, checker)?);
    let floor = Material::default()
        .with_texture(floor_texture)
        .with_reflectivity(0.15);
    scene.add(Box::new(
        Plane::new(Vec3::ZERO, Vec3::Y, Arc::new(floor)).with_uv_scale(0.125),
    ));

    // Glass sphere
    let glass = Material::new(Color::new(0.9, 0.95, 1.0, 0.1))
        .with_refraction_index(1.5)
        .with_reflectivity(0.05)
        .with_shininess(80.0);
    scene.add(Box::new(Sphere::new(Vec3::new(-1.2, 1.0, 0.0), 1.0, Arc::new(glass))));

    // Mirror sphere with a slightly blurred reflection
    let mirror = Material::rgb(0.1, 0.1, 0.1)
        .with_reflectivity(0.9)
        .with_reflection_blur(0.02);
    scene.add(Box::new(Sphere::new(Vec3::new(1.3, 0.8, -0.5), 0.8, Arc::new(mirror))));

    // Tinted glass box casting a colored shadow
    let tinted = Material::new(Color::new(1.0, 0.3, 0.2, 0.4));
    scene.add(Box::new(Container::cuboid(
        Vec3::new(-0.3, 0.0, 1.2),
        Vec3::new(0.3, 0.6, 1.8),
        Arc::new(tinted),
    )));

    scene.add_light(Light::new(Vec3::new(4.0, 6.0, 4.0)));
    scene.add_light(
        Light::new(Vec3::new(-5.0, 3.0, 2.0))
            .with_color(Color::new(0.4, 0.45, 0.6, 1.0))
            .with_ambient(0.0),
    );

    Ok(scene)
}
