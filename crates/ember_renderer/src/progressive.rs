//! Progressive, resumable pixel rendering.
//!
//! A `RenderSession` keeps a scan cursor over the image in row-major order.
//! Each call renders up to a pixel budget and returns, so a display loop can
//! interleave rendering with drawing. Frames end on a call boundary: one call
//! never renders pixels from two frames.

use ember_core::{Color, Scene};
use ember_math::{Ray, EPSILON};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::renderer::{PixelSink, RenderConfig};
use crate::sampling::{defocus, pixel_jitter, pixel_seed};
use crate::{Camera, Tracer};

/// Scanline marker colors written below a pixel in gridline debug mode.
const GRIDLINE_MARKER: [(u32, Color); 3] = [
    (1, Color::new(0.0, 0.0, 0.0, 1.0)),
    (2, Color::new(1.0, 1.0, 1.0, 1.0)),
    (3, Color::new(0.0, 0.0, 0.0, 1.0)),
];

/// How many pixels a render call may process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelBudget {
    /// Everything left in the current frame
    Remaining,
    /// At most this many pixels
    Pixels(usize),
}

impl PixelBudget {
    /// Interpret a signed count, where any negative value means "the rest of
    /// the frame".
    pub fn from_count(count: i64) -> Self {
        if count < 0 {
            PixelBudget::Remaining
        } else {
            PixelBudget::Pixels(count as usize)
        }
    }
}

/// Render state that survives between calls.
#[derive(Debug, Clone)]
pub struct RenderSession {
    cursor: usize,
    frame: u64,
    seed: u64,
    rays_traced: usize,
}

impl RenderSession {
    /// Start a session at pixel (0, 0) of frame 0.
    pub fn new(seed: u64) -> Self {
        Self {
            cursor: 0,
            frame: 0,
            seed,
            rays_traced: 0,
        }
    }

    /// Linear index of the next pixel to render.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of frames started before the current one.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Total rays traced over the life of the session.
    pub fn rays_traced(&self) -> usize {
        self.rays_traced
    }

    /// Begin a new frame at pixel (0, 0).
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.frame += 1;
    }

    /// Render up to `budget` pixels, continuing from the cursor.
    ///
    /// Returns the number of pixels written. Returns 0 when the frame was
    /// already complete; with `config.auto_reset` the cursor then wraps so
    /// the next call starts a new frame.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        sink: &mut dyn PixelSink,
        budget: PixelBudget,
        config: &RenderConfig,
    ) -> usize {
        let Some((start, end)) = self.claim(camera, budget, config) else {
            return 0;
        };

        let tracer = Tracer::new(scene, camera).with_max_depth(config.max_depth);
        for index in start..end {
            let color = self.shade_pixel(&tracer, camera, index, config);
            write_pixel(sink, camera, index, color, config);
        }

        self.finish(end, tracer.rays_traced(), camera, config)
    }

    /// Same contract as [`render`](Self::render), shading the claimed pixels
    /// on the rayon thread pool.
    ///
    /// Pixels are written in cursor order once shading finishes, so the
    /// result is identical to the serial call.
    pub fn render_parallel(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        sink: &mut dyn PixelSink,
        budget: PixelBudget,
        config: &RenderConfig,
    ) -> usize {
        let Some((start, end)) = self.claim(camera, budget, config) else {
            return 0;
        };

        let tracer = Tracer::new(scene, camera).with_max_depth(config.max_depth);
        let colors: Vec<Color> = (start..end)
            .into_par_iter()
            .map(|index| self.shade_pixel(&tracer, camera, index, config))
            .collect();

        for (index, color) in (start..end).zip(colors) {
            write_pixel(sink, camera, index, color, config);
        }

        self.finish(end, tracer.rays_traced(), camera, config)
    }

    /// Pixel range for this call, or `None` at a frame boundary.
    fn claim(&mut self, camera: &Camera, budget: PixelBudget, config: &RenderConfig) -> Option<(usize, usize)> {
        let total = camera.pixel_count();
        if self.cursor >= total {
            if config.auto_reset {
                self.reset();
            }
            return None;
        }

        let end = match budget {
            PixelBudget::Remaining => total,
            PixelBudget::Pixels(n) => self.cursor.saturating_add(n).min(total),
        };
        if end == self.cursor {
            return None;
        }
        Some((self.cursor, end))
    }

    /// Advance the cursor past a rendered range and handle the frame end.
    fn finish(&mut self, end: usize, rays: usize, camera: &Camera, config: &RenderConfig) -> usize {
        let done = end - self.cursor;
        self.cursor = end;
        self.rays_traced += rays;

        log::debug!(
            "Rendered {} pixels ({}/{}), {} rays",
            done,
            self.cursor,
            camera.pixel_count(),
            rays
        );

        if self.cursor >= camera.pixel_count() {
            log::info!("Frame {} complete", self.frame);
            if config.auto_reset {
                self.reset();
            }
        }
        done
    }

    /// Average of `config.oversample` samples through one pixel.
    fn shade_pixel(&self, tracer: &Tracer, camera: &Camera, index: usize, config: &RenderConfig) -> Color {
        let (x, y) = camera.pixel_coords(index);
        let mut rng = StdRng::seed_from_u64(pixel_seed(self.seed, self.frame, index));

        let oversample = config.oversample.max(1);
        let weight = 1.0 / oversample as f32;
        let mut color = Color::ZERO;

        for _ in 0..oversample {
            let jitter = pixel_jitter(oversample, &mut rng);
            let mut dir = camera.primary_direction(x, y, jitter);
            if config.defocus_blur > EPSILON {
                dir = defocus(dir, config.defocus_blur, &mut rng);
            }

            let ray = Ray::new(camera.location(), dir);
            color += tracer.trace(&ray, 0, &mut rng) * weight;
        }

        color.truncate().extend(1.0)
    }
}

impl Default for RenderSession {
    fn default() -> Self {
        Self::new(0)
    }
}

fn write_pixel(sink: &mut dyn PixelSink, camera: &Camera, index: usize, color: Color, config: &RenderConfig) {
    let (x, y) = camera.pixel_coords(index);
    sink.put_pixel(x, y, color);

    if config.debug_gridlines {
        for (offset, marker) in GRIDLINE_MARKER {
            if y + offset < camera.image_height {
                sink.put_pixel(x, y + offset, marker);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageBuffer;
    use ember_math::Vec3;

    fn small_camera() -> Camera {
        Camera::new()
            .with_resolution(4, 3)
            .with_background(Color::new(0.2, 0.4, 0.6, 1.0))
    }

    #[test]
    fn test_budget_from_count() {
        assert_eq!(PixelBudget::from_count(-1), PixelBudget::Remaining);
        assert_eq!(PixelBudget::from_count(0), PixelBudget::Pixels(0));
        assert_eq!(PixelBudget::from_count(7), PixelBudget::Pixels(7));
    }

    #[test]
    fn test_partial_budgets_resume() {
        let scene = Scene::new();
        let camera = small_camera();
        let config = RenderConfig::default();
        let mut image = ImageBuffer::new(4, 3);
        let mut session = RenderSession::new(1);

        assert_eq!(session.render(&scene, &camera, &mut image, PixelBudget::Pixels(5), &config), 5);
        assert_eq!(session.cursor(), 5);
        assert_eq!(session.render(&scene, &camera, &mut image, PixelBudget::Pixels(5), &config), 5);
        // Only two left in the frame
        assert_eq!(session.render(&scene, &camera, &mut image, PixelBudget::Pixels(5), &config), 2);
        assert_eq!(session.cursor(), 12);
        assert_eq!(image.get(3, 2), camera.background);
    }

    #[test]
    fn test_zero_budget_is_a_no_op() {
        let scene = Scene::new();
        let camera = small_camera();
        let mut session = RenderSession::new(1);
        let mut writes = 0;
        let mut sink = |_x: u32, _y: u32, _c: Color| writes += 1;

        let done = session.render(&scene, &camera, &mut sink, PixelBudget::Pixels(0), &RenderConfig::default());
        assert_eq!(done, 0);
        assert_eq!(session.cursor(), 0);
        assert_eq!(writes, 0);
    }

    #[test]
    fn test_remaining_budget_finishes_frame() {
        let scene = Scene::new();
        let camera = small_camera();
        let config = RenderConfig::default();
        let mut image = ImageBuffer::new(4, 3);
        let mut session = RenderSession::new(1);

        session.render(&scene, &camera, &mut image, PixelBudget::Pixels(3), &config);
        assert_eq!(session.render(&scene, &camera, &mut image, PixelBudget::Remaining, &config), 9);
        assert_eq!(session.render(&scene, &camera, &mut image, PixelBudget::Remaining, &config), 0);
    }

    #[test]
    fn test_gridlines_only_when_enabled() {
        let scene = Scene::new();
        let camera = small_camera();
        let mut session = RenderSession::new(1);
        let mut writes = Vec::new();
        let mut sink = |x: u32, y: u32, _c: Color| writes.push((x, y));

        session.render(&scene, &camera, &mut sink, PixelBudget::Pixels(1), &RenderConfig::default());
        assert_eq!(writes, vec![(0, 0)]);

        writes.clear();
        let config = RenderConfig::default().with_debug_gridlines(true);
        let mut sink = |x: u32, y: u32, _c: Color| writes.push((x, y));
        session.render(&scene, &camera, &mut sink, PixelBudget::Pixels(1), &config);
        // Pixel (1, 0) plus marker rows 1 and 2; row 3 is off the image
        assert_eq!(writes, vec![(1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_pixels_are_opaque() {
        let scene = Scene::new();
        let camera = small_camera().with_background(Color::new(0.5, 0.5, 0.5, 0.0));
        let mut image = ImageBuffer::new(4, 3);
        let mut session = RenderSession::new(1);

        let config = RenderConfig::default().with_oversample(3);
        session.render(&scene, &camera, &mut image, PixelBudget::Remaining, &config);
        let c = image.get(1, 1);
        assert_eq!(c.w, 1.0);
        assert!((c.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_rays_counted() {
        let scene = Scene::new();
        let camera = small_camera();
        let mut image = ImageBuffer::new(4, 3);
        let mut session = RenderSession::new(1);

        let config = RenderConfig::default().with_oversample(2);
        session.render(&scene, &camera, &mut image, PixelBudget::Remaining, &config);
        assert_eq!(session.rays_traced(), 24);
    }

    fn lit_scene() -> Scene {
        use ember_core::{Light, Material, Plane, Sphere};
        use std::sync::Arc;

        let mut scene = Scene::new();
        scene.add(Box::new(Plane::new(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::Y,
            Arc::new(Material::rgb(0.8, 0.8, 0.8)),
        )));
        let mirror = Material::rgb(0.2, 0.3, 0.9)
            .with_reflectivity(0.5)
            .with_reflection_blur(0.05);
        scene.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0, Arc::new(mirror))));
        scene.add_light(Light::new(Vec3::new(3.0, 4.0, 0.0)));
        scene
    }

    #[test]
    fn test_full_frame_then_idle_without_reset() {
        let scene = lit_scene();
        let camera = small_camera();
        let config = RenderConfig::default();
        let mut image = ImageBuffer::new(4, 3);
        let mut session = RenderSession::new(3);

        assert_eq!(session.render(&scene, &camera, &mut image, PixelBudget::Remaining, &config), 12);
        assert_eq!(session.render(&scene, &camera, &mut image, PixelBudget::Pixels(4), &config), 0);
        assert_eq!(session.cursor(), 12);
        assert_eq!(session.frame(), 0);
    }

    #[test]
    fn test_auto_reset_starts_next_frame_at_origin() {
        let scene = lit_scene();
        let camera = small_camera();
        let config = RenderConfig::default().with_auto_reset(true);
        let mut session = RenderSession::new(3);
        let mut writes = Vec::new();
        let mut sink = |x: u32, y: u32, _c: Color| writes.push((x, y));

        assert_eq!(session.render(&scene, &camera, &mut sink, PixelBudget::Remaining, &config), 12);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.frame(), 1);

        assert_eq!(session.render(&scene, &camera, &mut sink, PixelBudget::Pixels(2), &config), 2);
        assert_eq!(&writes[12..], &[(0, 0), (1, 0)]);
    }

    #[test]
    fn test_row_major_order() {
        let scene = lit_scene();
        let camera = small_camera();
        let mut session = RenderSession::new(3);
        let mut writes = Vec::new();
        let mut sink = |x: u32, y: u32, _c: Color| writes.push((x, y));

        session.render(&scene, &camera, &mut sink, PixelBudget::Pixels(6), &RenderConfig::default());
        assert_eq!(writes, vec![(0, 0), (1, 0), (2, 0), (3, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_same_seed_same_image() {
        let scene = lit_scene();
        let camera = small_camera();
        let config = RenderConfig::default().with_oversample(4).with_defocus_blur(0.01);

        let mut a = ImageBuffer::new(4, 3);
        let mut b = ImageBuffer::new(4, 3);
        RenderSession::new(9).render(&scene, &camera, &mut a, PixelBudget::Remaining, &config);
        RenderSession::new(9).render(&scene, &camera, &mut b, PixelBudget::Remaining, &config);
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let scene = lit_scene();
        let camera = small_camera().with_resolution(8, 6);
        let config = RenderConfig::default().with_oversample(2).with_debug_gridlines(true);

        let mut serial = ImageBuffer::new(8, 6);
        let mut parallel = ImageBuffer::new(8, 6);
        let mut s = RenderSession::new(21);
        let mut p = RenderSession::new(21);

        // Uneven chunks to cross row boundaries
        for budget in [PixelBudget::Pixels(5), PixelBudget::Pixels(17), PixelBudget::Remaining] {
            let a = s.render(&scene, &camera, &mut serial, budget, &config);
            let b = p.render_parallel(&scene, &camera, &mut parallel, budget, &config);
            assert_eq!(a, b);
        }

        assert_eq!(serial.pixels, parallel.pixels);
        assert_eq!(s.rays_traced(), p.rays_traced());
    }
}
