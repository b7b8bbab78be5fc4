//! Recursive Whitted-style ray tracer.
//!
//! Each hit is shaded locally against every light, then reflection and
//! transmission spawn child rays up to a fixed bounce depth.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ember_core::{Color, HitRecord, Scene};
use ember_math::{reflect, refract, Interval, Ray, Vec2, Vec3, EPSILON};
use rand::RngCore;

use crate::sampling::defocus;
use crate::shading::{accumulate_light, LightSums};
use crate::Camera;

/// Default maximum bounce depth for reflection and refraction.
pub const MAX_DEPTH: u32 = 5;

/// Returned when a refracted ray never finds its way out of an object.
/// Only numerically awkward or non-convex geometry produces it.
pub const EXIT_MISS_COLOR: Color = Color::new(1.0, 0.0, 1.0, 1.0);

/// Offset along a spawned ray's direction to clear the surface it left.
const SURFACE_OFFSET: f32 = 0.001;

static EXIT_MISS_REPORTED: AtomicBool = AtomicBool::new(false);

/// Traces rays against one scene for one render pass.
pub struct Tracer<'s> {
    scene: &'s Scene,
    eye: Vec3,
    background: Color,
    max_depth: u32,
    rays_traced: AtomicUsize,
}

impl<'s> Tracer<'s> {
    /// Create a tracer viewing `scene` from `camera`.
    pub fn new(scene: &'s Scene, camera: &Camera) -> Self {
        Self {
            scene,
            eye: camera.location(),
            background: camera.background,
            max_depth: MAX_DEPTH,
            rays_traced: AtomicUsize::new(0),
        }
    }

    /// Override the bounce limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Number of `trace` calls made so far, including recursive ones.
    pub fn rays_traced(&self) -> usize {
        self.rays_traced.load(Ordering::Relaxed)
    }

    /// Color seen along `ray`.
    ///
    /// `depth` counts reflection and refraction bounces so far; primary rays
    /// start at 0. `rng` drives blurred reflections only.
    pub fn trace(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        self.rays_traced.fetch_add(1, Ordering::Relaxed);

        let Some(mut hit) = self.scene.hit(ray) else {
            return self.background;
        };

        let material = hit.material();

        // UVs can be slow to compute, only ask when a texture needs them
        let uv = if material.needs_uv() { hit.uv() } else { Vec2::ZERO };

        if let Some(sample) = material.sample_normal_map(uv) {
            hit.normal = perturb_normal(hit.normal, hit.tangent(), sample);
        }

        let mut sums = LightSums::default();
        for light in self.scene.lights() {
            accumulate_light(self.scene, self.eye, &hit, light, &mut sums);
        }

        let material_color = material.diffuse_color(uv);
        let mut color = (sums.ambient + sums.diffuse) * material_color + sums.specular + material.emissive;

        if material.reflectivity > 0.0 && depth < self.max_depth {
            let mut reflected_dir = reflect(ray.direction(), hit.normal);
            if material.reflection_blur > EPSILON {
                reflected_dir = defocus(reflected_dir, material.reflection_blur, rng);
            }

            let reflected = Ray::new(hit.p + reflected_dir * EPSILON, reflected_dir);
            color += material.reflectivity * self.trace(&reflected, depth + 1, rng);
        }

        if material_color.w < 1.0 {
            let transmission = 1.0 - material_color.w;

            if material.refraction_index == 1.0 {
                // Straight pass-through does not use up a bounce
                let dir = ray.direction();
                let transmitted = Ray::new(hit.p + dir * SURFACE_OFFSET, dir);
                color += transmission * self.trace(&transmitted, depth, rng);
            } else if depth < self.max_depth {
                match refract_through(ray, &hit, material.refraction_index) {
                    Some(exit_ray) => {
                        color += transmission * self.trace(&exit_ray, depth + 1, rng);
                    }
                    None => {
                        if !EXIT_MISS_REPORTED.swap(true, Ordering::Relaxed) {
                            log::warn!(
                                "Refracted ray found no exit point at {:?}; using debug color",
                                hit.p
                            );
                        }
                        color = EXIT_MISS_COLOR;
                    }
                }
            }
        }

        color
    }
}

/// Bend `ray` into the object at `hit`, find where it leaves that object,
/// and return the ray continuing out the far side.
///
/// Only the hit's owning object is tested, which assumes simple convex
/// solids.
fn refract_through(ray: &Ray, hit: &HitRecord, ior: f32) -> Option<Ray> {
    let incident = ray.direction().normalize_or_zero();
    let entry_dir = refract(incident, hit.normal, 1.0 / ior);
    let inside = Ray::new(hit.p + entry_dir * SURFACE_OFFSET, entry_dir);

    let exit = hit.owner.hit(&inside, Interval::FORWARD)?;
    let exit_dir = refract(entry_dir, -exit.normal, ior);
    Some(Ray::new(exit.p + exit_dir * SURFACE_OFFSET, exit_dir))
}

/// Tilt a geometric normal by a tangent-space normal map sample in [0, 1].
fn perturb_normal(normal: Vec3, tangent: Vec3, sample: Vec3) -> Vec3 {
    let mapped = sample * 2.0 - Vec3::ONE;

    // Soften the map a little toward the geometric normal
    let softened = (mapped + Vec3::Z).normalize_or_zero();

    let bitangent = normal.cross(tangent);
    let perturbed = softened.x * tangent + softened.y * bitangent + softened.z * normal;
    let perturbed = perturbed.normalize_or_zero();
    if perturbed == Vec3::ZERO {
        normal
    } else {
        perturbed
    }
}
