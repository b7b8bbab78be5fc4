//! Ember Renderer - Whitted-style progressive CPU ray tracing
//!
//! Recursive reflection and refraction with Phong shading, colored
//! transparent shadows and normal mapping. Rendering is progressive: a
//! `RenderSession` renders a pixel budget per call and resumes where it left
//! off, so an interactive loop can redraw between calls.

mod camera;
mod progressive;
mod renderer;
mod sampling;
mod shading;
mod tracer;

pub use camera::Camera;
pub use progressive::{PixelBudget, RenderSession};
pub use renderer::{
    color_to_rgba, linear_to_gamma, ConfigError, ConfigResult, ImageBuffer, PixelSink, RenderConfig,
};
pub use sampling::{defocus, pixel_jitter, pixel_seed, random_in_unit_disk};
pub use shading::{accumulate_light, shadow_transmission, LightSums, SHADOW_WALK_LIMIT};
pub use tracer::{Tracer, EXIT_MISS_COLOR, MAX_DEPTH};

/// Re-export scene types so callers can build scenes from one crate
pub use ember_core::{Color, Container, Light, Material, Plane, Scene, SceneObject, Sphere, Texture};
/// Re-export math types from ember_math
pub use ember_math::{Interval, Ray, Vec2, Vec3};
