// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod interval;
mod optics;
mod ray;

pub use interval::Interval;
pub use optics::{euler_rotation, reflect, refract};
pub use ray::Ray;

/// Tolerance used for "effectively zero" comparisons and surface offsets.
pub const EPSILON: f32 = 1e-4;
