//! Camera for primary ray generation.

use ember_core::Color;
use ember_math::{euler_rotation, Mat3, Vec2, Vec3};

/// Pinhole camera looking down its local -Z axis.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Background color for rays that hit nothing
    pub background: Color,

    location: Vec3,
    fov: f32, // Vertical field of view in degrees

    // Built from Euler angles in radians (pitch, yaw, roll)
    rotation_matrix: Mat3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 320,
            image_height: 240,
            background: Color::new(0.0, 0.0, 0.0, 1.0),
            location: Vec3::ZERO,
            fov: 60.0,
            rotation_matrix: Mat3::IDENTITY,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    /// Set camera orientation as Euler angles in radians.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation_matrix = euler_rotation(rotation);
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.image_width as f32 / self.image_height.max(1) as f32
    }

    /// Total number of pixels in a frame.
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }

    /// Screen position of a row-major pixel index.
    pub fn pixel_coords(&self, index: usize) -> (u32, u32) {
        let width = self.image_width.max(1) as usize;
        ((index % width) as u32, (index / width) as u32)
    }

    /// World-space direction through pixel (x, y) offset by `jitter` in
    /// [0, 1)². Row 0 is the top of the image.
    pub fn primary_direction(&self, x: u32, y: u32, jitter: Vec2) -> Vec3 {
        let width = self.image_width.max(1) as f32;
        let height = self.image_height.max(1) as f32;
        let half_fov = (self.fov.to_radians() / 2.0).tan();

        let rx = (2.0 * ((x as f32 + jitter.x) / width) - 1.0) * half_fov * self.aspect_ratio();
        let ry = (1.0 - 2.0 * ((y as f32 + jitter.y) / height)) * half_fov;
        let dir = Vec3::new(rx, ry, -1.0).normalize();

        self.rotation_matrix * dir
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
