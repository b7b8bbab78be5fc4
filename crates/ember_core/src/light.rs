use ember_math::Vec3;

use crate::material::Color;

/// A point light.
#[derive(Clone, Debug)]
pub struct Light {
    pub location: Vec3,
    pub color: Color,
    /// Ambient contribution, scaled by `color`
    pub ambient: f32,
    /// Whether occluders between a surface and this light cast shadows
    pub shadow: bool,
}

impl Light {
    /// White shadow-casting light with a small ambient term.
    pub fn new(location: Vec3) -> Self {
        Self {
            location,
            color: Color::ONE,
            ambient: 0.1,
            shadow: true,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }
}
