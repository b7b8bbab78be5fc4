//! Phong-style surface materials.

use std::sync::Arc;

use ember_math::{Vec2, Vec3, Vec4};

use crate::texture::Texture;

/// RGBA color, linear 0-1. Alpha is opacity.
pub type Color = Vec4;

/// Surface material used by the shading model.
///
/// A diffuse alpha below 1 makes the surface transparent; with a refraction
/// index other than 1 the transmitted ray is bent through the object.
#[derive(Clone, Debug)]
pub struct Material {
    /// Base diffuse color (alpha < 1 means transparent)
    pub diffuse: Color,

    /// Optional texture multiplied into the diffuse color
    pub diffuse_texture: Option<Arc<Texture>>,

    /// Specular exponent
    pub shininess: f32,

    /// Fraction of the mirror-reflected color added on top (0 = none)
    pub reflectivity: f32,

    /// Amount of jitter applied to reflected rays
    pub reflection_blur: f32,

    /// Index of refraction (1.0 = no bending)
    pub refraction_index: f32,

    /// Light emitted by the surface, added unshaded
    pub emissive: Color,

    /// Optional tangent-space normal map
    pub normal_map: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::new(0.5, 0.5, 0.5, 1.0), // Grey default
            diffuse_texture: None,
            shininess: 20.0,
            reflectivity: 0.0,
            reflection_blur: 0.0,
            refraction_index: 1.0,
            emissive: Color::ZERO,
            normal_map: None,
        }
    }
}

impl Material {
    /// Create a new material with the given diffuse color.
    pub fn new(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Default::default()
        }
    }

    /// Opaque material from an RGB triple.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b, 1.0))
    }

    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_reflection_blur(mut self, blur: f32) -> Self {
        self.reflection_blur = blur.max(0.0);
        self
    }

    pub fn with_refraction_index(mut self, ior: f32) -> Self {
        self.refraction_index = ior;
        self
    }

    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.diffuse_texture = Some(texture);
        self
    }

    pub fn with_normal_map(mut self, normal_map: Arc<Texture>) -> Self {
        self.normal_map = Some(normal_map);
        self
    }

    /// Whether shading needs UV coordinates at the hit point.
    ///
    /// UVs can be expensive to compute (trig on spheres), so they are only
    /// requested when a texture will actually be sampled.
    pub fn needs_uv(&self) -> bool {
        self.diffuse_texture.is_some() || self.normal_map.is_some()
    }

    /// Diffuse color at the given UV coordinates.
    pub fn diffuse_color(&self, uv: Vec2) -> Color {
        match &self.diffuse_texture {
            Some(texture) => texture.sample(uv) * self.diffuse,
            None => self.diffuse,
        }
    }

    /// Raw normal map sample in [0, 1] per channel, if a map is present.
    pub fn sample_normal_map(&self, uv: Vec2) -> Option<Vec3> {
        self.normal_map.as_ref().map(|map| map.sample(uv).truncate())
    }
}
