//! Textures for diffuse color and normal maps.
//!
//! Pixels are kept as linear RGBA floats so the same data can be sampled as a
//! color (with alpha for transparency) or as an encoded normal.

use std::path::Path;

use ember_math::{Vec2, Vec4};
use thiserror::Error;

/// Errors that can occur while building or loading a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Expected {expected} pixels for texture, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (linear, 0-1 range), row-major, top row first
    pub pixels: Vec<Vec4>,
}

impl Texture {
    /// Create a texture from pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Vec4>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        let expected = (width as usize) * (height as usize);
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec4) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Load a texture from an image file on disk.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.to_rgba32f();
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| Vec4::new(p[0], p[1], p[2], p[3]))
            .collect();

        let texture = Self::from_pixels(width, height, pixels)?;
        log::debug!(
            "Loaded texture: {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Sample the texture at UV coordinates (bilinear filtering, wrapping).
    ///
    /// (0, 0) is the bottom-left corner.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let x = u * (self.width as f32 - 1.0);
        let y = (1.0 - v) * (self.height as f32 - 1.0);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x.fract();
        let fy = y.fract();

        let top = self.get_pixel(x0, y0).lerp(self.get_pixel(x1, y0), fx);
        let bottom = self.get_pixel(x0, y1).lerp(self.get_pixel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    fn get_pixel(&self, x: u32, y: u32) -> Vec4 {
        let idx = (y * self.width + x) as usize;
        self.pixels.get(idx).copied().unwrap_or(Vec4::W)
    }
}
