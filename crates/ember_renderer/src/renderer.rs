//! Render configuration and output raster.

use ember_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracer::MAX_DEPTH;

/// Errors from parsing or validating a render configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid render config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid render config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub oversample: u32,
    /// Lens jitter applied to primary rays (0 = pinhole)
    pub defocus_blur: f32,
    /// Start the next frame automatically when one completes
    pub auto_reset: bool,
    /// Draw a scanline marker below each rendered pixel
    pub debug_gridlines: bool,
    /// Maximum reflection/refraction bounce depth
    pub max_depth: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            oversample: 1,
            defocus_blur: 0.0,
            auto_reset: false,
            debug_gridlines: false,
            max_depth: MAX_DEPTH,
        }
    }
}

impl RenderConfig {
    pub fn with_oversample(mut self, oversample: u32) -> Self {
        self.oversample = oversample;
        self
    }

    pub fn with_defocus_blur(mut self, defocus_blur: f32) -> Self {
        self.defocus_blur = defocus_blur;
        self
    }

    pub fn with_auto_reset(mut self, auto_reset: bool) -> Self {
        self.auto_reset = auto_reset;
        self
    }

    pub fn with_debug_gridlines(mut self, debug_gridlines: bool) -> Self {
        self.debug_gridlines = debug_gridlines;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse and validate a configuration from JSON. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration can drive a render.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.oversample == 0 {
            return Err(ConfigError::Invalid("oversample must be at least 1".into()));
        }
        if !(self.defocus_blur >= 0.0 && self.defocus_blur.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "defocus_blur must be a finite non-negative number, got {}",
                self.defocus_blur
            )));
        }
        Ok(())
    }
}

/// Write-only destination for rendered pixels.
pub trait PixelSink {
    fn put_pixel(&mut self, x: u32, y: u32, color: Color);
}

impl<F: FnMut(u32, u32, Color)> PixelSink for F {
    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        self(x, y, color)
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    let a = (255.0 * color.w.clamp(0.0, 1.0)) as u8;
    [r, g, b, a]
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::W; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y). Writes outside the image are dropped.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Convert to RGBA bytes (for display).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

impl PixelSink for ImageBuffer {
    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.set(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::new(4.0, -1.0, 0.25, 1.0)), [255, 0, 127, 255]);
    }

    #[test]
    fn test_image_buffer_set_get() {
        let mut image = ImageBuffer::new(4, 2);
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        image.put_pixel(3, 1, red);
        assert_eq!(image.get(3, 1), red);
        assert_eq!(image.get(0, 0), Color::W);

        // Out of range writes are ignored
        image.put_pixel(4, 0, red);
        image.put_pixel(0, 2, red);
        assert_eq!(image.to_rgba().len(), 4 * 2 * 4);
    }

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.oversample, 1);
        assert_eq!(config.max_depth, MAX_DEPTH);
        assert!(!config.auto_reset);
        assert!(!config.debug_gridlines);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_partial() {
        let config = RenderConfig::from_json(r#"{ "oversample": 4, "auto_reset": true }"#).unwrap();
        assert_eq!(config.oversample, 4);
        assert!(config.auto_reset);
        assert_eq!(config.defocus_blur, 0.0);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = RenderConfig::from_json(r#"{ "oversample": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RenderConfig::from_json(r#"{ "defocus_blur": -0.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = RenderConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = RenderConfig::default().with_oversample(8).with_debug_gridlines(true);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RenderConfig::from_json(&json).unwrap(), config);
    }
}
