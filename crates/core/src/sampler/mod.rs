use serde::{Deserialize, Serialize};

use crate::{color::Rgb, config::ColorConfig, LyricCanvasError, Result};

/// Decoded RGBA image, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or(LyricCanvasError::InvalidInput("image dimensions overflow"))?;
        if data.len() != expected {
            return Err(LyricCanvasError::InvalidInput(
                "pixel data length must equal width * height * 4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            data: rgba.repeat(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }
}

/// A pixel that survived sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSample {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<ColorSample> for Rgb {
    fn from(sample: ColorSample) -> Self {
        Rgb::new(sample.r, sample.g, sample.b)
    }
}

/// Filters applied while walking a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    /// Visit every `stride`-th pixel. Must be at least 1.
    pub stride: usize,
    pub alpha_threshold: u8,
    pub min_brightness: f32,
    pub max_brightness: f32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self::from(&ColorConfig::default())
    }
}

impl From<&ColorConfig> for SamplerSettings {
    fn from(config: &ColorConfig) -> Self {
        Self {
            stride: config.stride,
            alpha_threshold: config.alpha_threshold,
            min_brightness: config.min_brightness,
            max_brightness: config.max_brightness,
        }
    }
}

/// Walks the buffer every `settings.stride` pixels and keeps opaque pixels
/// whose brightness lies inside the accepted band. An image with no surviving
/// pixel yields an empty vector.
pub fn sample(pixels: &PixelBuffer, settings: &SamplerSettings) -> Result<Vec<ColorSample>> {
    if settings.stride == 0 {
        return Err(LyricCanvasError::InvalidInput("sampling stride must be at least 1"));
    }

    let samples: Vec<ColorSample> = pixels
        .as_rgba()
        .chunks_exact(4)
        .step_by(settings.stride)
        .filter(|px| px[3] >= settings.alpha_threshold)
        .filter(|px| {
            let brightness = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
            brightness >= settings.min_brightness && brightness <= settings.max_brightness
        })
        .map(|px| ColorSample::new(px[0], px[1], px[2]))
        .collect();

    tracing::trace!(
        width = pixels.width(),
        height = pixels.height(),
        kept = samples.len(),
        "sampled pixel buffer"
    );
    Ok(samples)
}
