//! The texture image type: pixels, color-space tag, and sampler metadata.

use crate::color::Rgba8;
use crate::color_space::ColorSpace;
use crate::error::ConvertError;
use crate::sampler::SamplerSettings;

/// A 2D RGBA8 texture.
///
/// `pixels.len()` is always `width * height` for images built through the
/// constructors; [`Image::validate`] checks it for hand-assembled values.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Asset name, preserved across conversions.
    pub name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (row-major).
    pub pixels: Vec<Rgba8>,
    /// How the stored bytes are to be interpreted.
    pub color_space: ColorSpace,
    /// Sampler state.
    pub sampler: SamplerSettings,
}

impl Image {
    /// Create an image filled with one pixel value.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        fill: Rgba8,
        color_space: ColorSpace,
    ) -> Self {
        let size = width as usize * height as usize;
        Self {
            name: name.into(),
            width,
            height,
            pixels: vec![fill; size],
            color_space,
            sampler: SamplerSettings::default(),
        }
    }

    /// Create an image from tightly packed RGBA8 bytes.
    pub fn from_rgba8_bytes(
        name: impl Into<String>,
        width: u32,
        height: u32,
        bytes: &[u8],
        color_space: ColorSpace,
    ) -> Result<Self, ConvertError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(ConvertError::InvalidInput(format!(
                "expected {} bytes for {}x{} RGBA8, got {}",
                expected,
                width,
                height,
                bytes.len()
            )));
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect();

        let image = Self {
            name: name.into(),
            width,
            height,
            pixels,
            color_space,
            sampler: SamplerSettings::default(),
        };
        image.validate()?;
        Ok(image)
    }

    /// Replace the sampler settings.
    pub fn with_sampler(mut self, sampler: SamplerSettings) -> Self {
        self.sampler = sampler;
        self
    }

    /// Check dimensions and buffer length.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConvertError::InvalidInput(format!(
                "image '{}' has zero dimension {}x{}",
                self.name, self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(ConvertError::InvalidInput(format!(
                "image '{}' has {} pixels, expected {} for {}x{}",
                self.name,
                self.pixels.len(),
                expected,
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.pixels[idx]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, px: Rgba8) {
        let idx = (y as usize) * (self.width as usize) + x as usize;
        self.pixels[idx] = px;
    }

    /// Convert to tightly packed RGBA8 bytes.
    pub fn to_rgba8_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            bytes.extend_from_slice(&px.to_array());
        }
        bytes
    }
}
