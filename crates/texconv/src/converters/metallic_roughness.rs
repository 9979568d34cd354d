//! Metallic-roughness (foreign) to metallic-smoothness (native) converter.
//!
//! Foreign layout: metallic in B, roughness in G.
//! Native layout: metallic in R, smoothness in A, with
//! `smoothness = 1 - sqrt(roughness)`.
//!
//! The sqrt/square pair is quantized to 8 bits on each side, so a round trip
//! does not restore the original roughness byte. Metallic survives exactly.

use super::TextureConverter;
use crate::color::{clamp_byte, Rgba8};
use crate::convert::ConversionContext;
use crate::error::ConvertError;
use crate::image::Image;
use crate::texture_type::TextureSemanticType;

/// Converts between metallic-roughness and metallic-smoothness layouts.
#[derive(Debug, Clone)]
pub struct MetallicRoughnessConverter {
    context: ConversionContext,
    /// Scale applied to roughness on import and to smoothness on export.
    pub smoothness_or_roughness_factor: f32,
}

impl MetallicRoughnessConverter {
    pub fn new(context: ConversionContext, smoothness_or_roughness_factor: f32) -> Self {
        Self {
            context,
            smoothness_or_roughness_factor,
        }
    }

    /// Foreign pixel to native pixel.
    pub fn import_pixel(&self, src: Rgba8) -> Rgba8 {
        import_pixel(src, self.smoothness_or_roughness_factor)
    }

    /// Native pixel to foreign pixel.
    pub fn export_pixel(&self, src: Rgba8) -> Rgba8 {
        export_pixel(src, self.smoothness_or_roughness_factor)
    }
}

/// `{R: B, G: 0, B: 0, A: (1 - sqrt(G * factor / 255)) * 255}`
pub fn import_pixel(src: Rgba8, factor: f32) -> Rgba8 {
    let roughness = src.g as f32 * factor / 255.0;
    let smoothness = 1.0 - roughness.sqrt();
    Rgba8::new(src.b, 0, 0, clamp_byte(smoothness * 255.0))
}

/// `{R: 0, G: (1 - A * factor / 255)^2 * 255, B: R, A: 255}`
pub fn export_pixel(src: Rgba8, factor: f32) -> Rgba8 {
    let smoothness = src.a as f32 * factor / 255.0;
    let roughness_sqrt = 1.0 - smoothness;
    let roughness = roughness_sqrt * roughness_sqrt;
    Rgba8::new(0, clamp_byte(roughness * 255.0), src.r, 255)
}

impl TextureConverter for MetallicRoughnessConverter {
    fn import_texture(&self, source: &Image) -> Result<Image, ConvertError> {
        let transform = |px| self.import_pixel(px);
        self.context
            .convert(source, TextureSemanticType::Metallic, Some(&transform), None)
    }

    fn export_texture(&self, source: &Image) -> Result<Image, ConvertError> {
        let transform = |px| self.export_pixel(px);
        self.context
            .convert(source, TextureSemanticType::Metallic, Some(&transform), None)
    }
}
