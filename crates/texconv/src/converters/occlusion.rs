//! Occlusion converter: foreign R channel <-> native G channel.

use super::TextureConverter;
use crate::color::Rgba8;
use crate::convert::ConversionContext;
use crate::error::ConvertError;
use crate::image::Image;
use crate::texture_type::TextureSemanticType;

#[derive(Debug, Clone)]
pub struct OcclusionConverter {
    context: ConversionContext,
}

impl OcclusionConverter {
    pub fn new(context: ConversionContext) -> Self {
        Self { context }
    }
}

/// `{R: 0, G: R, B: 0, A: 255}`
pub fn import_pixel(src: Rgba8) -> Rgba8 {
    Rgba8::new(0, src.r, 0, 255)
}

/// `{R: G, G: 0, B: 0, A: 255}`
pub fn export_pixel(src: Rgba8) -> Rgba8 {
    Rgba8::new(src.g, 0, 0, 255)
}

impl TextureConverter for OcclusionConverter {
    fn import_texture(&self, source: &Image) -> Result<Image, ConvertError> {
        self.context
            .convert(source, TextureSemanticType::Occlusion, Some(&import_pixel), None)
    }

    fn export_texture(&self, source: &Image) -> Result<Image, ConvertError> {
        self.context
            .convert(source, TextureSemanticType::Occlusion, Some(&export_pixel), None)
    }
}
