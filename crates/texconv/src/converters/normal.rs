//! Normal map converter.
//!
//! Normal repacking reconstructs or drops a vector component, so it runs as
//! a shader pass during the copy rather than as a per-pixel channel remap.
//! The encoder and decoder programs are resolved lazily and cached.

use super::TextureConverter;
use crate::convert::ConversionContext;
use crate::error::ConvertError;
use crate::image::Image;
use crate::shader::{LazyPass, NORMAL_MAP_DECODER_PROGRAM, NORMAL_MAP_ENCODER_PROGRAM};
use crate::texture_type::TextureSemanticType;

/// Converts between RGB and native AG normal map layouts.
#[derive(Debug)]
pub struct NormalConverter {
    context: ConversionContext,
    encoder: LazyPass,
    decoder: LazyPass,
}

impl NormalConverter {
    /// Use the built-in encoder and decoder programs.
    pub fn new(context: ConversionContext) -> Self {
        Self::with_programs(
            context,
            NORMAL_MAP_ENCODER_PROGRAM,
            NORMAL_MAP_DECODER_PROGRAM,
        )
    }

    /// Use explicitly named programs.
    pub fn with_programs(context: ConversionContext, encoder: &str, decoder: &str) -> Self {
        Self {
            context,
            encoder: LazyPass::new(encoder),
            decoder: LazyPass::new(decoder),
        }
    }

    pub fn encoder(&self) -> &LazyPass {
        &self.encoder
    }

    pub fn decoder(&self) -> &LazyPass {
        &self.decoder
    }
}

impl TextureConverter for NormalConverter {
    fn import_texture(&self, source: &Image) -> Result<Image, ConvertError> {
        let pass = self.encoder.get_or_resolve(self.context.shaders())?;
        self.context
            .convert(source, TextureSemanticType::Normal, None, Some(pass.as_ref()))
    }

    fn export_texture(&self, source: &Image) -> Result<Image, ConvertError> {
        let pass = self.decoder.get_or_resolve(self.context.shaders())?;
        self.context
            .convert(source, TextureSemanticType::Normal, None, Some(pass.as_ref()))
    }
}
