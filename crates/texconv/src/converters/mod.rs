//! Channel converters between the foreign (glTF) and native texture layouts.
//!
//! Each converter knows one [`TextureSemanticType`] and exposes exactly two
//! operations: import (foreign to native) and export (native to foreign).

mod metallic_roughness;
mod normal;
mod occlusion;

pub use metallic_roughness::MetallicRoughnessConverter;
pub use normal::NormalConverter;
pub use occlusion::OcclusionConverter;

use crate::config::ConverterConfig;
use crate::convert::{ConversionContext, Direction};
use crate::error::ConvertError;
use crate::image::Image;
use crate::texture_type::TextureSemanticType;

/// A two-way texture converter.
pub trait TextureConverter {
    /// Foreign layout to native layout.
    fn import_texture(&self, source: &Image) -> Result<Image, ConvertError>;

    /// Native layout to foreign layout.
    fn export_texture(&self, source: &Image) -> Result<Image, ConvertError>;
}

/// The full converter set sharing one conversion context.
#[derive(Debug)]
pub struct TextureConverters {
    context: ConversionContext,
    pub metallic_roughness: MetallicRoughnessConverter,
    pub normal: NormalConverter,
    pub occlusion: OcclusionConverter,
}

impl TextureConverters {
    /// Build converters with default settings on the built-in CPU path.
    pub fn new() -> Self {
        Self::with_context(ConversionContext::default(), &ConverterConfig::default())
    }

    /// Build converters from a configuration on the built-in CPU path.
    pub fn from_config(config: &ConverterConfig) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self::with_context(config.build_context(), config))
    }

    /// Build converters over an explicit context.
    pub fn with_context(context: ConversionContext, config: &ConverterConfig) -> Self {
        Self {
            metallic_roughness: MetallicRoughnessConverter::new(
                context.clone(),
                config.smoothness_or_roughness_factor,
            ),
            normal: NormalConverter::with_programs(
                context.clone(),
                &config.normal_encoder_program,
                &config.normal_decoder_program,
            ),
            occlusion: OcclusionConverter::new(context.clone()),
            context,
        }
    }

    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    /// Converter for a semantic type, if that type needs channel conversion.
    pub fn for_type(&self, texture_type: TextureSemanticType) -> Option<&dyn TextureConverter> {
        match texture_type {
            TextureSemanticType::Metallic => Some(&self.metallic_roughness),
            TextureSemanticType::Normal => Some(&self.normal),
            TextureSemanticType::Occlusion => Some(&self.occlusion),
            TextureSemanticType::Color => None,
        }
    }

    /// Convert `source` of the given type in the given direction.
    ///
    /// Types without a channel converter are still copied into their
    /// required color space.
    pub fn convert(
        &self,
        source: &Image,
        texture_type: TextureSemanticType,
        direction: Direction,
    ) -> Result<Image, ConvertError> {
        match (self.for_type(texture_type), direction) {
            (Some(c), Direction::Import) => c.import_texture(source),
            (Some(c), Direction::Export) => c.export_texture(source),
            (None, _) => self.context.convert(source, texture_type, None, None),
        }
    }
}

impl Default for TextureConverters {
    fn default() -> Self {
        Self::new()
    }
}
