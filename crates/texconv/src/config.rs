//! Converter configuration.
//!
//! Loaded from JSON; every field has a default so `{}` is a valid config.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::convert::ConversionContext;
use crate::error::ConvertError;
use crate::shader::{ShaderLibrary, NORMAL_MAP_DECODER_PROGRAM, NORMAL_MAP_ENCODER_PROGRAM};
use crate::surface::CpuSurfaceProvider;

fn default_factor() -> f32 {
    1.0
}

fn default_encoder_program() -> String {
    NORMAL_MAP_ENCODER_PROGRAM.to_string()
}

fn default_decoder_program() -> String {
    NORMAL_MAP_DECODER_PROGRAM.to_string()
}

/// Settings shared by the converter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    /// Scale applied to roughness (import) and smoothness (export).
    #[serde(default = "default_factor")]
    pub smoothness_or_roughness_factor: f32,
    /// Program used to pack foreign normal maps into the native layout.
    #[serde(default = "default_encoder_program")]
    pub normal_encoder_program: String,
    /// Program used to unpack native normal maps into the foreign layout.
    #[serde(default = "default_decoder_program")]
    pub normal_decoder_program: String,
    /// Largest scratch surface, in pixels, the CPU provider will allocate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_surface_pixels: Option<u64>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            smoothness_or_roughness_factor: default_factor(),
            normal_encoder_program: default_encoder_program(),
            normal_decoder_program: default_decoder_program(),
            max_surface_pixels: None,
        }
    }
}

impl ConverterConfig {
    /// Parse from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConvertError::Configuration(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConvertError> {
        let f = self.smoothness_or_roughness_factor;
        if !f.is_finite() || f < 0.0 {
            return Err(ConvertError::Configuration(format!(
                "smoothness_or_roughness_factor must be finite and non-negative, got {}",
                f
            )));
        }
        if self.normal_encoder_program.is_empty() || self.normal_decoder_program.is_empty() {
            return Err(ConvertError::Configuration(
                "normal map program names must not be empty".to_string(),
            ));
        }
        if self.max_surface_pixels == Some(0) {
            return Err(ConvertError::Configuration(
                "max_surface_pixels must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build a context on the CPU surface provider and built-in programs.
    pub fn build_context(&self) -> ConversionContext {
        ConversionContext::new(
            Arc::new(CpuSurfaceProvider::new().with_max_pixels(self.max_surface_pixels)),
            Arc::new(ShaderLibrary::with_builtins()),
        )
    }
}
