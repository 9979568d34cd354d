//! Sampler metadata carried alongside texture pixels.
//!
//! Conversions never alter how a texture is sampled; these settings are
//! copied verbatim from source to result.

use serde::{Deserialize, Serialize};

/// Texture coordinate wrapping behavior for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Repeat,
    Clamp,
    Mirror,
    MirrorOnce,
}

/// Texel filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Point,
    #[default]
    Bilinear,
    Trilinear,
}

/// Sampler state of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub wrap_w: WrapMode,
    pub filter: FilterMode,
    /// Anisotropic filtering level (0 = off).
    pub anisotropy: u32,
    /// Mip-map LOD bias.
    pub mip_bias: f32,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            wrap_w: WrapMode::Repeat,
            filter: FilterMode::Bilinear,
            anisotropy: 1,
            mip_bias: 0.0,
        }
    }
}

impl SamplerSettings {
    /// Set the same wrap mode on every axis.
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap_u = wrap;
        self.wrap_v = wrap;
        self.wrap_w = wrap;
        self
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the anisotropy level.
    pub fn with_anisotropy(mut self, anisotropy: u32) -> Self {
        self.anisotropy = anisotropy;
        self
    }

    /// Set the mip-map bias.
    pub fn with_mip_bias(mut self, mip_bias: f32) -> Self {
        self.mip_bias = mip_bias;
        self
    }
}
