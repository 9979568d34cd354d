//! Semantic texture types and the color space each one requires.

use serde::{Deserialize, Serialize};

use crate::color_space::ColorSpace;

/// Which channel convention a texture follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureSemanticType {
    /// Base color or emission; perceptual data.
    Color,
    /// Metallic/roughness (foreign) or metallic/smoothness (native).
    Metallic,
    /// Tangent-space normal map.
    Normal,
    /// Ambient occlusion.
    Occlusion,
}

impl TextureSemanticType {
    /// All known types.
    pub const ALL: [TextureSemanticType; 4] = [
        TextureSemanticType::Color,
        TextureSemanticType::Metallic,
        TextureSemanticType::Normal,
        TextureSemanticType::Occlusion,
    ];

    /// The color space the GPU must use to read this data correctly.
    ///
    /// Only perceptual color is gamma-encoded. Normals, metallic/roughness
    /// and occlusion are stored in 8-bit textures but are not brightness.
    pub fn required_color_space(self) -> ColorSpace {
        match self {
            TextureSemanticType::Color => ColorSpace::Srgb,
            TextureSemanticType::Metallic
            | TextureSemanticType::Normal
            | TextureSemanticType::Occlusion => ColorSpace::Linear,
        }
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            TextureSemanticType::Color => "color",
            TextureSemanticType::Metallic => "metallic",
            TextureSemanticType::Normal => "normal",
            TextureSemanticType::Occlusion => "occlusion",
        }
    }
}

impl std::fmt::Display for TextureSemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TextureSemanticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextureSemanticType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown texture type '{}'", s))
    }
}
