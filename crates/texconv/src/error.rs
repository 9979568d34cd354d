//! Error types for texture conversion.

use thiserror::Error;

use crate::png::PngError;

/// Errors from texture conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A shader program could not be resolved, or the configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The source image is malformed (zero dimensions, wrong buffer length).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A scratch surface could not be allocated.
    #[error("Resource exhaustion: {0}")]
    ResourceExhaustion(String),

    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Stable error code for diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::Configuration(_) => "TEXCONV_001",
            ConvertError::InvalidInput(_) => "TEXCONV_002",
            ConvertError::ResourceExhaustion(_) => "TEXCONV_003",
            ConvertError::Png(_) => "TEXCONV_004",
            ConvertError::Io(_) => "TEXCONV_005",
        }
    }

    /// Error category.
    pub fn category(&self) -> &'static str {
        match self {
            ConvertError::Png(_) | ConvertError::Io(_) => "io",
            _ => "texture",
        }
    }
}
