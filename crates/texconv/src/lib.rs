//! Texture channel conversion between glTF-style and engine-native PBR layouts.
//!
//! glTF keeps metallic in B and roughness in G, stores normals as full RGB
//! vectors, and puts occlusion in R. The native layout keeps metallic in R
//! with smoothness in A, stores normals in a two-channel AG encoding, and
//! puts occlusion in G. This crate rewrites textures between the two.
//!
//! Every conversion is two stages:
//!
//! 1. A **copy pass** writes the source into a scratch surface in the color
//!    space the texture type requires, optionally through a [`ShaderPass`].
//!    The process-wide sRGB-write flag is held by a [`ColorSpaceScope`] for
//!    the duration and restored on every exit path.
//! 2. A **per-pixel pass** rewrites each pixel with a pure
//!    [`ColorTransform`].
//!
//! The result is a new [`Image`] with the source's name and sampler
//! settings. The source is never modified.
//!
//! # Example
//!
//! ```
//! use texconv::{ColorSpace, Image, Rgba8, TextureConverter, TextureConverters};
//!
//! let converters = TextureConverters::new();
//! let gltf = Image::new("rough", 4, 4, Rgba8::new(0, 255, 200, 255), ColorSpace::Linear);
//!
//! let native = converters.metallic_roughness.import_texture(&gltf).unwrap();
//! assert_eq!(native.get(0, 0), Rgba8::new(200, 0, 0, 0));
//! ```
//!
//! # Determinism
//!
//! Per-pixel transforms are total over `[0, 255]^4` and pure, and the CPU
//! surface path is deterministic, so the same input always produces the
//! same bytes.

pub mod color;
pub mod color_space;
pub mod config;
pub mod convert;
pub mod converters;
pub mod copy_pass;
pub mod error;
pub mod image;
pub mod pixel_pass;
pub mod png;
pub mod sampler;
pub mod shader;
pub mod surface;
pub mod texture_type;

// Re-export main types for convenience
pub use color::{clamp_byte, Color, Rgba8};
pub use color_space::{srgb_write_enabled, ColorSpace, ColorSpaceScope};
pub use config::ConverterConfig;
pub use convert::{ConversionContext, Direction};
pub use converters::{
    MetallicRoughnessConverter, NormalConverter, OcclusionConverter, TextureConverter,
    TextureConverters,
};
pub use error::ConvertError;
pub use image::Image;
pub use pixel_pass::ColorTransform;
pub use crate::png::{PngConfig, PngError};
pub use sampler::{FilterMode, SamplerSettings, WrapMode};
pub use shader::{LazyPass, ShaderLibrary, ShaderPass, ShaderRegistry, SourceView};
pub use surface::{CpuSurfaceProvider, Surface, SurfaceDescriptor, SurfaceProvider};
pub use texture_type::TextureSemanticType;
