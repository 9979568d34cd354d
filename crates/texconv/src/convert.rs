//! Conversion dispatch: copy pass followed by an optional per-pixel pass.

use std::sync::Arc;

use crate::copy_pass;
use crate::error::ConvertError;
use crate::image::Image;
use crate::pixel_pass::{self, ColorTransform};
use crate::shader::{ShaderLibrary, ShaderPass, ShaderRegistry};
use crate::surface::{CpuSurfaceProvider, SurfaceProvider};
use crate::texture_type::TextureSemanticType;

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Foreign (glTF) layout to native engine layout.
    Import,
    /// Native engine layout to foreign (glTF) layout.
    Export,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Import => f.write_str("import"),
            Direction::Export => f.write_str("export"),
        }
    }
}

/// Collaborators shared by every converter: the surface provider used for
/// copies and the registry shader programs are resolved from.
#[derive(Clone)]
pub struct ConversionContext {
    surfaces: Arc<dyn SurfaceProvider>,
    shaders: Arc<dyn ShaderRegistry>,
}

impl Default for ConversionContext {
    fn default() -> Self {
        Self::new(
            Arc::new(CpuSurfaceProvider::new()),
            Arc::new(ShaderLibrary::with_builtins()),
        )
    }
}

impl ConversionContext {
    pub fn new(surfaces: Arc<dyn SurfaceProvider>, shaders: Arc<dyn ShaderRegistry>) -> Self {
        Self { surfaces, shaders }
    }

    pub fn surfaces(&self) -> &dyn SurfaceProvider {
        self.surfaces.as_ref()
    }

    pub fn shaders(&self) -> &dyn ShaderRegistry {
        self.shaders.as_ref()
    }

    /// Produce a converted copy of `texture`.
    ///
    /// The copy is written in the color space `texture_type` requires,
    /// through `shader_pass` when given, then every pixel is rewritten by
    /// `pixel_fn` when given. The source is never modified.
    pub fn convert(
        &self,
        texture: &Image,
        texture_type: TextureSemanticType,
        pixel_fn: Option<&dyn ColorTransform>,
        shader_pass: Option<&dyn ShaderPass>,
    ) -> Result<Image, ConvertError> {
        let target = texture_type.required_color_space();
        tracing::debug!(
            name = %texture.name,
            texture_type = %texture_type,
            width = texture.width,
            height = texture.height,
            color_space = ?target,
            shader = shader_pass.map(|p| p.name()),
            "converting texture"
        );

        let copied = copy_pass::copy(self.surfaces(), texture, target, shader_pass)
            .inspect_err(|e| {
                tracing::warn!(name = %texture.name, code = e.code(), "texture copy failed: {}", e);
            })?;

        Ok(match pixel_fn {
            Some(f) => pixel_pass::apply(copied, f),
            None => copied,
        })
    }
}

impl std::fmt::Debug for ConversionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionContext").finish_non_exhaustive()
    }
}
