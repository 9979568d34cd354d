//! Color-space correct copy of an image into a new buffer.

use crate::color_space::{ColorSpace, ColorSpaceScope};
use crate::error::ConvertError;
use crate::image::Image;
use crate::shader::ShaderPass;
use crate::surface::{SurfaceDescriptor, SurfaceProvider};

/// Copy `source` into a fresh image tagged `target`.
///
/// The sRGB-write flag is set to match `target` for the duration of the
/// copy and restored on every exit path. The scratch surface is released
/// before this returns. Name and sampler settings are carried over.
pub fn copy(
    provider: &dyn SurfaceProvider,
    source: &Image,
    target: ColorSpace,
    pass: Option<&dyn ShaderPass>,
) -> Result<Image, ConvertError> {
    source.validate()?;

    let pixels = {
        let _scope = ColorSpaceScope::for_target(target);
        let mut surface = provider.allocate(&SurfaceDescriptor {
            width: source.width,
            height: source.height,
            color_space: target,
        })?;
        surface.blit(source, pass)?;
        surface.read_back()?
    };

    if pixels.len() != source.pixel_count() {
        return Err(ConvertError::InvalidInput(format!(
            "surface returned {} pixels for {}x{} copy",
            pixels.len(),
            source.width,
            source.height
        )));
    }

    Ok(Image {
        name: source.name.clone(),
        width: source.width,
        height: source.height,
        pixels,
        color_space: target,
        sampler: source.sampler,
    })
}
