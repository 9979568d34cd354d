//! Per-pixel transform pass.

use crate::color::Rgba8;
use crate::image::Image;

/// A pure mapping from one pixel to one pixel.
///
/// Implemented for every `Fn(Rgba8) -> Rgba8`. Transforms must not depend
/// on call order or neighboring pixels.
pub trait ColorTransform {
    fn transform(&self, px: Rgba8) -> Rgba8;
}

impl<F> ColorTransform for F
where
    F: Fn(Rgba8) -> Rgba8,
{
    #[inline]
    fn transform(&self, px: Rgba8) -> Rgba8 {
        self(px)
    }
}

/// Replace every pixel of `image` with `transform(pixel)`.
///
/// Dimensions, color space and sampler settings are untouched.
pub fn apply(mut image: Image, transform: &dyn ColorTransform) -> Image {
    for px in image.pixels.iter_mut() {
        *px = transform.transform(*px);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_space::ColorSpace;

    #[test]
    fn test_apply_visits_every_pixel() {
        let mut img = Image::new("t", 3, 2, Rgba8::gray(0), ColorSpace::Srgb);
        for (i, px) in img.pixels.iter_mut().enumerate() {
            *px = Rgba8::new(i as u8, 0, 0, 255);
        }
        let sampler = img.sampler;

        let out = apply(img, &|px: Rgba8| Rgba8::new(px.a, px.r, px.g, px.b));

        assert_eq!(out.color_space, ColorSpace::Srgb);
        assert_eq!(out.sampler, sampler);
        assert_eq!((out.width, out.height), (3, 2));
        for (i, px) in out.pixels.iter().enumerate() {
            assert_eq!(*px, Rgba8::new(255, i as u8, 0, 0));
        }
    }
}
