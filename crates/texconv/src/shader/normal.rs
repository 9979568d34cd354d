//! Built-in normal map programs.
//!
//! Foreign normal maps store the tangent-space vector in RGB as
//! `n * 0.5 + 0.5`. Native normal maps use the two-channel AG layout:
//! `R = 1`, `G = y`, `B = y`, `A = x`, read back as `x = R * A`, `y = G`,
//! with `z` reconstructed from the unit-length constraint. Both sides are
//! +Y (OpenGL style), so green is never flipped.

use super::{ShaderPass, SourceView};
use crate::color::Color;

/// Registry name of the foreign-to-native program.
pub const NORMAL_MAP_ENCODER_PROGRAM: &str = "texconv/NormalMapEncoder";

/// Registry name of the native-to-foreign program.
pub const NORMAL_MAP_DECODER_PROGRAM: &str = "texconv/NormalMapDecoder";

#[inline]
fn unpack(v: f64) -> f64 {
    v * 2.0 - 1.0
}

#[inline]
fn pack(v: f64) -> f64 {
    v * 0.5 + 0.5
}

/// Packs an RGB tangent-space normal into the native AG layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalMapEncoder;

impl ShaderPass for NormalMapEncoder {
    fn name(&self) -> &str {
        NORMAL_MAP_ENCODER_PROGRAM
    }

    fn shade(&self, source: &SourceView<'_>, x: u32, y: u32) -> Color {
        let texel = source.texel(x, y);
        let (nx, ny, nz) = (unpack(texel.r), unpack(texel.g), unpack(texel.b));

        let len = (nx * nx + ny * ny + nz * nz).sqrt();
        let (nx, ny) = if len > 1e-6 {
            (nx / len, ny / len)
        } else {
            // Degenerate vector; treat as flat.
            (0.0, 0.0)
        };

        Color::rgba(1.0, pack(ny), pack(ny), pack(nx))
    }
}

/// Unpacks a native AG normal and writes the full RGB vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalMapDecoder;

impl ShaderPass for NormalMapDecoder {
    fn name(&self) -> &str {
        NORMAL_MAP_DECODER_PROGRAM
    }

    fn shade(&self, source: &SourceView<'_>, x: u32, y: u32) -> Color {
        let texel = source.texel(x, y);
        let nx = unpack(texel.r * texel.a);
        let ny = unpack(texel.g);
        let nz = (1.0 - (nx * nx + ny * ny).clamp(0.0, 1.0)).sqrt();

        Color::rgba(pack(nx), pack(ny), pack(nz), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use crate::color_space::ColorSpace;
    use crate::image::Image;

    fn shade_one(pass: &dyn ShaderPass, px: Rgba8) -> Rgba8 {
        let img = Image::new("n", 1, 1, px, ColorSpace::Linear);
        pass.shade(&SourceView::new(&img), 0, 0).to_rgba8()
    }

    #[test]
    fn test_flat_normal_encodes_to_center() {
        let out = shade_one(&NormalMapEncoder, Rgba8::new(128, 128, 255, 255));
        assert_eq!(out.r, 255);
        assert_eq!(out.g, 128);
        assert_eq!(out.b, 128);
        assert_eq!(out.a, 128);
    }

    #[test]
    fn test_flat_native_decodes_to_up() {
        let out = shade_one(&NormalMapDecoder, Rgba8::new(255, 128, 128, 128));
        assert_eq!(out.b, 255);
        assert_eq!(out.a, 255);
        assert!((out.r as i32 - 128).abs() <= 1);
        assert!((out.g as i32 - 128).abs() <= 1);
    }

    #[test]
    fn test_encoder_normalizes_input() {
        // (0, 0, 0) unpacks to (-1, -1, -1); normalized x = y = -1/sqrt(3).
        let out = shade_one(&NormalMapEncoder, Rgba8::new(0, 0, 0, 0));
        let expected = (pack(-1.0 / 3f64.sqrt()) * 255.0).round() as u8;
        assert_eq!(out.r, 255);
        assert_eq!(out.g, expected);
        assert_eq!(out.a, expected);
    }

    #[test]
    fn test_tilted_normal_roundtrips_within_quantization() {
        // n = normalize(0.6, -0.3, 0.74)
        let (x, y, z): (f64, f64, f64) = (0.6, -0.3, 0.74);
        let len = (x * x + y * y + z * z).sqrt();
        let packed = Color::rgb(pack(x / len), pack(y / len), pack(z / len)).to_rgba8();

        let native = shade_one(&NormalMapEncoder, packed);
        let back = shade_one(&NormalMapDecoder, native);

        for (a, b) in [(packed.r, back.r), (packed.g, back.g), (packed.b, back.b)] {
            assert!((a as i32 - b as i32).abs() <= 2, "{} vs {}", a, b);
        }
    }
}
