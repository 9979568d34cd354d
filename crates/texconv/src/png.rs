//! PNG reading and deterministic PNG writing for [`Image`]s.
//!
//! The writer uses fixed encoder settings so the same image always encodes
//! to the same bytes. PNG carries no sampler state; images read here get
//! default sampler settings.

use std::io::{Read, Write};
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Decoder, Encoder, FilterType, Transformations};
use thiserror::Error;

use crate::color::Rgba8;
use crate::color_space::ColorSpace;
use crate::image::Image;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("PNG decoding error: {0}")]
    Decoding(#[from] png::DecodingError),

    #[error("Unsupported PNG format: {0}")]
    Unsupported(String),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

impl PngConfig {
    /// Smaller files, still deterministic.
    pub fn best_compression() -> Self {
        Self {
            compression: Compression::Best,
            filter: FilterType::Paeth,
        }
    }
}

/// Decode a PNG into an RGBA8 image.
///
/// Palette and 16-bit images are expanded/stripped to 8-bit; gray and
/// gray-alpha are widened to RGBA.
pub fn read_image<R: Read>(
    reader: R,
    name: impl Into<String>,
    color_space: ColorSpace,
) -> Result<Image, PngError> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut png_reader = decoder.read_info()?;

    let mut buf = vec![0u8; png_reader.output_buffer_size()];
    let info = png_reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != BitDepth::Eight {
        return Err(PngError::Unsupported(format!(
            "bit depth {:?}",
            info.bit_depth
        )));
    }

    let pixels: Vec<Rgba8> = match info.color_type {
        ColorType::Rgba => buf
            .chunks_exact(4)
            .map(|c| Rgba8::new(c[0], c[1], c[2], c[3]))
            .collect(),
        ColorType::Rgb => buf
            .chunks_exact(3)
            .map(|c| Rgba8::new(c[0], c[1], c[2], 255))
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .map(|c| Rgba8::new(c[0], c[0], c[0], c[1]))
            .collect(),
        ColorType::Grayscale => buf.iter().map(|&v| Rgba8::gray(v)).collect(),
        ColorType::Indexed => {
            return Err(PngError::Unsupported("indexed color after expansion".into()))
        }
    };

    Ok(Image {
        name: name.into(),
        width: info.width,
        height: info.height,
        pixels,
        color_space,
        sampler: Default::default(),
    })
}

/// Read a PNG file. The image is named after the file stem.
pub fn read_image_file(path: &Path, color_space: ColorSpace) -> Result<Image, PngError> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = std::fs::File::open(path)?;
    read_image(std::io::BufReader::new(file), name, color_space)
}

/// Write an image as RGBA8 PNG to any writer.
///
/// An sRGB-tagged image gets an sRGB chunk; a linear one gets none.
pub fn write_image<W: Write>(image: &Image, writer: W, config: &PngConfig) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, image.width, image.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);
    if image.color_space.is_gamma_encoded() {
        encoder.set_srgb(png::SrgbRenderingIntent::Perceptual);
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&image.to_rgba8_bytes())?;

    Ok(())
}

/// Write an image to a PNG file.
pub fn write_image_file(image: &Image, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_image(image, std::io::BufWriter::new(file), config)
}

/// Compute the BLAKE3 hash of PNG data.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode to a Vec<u8> and return the data with its hash.
pub fn write_image_to_vec_with_hash(
    image: &Image,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_image(image, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Image {
        let mut img = Image::new("p", 8, 8, Rgba8::gray(0), ColorSpace::Linear);
        for y in 0..8 {
            for x in 0..8 {
                img.set(x, y, Rgba8::new((x * 32) as u8, (y * 32) as u8, 7, 200));
            }
        }
        img
    }

    #[test]
    fn test_write_is_deterministic() {
        let img = pattern();
        let config = PngConfig::default();
        let (a, ha) = write_image_to_vec_with_hash(&img, &config).unwrap();
        let (b, hb) = write_image_to_vec_with_hash(&img, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(ha, hb);
    }

    #[test]
    fn test_write_then_read_preserves_pixels() {
        let img = pattern();
        let (data, _) = write_image_to_vec_with_hash(&img, &PngConfig::best_compression()).unwrap();
        let back = read_image(std::io::Cursor::new(data), "p", ColorSpace::Linear).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_read_rgb_and_gray_widen_to_rgba() {
        let mut data = Vec::new();
        {
            let mut encoder = Encoder::new(&mut data, 2, 1);
            encoder.set_color(ColorType::Grayscale);
            encoder.set_depth(BitDepth::Eight);
            let mut w = encoder.write_header().unwrap();
            w.write_image_data(&[10, 250]).unwrap();
        }
        let img = read_image(std::io::Cursor::new(data), "g", ColorSpace::Srgb).unwrap();
        assert_eq!(img.pixels, vec![Rgba8::gray(10), Rgba8::gray(250)]);
        assert_eq!(img.color_space, ColorSpace::Srgb);

        let mut data = Vec::new();
        {
            let mut encoder = Encoder::new(&mut data, 1, 1);
            encoder.set_color(ColorType::Rgb);
            encoder.set_depth(BitDepth::Eight);
            let mut w = encoder.write_header().unwrap();
            w.write_image_data(&[1, 2, 3]).unwrap();
        }
        let img = read_image(std::io::Cursor::new(data), "rgb", ColorSpace::Linear).unwrap();
        assert_eq!(img.pixels, vec![Rgba8::new(1, 2, 3, 255)]);
    }

    #[test]
    fn test_file_roundtrip_uses_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rough.png");
        write_image_file(&pattern(), &path, &PngConfig::default()).unwrap();
        let img = read_image_file(&path, ColorSpace::Linear).unwrap();
        assert_eq!(img.name, "rough");
        assert_eq!(img.pixels, pattern().pixels);
    }
}
