//! End-to-end tests for the conversion pipeline: determinism, metadata
//! preservation, color-space flag restoration, and surface release.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use texconv::{
    srgb_write_enabled, Color, ColorSpace, ColorSpaceScope, ConversionContext, ConvertError,
    ConverterConfig, CpuSurfaceProvider, Direction, FilterMode, Image, Rgba8, SamplerSettings,
    ShaderLibrary, ShaderPass, SourceView, Surface, SurfaceDescriptor, SurfaceProvider,
    TextureConverter, TextureConverters, TextureSemanticType, WrapMode,
};

// ============================================================================
// Helpers
// ============================================================================

fn gray_mr(width: u32, height: u32) -> Image {
    Image::new("flat_gray", width, height, Rgba8::new(128, 128, 128, 255), ColorSpace::Linear)
        .with_sampler(
            SamplerSettings::default()
                .with_wrap(WrapMode::Clamp)
                .with_filter(FilterMode::Trilinear)
                .with_anisotropy(16)
                .with_mip_bias(-1.5),
        )
}

/// Pack a unit tangent-space normal as `n * 0.5 + 0.5` RGB.
fn packed_normal(x: f64, y: f64, z: f64) -> Rgba8 {
    let len = (x * x + y * y + z * z).sqrt();
    Color::rgb(
        x / len * 0.5 + 0.5,
        y / len * 0.5 + 0.5,
        z / len * 0.5 + 0.5,
    )
    .to_rgba8()
}

fn converters_over(provider: Arc<dyn SurfaceProvider>) -> TextureConverters {
    let context = ConversionContext::new(provider, Arc::new(ShaderLibrary::with_builtins()));
    TextureConverters::with_context(context, &ConverterConfig::default())
}

/// Surface provider whose surfaces fail to blit, wrapping a CPU provider so
/// allocation and release are still counted.
struct FailingBlitProvider {
    inner: CpuSurfaceProvider,
}

struct FailingSurface {
    _inner: Box<dyn Surface>,
}

impl Surface for FailingSurface {
    fn blit(&mut self, _source: &Image, _pass: Option<&dyn ShaderPass>) -> Result<(), ConvertError> {
        Err(ConvertError::ResourceExhaustion("device lost".into()))
    }

    fn read_back(&self) -> Result<Vec<Rgba8>, ConvertError> {
        Err(ConvertError::ResourceExhaustion("device lost".into()))
    }
}

impl SurfaceProvider for FailingBlitProvider {
    fn allocate(&self, desc: &SurfaceDescriptor) -> Result<Box<dyn Surface>, ConvertError> {
        Ok(Box::new(FailingSurface {
            _inner: self.inner.allocate(desc)?,
        }))
    }
}

/// Forwards to a shared CPU provider so a test can watch its live surface count.
struct SharedCpuProvider(Arc<CpuSurfaceProvider>);

impl SurfaceProvider for SharedCpuProvider {
    fn allocate(&self, desc: &SurfaceDescriptor) -> Result<Box<dyn Surface>, ConvertError> {
        self.0.allocate(desc)
    }
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_flat_gray_metallic_roundtrip_is_deterministic() {
    let converters = TextureConverters::new();
    let src = gray_mr(32, 32);

    let run = || {
        let native = converters.metallic_roughness.import_texture(&src).unwrap();
        converters.metallic_roughness.export_texture(&native).unwrap()
    };

    let first = run();
    for _ in 0..3 {
        assert_eq!(run(), first);
    }

    // roughness 128 -> smoothness 74 -> roughness 128
    let native = converters.metallic_roughness.import_texture(&src).unwrap();
    assert!(native.pixels.iter().all(|&p| p == Rgba8::new(128, 0, 0, 74)));
    assert!(first.pixels.iter().all(|&p| p == Rgba8::new(0, 128, 128, 255)));
}

#[test]
fn test_png_hash_is_stable_across_runs() {
    let converters = TextureConverters::new();
    let src = gray_mr(16, 16);
    let hash = || {
        let out = converters.metallic_roughness.import_texture(&src).unwrap();
        texconv::png::write_image_to_vec_with_hash(&out, &texconv::PngConfig::default())
            .unwrap()
            .1
    };
    assert_eq!(hash(), hash());
}

// ============================================================================
// Metadata preservation
// ============================================================================

#[test]
fn test_every_conversion_preserves_shape_and_sampler() {
    let converters = TextureConverters::new();
    let src = gray_mr(7, 3);

    for texture_type in TextureSemanticType::ALL {
        for direction in [Direction::Import, Direction::Export] {
            let out = converters.convert(&src, texture_type, direction).unwrap();
            assert_eq!(out.name, src.name);
            assert_eq!((out.width, out.height), (src.width, src.height));
            assert_eq!(out.pixels.len(), 21);
            assert_eq!(out.sampler, src.sampler);
            assert_eq!(out.color_space, texture_type.required_color_space());
        }
    }
}

// ============================================================================
// Color-space flag and resource release
// ============================================================================

#[test]
fn test_flag_unchanged_after_successful_convert() {
    let converters = TextureConverters::new();
    let src = gray_mr(4, 4);

    for prior in [false, true] {
        let _outer = ColorSpaceScope::enter(prior);
        for texture_type in TextureSemanticType::ALL {
            converters
                .convert(&src, texture_type, Direction::Import)
                .unwrap();
            assert_eq!(srgb_write_enabled(), prior);
        }
    }
}

#[test]
fn test_flag_unchanged_and_surface_released_after_failed_blit() {
    let provider = Arc::new(FailingBlitProvider {
        inner: CpuSurfaceProvider::new(),
    });
    let context =
        ConversionContext::new(provider.clone(), Arc::new(ShaderLibrary::with_builtins()));
    let converters = TextureConverters::with_context(context, &ConverterConfig::default());
    let src = gray_mr(4, 4);

    for prior in [false, true] {
        let _outer = ColorSpaceScope::enter(prior);
        let err = converters
            .convert(&src, TextureSemanticType::Color, Direction::Import)
            .unwrap_err();
        assert!(matches!(err, ConvertError::ResourceExhaustion(_)));
        assert_eq!(srgb_write_enabled(), prior);

        let err = converters.normal.export_texture(&src).unwrap_err();
        assert!(matches!(err, ConvertError::ResourceExhaustion(_)));
        assert_eq!(srgb_write_enabled(), prior);
    }
    assert_eq!(provider.inner.live_surfaces(), 0);
}

#[test]
fn test_surface_budget_failure_is_resource_exhaustion() {
    let config = ConverterConfig {
        max_surface_pixels: Some(8),
        ..ConverterConfig::default()
    };
    let converters = TextureConverters::from_config(&config).unwrap();

    let _outer = ColorSpaceScope::enter(true);
    let err = converters
        .occlusion
        .import_texture(&gray_mr(4, 4))
        .unwrap_err();
    assert_eq!(err.code(), "TEXCONV_003");
    assert!(srgb_write_enabled());

    // Within budget still works.
    assert!(converters.occlusion.import_texture(&gray_mr(2, 4)).is_ok());
}

#[test]
fn test_surfaces_released_after_success() {
    let provider = Arc::new(CpuSurfaceProvider::new());
    let converters = converters_over(Arc::new(SharedCpuProvider(provider.clone())));
    let src = gray_mr(8, 8);

    for texture_type in TextureSemanticType::ALL {
        converters
            .convert(&src, texture_type, Direction::Export)
            .unwrap();
        assert_eq!(provider.live_surfaces(), 0);
    }
}

#[test]
fn test_invalid_input_fails_without_allocating() {
    let provider = Arc::new(CpuSurfaceProvider::new());
    let converters = converters_over(Arc::new(SharedCpuProvider(provider.clone())));

    let mut src = gray_mr(4, 4);
    src.pixels.truncate(3);
    let err = converters.normal.import_texture(&src).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidInput(_)));

    let empty = Image::new("empty", 0, 4, Rgba8::gray(0), ColorSpace::Linear);
    let err = converters.metallic_roughness.export_texture(&empty).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidInput(_)));
    assert_eq!(provider.live_surfaces(), 0);
}

// ============================================================================
// Color space correctness
// ============================================================================

#[test]
fn test_srgb_tagged_source_is_linearized_for_data_textures() {
    let converters = TextureConverters::new();
    let src = Image::new("occ", 1, 1, Rgba8::new(128, 0, 0, 255), ColorSpace::Srgb);
    let out = converters.occlusion.import_texture(&src).unwrap();
    // sRGB 128 reads as linear ~0.216 -> byte 55
    assert_eq!(out.pixels[0], Rgba8::new(0, 55, 0, 255));
}

#[test]
fn test_color_textures_are_written_gamma_encoded() {
    let converters = TextureConverters::new();
    let src = Image::new("albedo", 1, 1, Rgba8::new(55, 55, 55, 55), ColorSpace::Linear);
    let out = converters
        .convert(&src, TextureSemanticType::Color, Direction::Import)
        .unwrap();
    assert_eq!(out.color_space, ColorSpace::Srgb);
    assert_eq!(out.pixels[0].r, 128);
    assert_eq!(out.pixels[0].a, 55);
}

// ============================================================================
// Shader passes
// ============================================================================

/// 3x3 box blur; needs neighboring texels, so it cannot be a per-pixel transform.
struct BoxBlur;

impl ShaderPass for BoxBlur {
    fn name(&self) -> &str {
        "test/BoxBlur"
    }

    fn shade(&self, source: &SourceView<'_>, x: u32, y: u32) -> Color {
        let mut sum = Color::rgba(0.0, 0.0, 0.0, 0.0);
        for dy in -1..=1i64 {
            for dx in -1..=1i64 {
                let t = source.texel_clamped(x as i64 + dx, y as i64 + dy);
                sum.r += t.r;
                sum.g += t.g;
                sum.b += t.b;
                sum.a += t.a;
            }
        }
        Color::rgba(sum.r / 9.0, sum.g / 9.0, sum.b / 9.0, sum.a / 9.0)
    }
}

#[test]
fn test_custom_shader_pass_sees_whole_image() {
    let context = ConversionContext::default();
    let mut src = Image::new("dot", 3, 3, Rgba8::new(0, 0, 0, 255), ColorSpace::Linear);
    src.set(1, 1, Rgba8::new(255, 255, 255, 255));

    let out = context
        .convert(&src, TextureSemanticType::Occlusion, None, Some(&BoxBlur))
        .unwrap();
    // The single white texel is spread over the whole 3x3 neighborhood.
    for px in &out.pixels {
        assert!(px.r > 0, "expected blur to reach every pixel");
        assert_eq!(px.a, 255);
    }
}

#[test]
fn test_registered_program_replaces_builtin_normal_encoder() {
    let mut library = ShaderLibrary::with_builtins();
    library.register_as("studio/NormalEncoder", Arc::new(BoxBlur));
    let context = ConversionContext::new(Arc::new(CpuSurfaceProvider::new()), Arc::new(library));
    let config = ConverterConfig {
        normal_encoder_program: "studio/NormalEncoder".into(),
        ..ConverterConfig::default()
    };
    let converters = TextureConverters::with_context(context, &config);

    let src = Image::new("n", 2, 2, Rgba8::new(10, 20, 30, 255), ColorSpace::Linear);
    let out = converters.normal.import_texture(&src).unwrap();
    assert_eq!(out.pixels, src.pixels);
    assert_eq!(converters.normal.encoder().program(), "studio/NormalEncoder");
}

#[test]
fn test_normal_roundtrip_through_native_layout() {
    let converters = TextureConverters::new();
    let mut src = Image::new("n", 4, 1, Rgba8::new(128, 128, 255, 255), ColorSpace::Linear);
    src.set(1, 0, packed_normal(0.5, 0.0, 0.8));
    src.set(2, 0, packed_normal(-0.3, -0.5, 0.9));
    src.set(3, 0, packed_normal(0.1, 0.7, 0.6));

    let native = converters.normal.import_texture(&src).unwrap();
    for px in &native.pixels {
        assert_eq!(px.r, 255);
        assert_eq!(px.g, px.b);
    }
    let back = converters.normal.export_texture(&native).unwrap();
    for (a, b) in src.pixels.iter().zip(&back.pixels) {
        assert!((a.r as i32 - b.r as i32).abs() <= 3, "{:?} vs {:?}", a, b);
        assert!((a.g as i32 - b.g as i32).abs() <= 3, "{:?} vs {:?}", a, b);
        assert!((a.b as i32 - b.b as i32).abs() <= 3, "{:?} vs {:?}", a, b);
        assert_eq!(b.a, 255);
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_conversions_agree() {
    let converters = Arc::new(TextureConverters::new());
    let src = Arc::new(gray_mr(16, 16));
    let expected = converters.normal.import_texture(&src).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let converters = Arc::clone(&converters);
            let src = Arc::clone(&src);
            std::thread::spawn(move || {
                let texture_type = TextureSemanticType::ALL[i % 4];
                let _ = converters.convert(&src, texture_type, Direction::Export).unwrap();
                converters.normal.import_texture(&src).unwrap()
            })
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
    assert!(!srgb_write_enabled());
}
