//! Scratch render surfaces used by the copy pass.
//!
//! A [`SurfaceProvider`] hands out [`Surface`]s sized for one copy. The copy
//! pass blits the source into the surface (optionally through a shader
//! pass) and reads the result back. Surfaces release their storage on drop.
//!
//! [`CpuSurfaceProvider`] is the built-in software implementation. Its
//! write path honours the process-wide sRGB-write flag the same way a GPU
//! render target would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::color::{Color, Rgba8};
use crate::color_space::{linear_to_srgb, srgb_write_enabled, ColorSpace};
use crate::error::ConvertError;
use crate::image::Image;
use crate::shader::{ShaderPass, SourceView};

/// Requested surface shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub width: u32,
    pub height: u32,
    /// Color space the result will be tagged with.
    pub color_space: ColorSpace,
}

impl SurfaceDescriptor {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A scratch render target.
pub trait Surface {
    /// Draw `source` into this surface, optionally through `pass`.
    fn blit(&mut self, source: &Image, pass: Option<&dyn ShaderPass>) -> Result<(), ConvertError>;

    /// Read the surface contents back as 8-bit pixels.
    fn read_back(&self) -> Result<Vec<Rgba8>, ConvertError>;
}

/// Allocates scratch surfaces.
pub trait SurfaceProvider: Send + Sync {
    fn allocate(&self, desc: &SurfaceDescriptor) -> Result<Box<dyn Surface>, ConvertError>;
}

/// Software surface provider.
#[derive(Debug, Default)]
pub struct CpuSurfaceProvider {
    max_pixels: Option<u64>,
    live: Arc<AtomicUsize>,
}

impl CpuSurfaceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse allocations larger than `max_pixels`.
    pub fn with_max_pixels(mut self, max_pixels: Option<u64>) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Number of surfaces currently alive.
    pub fn live_surfaces(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl SurfaceProvider for CpuSurfaceProvider {
    fn allocate(&self, desc: &SurfaceDescriptor) -> Result<Box<dyn Surface>, ConvertError> {
        let pixels = desc.pixel_count();
        if let Some(max) = self.max_pixels {
            if pixels > max {
                return Err(ConvertError::ResourceExhaustion(format!(
                    "surface of {}x{} exceeds budget of {} pixels",
                    desc.width, desc.height, max
                )));
            }
        }
        let len = usize::try_from(pixels).map_err(|_| {
            ConvertError::ResourceExhaustion(format!(
                "surface of {}x{} is not addressable",
                desc.width, desc.height
            ))
        })?;

        self.live.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(width = desc.width, height = desc.height, "allocated cpu surface");
        Ok(Box::new(CpuSurface {
            desc: *desc,
            data: vec![Rgba8::default(); len],
            live: Arc::clone(&self.live),
        }))
    }
}

struct CpuSurface {
    desc: SurfaceDescriptor,
    data: Vec<Rgba8>,
    live: Arc<AtomicUsize>,
}

impl CpuSurface {
    fn encode(color: Color, srgb_write: bool) -> Rgba8 {
        let c = color.clamp();
        if !srgb_write {
            return c.to_rgba8();
        }
        Color::rgba(
            linear_to_srgb(c.r),
            linear_to_srgb(c.g),
            linear_to_srgb(c.b),
            c.a,
        )
        .to_rgba8()
    }
}

impl Surface for CpuSurface {
    fn blit(&mut self, source: &Image, pass: Option<&dyn ShaderPass>) -> Result<(), ConvertError> {
        if source.width != self.desc.width || source.height != self.desc.height {
            return Err(ConvertError::InvalidInput(format!(
                "cannot blit {}x{} into {}x{} surface",
                source.width, source.height, self.desc.width, self.desc.height
            )));
        }

        let srgb_write = srgb_write_enabled();
        let view = SourceView::new(source);
        let width = self.desc.width;

        for y in 0..self.desc.height {
            for x in 0..width {
                let color = match pass {
                    Some(pass) => pass.shade(&view, x, y),
                    None => view.texel(x, y),
                };
                let idx = y as usize * width as usize + x as usize;
                self.data[idx] = Self::encode(color, srgb_write);
            }
        }
        Ok(())
    }

    fn read_back(&self) -> Result<Vec<Rgba8>, ConvertError> {
        Ok(self.data.clone())
    }
}

impl Drop for CpuSurface {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(
            width = self.desc.width,
            height = self.desc.height,
            "released cpu surface"
        );
    }
}
