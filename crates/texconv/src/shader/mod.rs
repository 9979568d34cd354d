//! Shader passes: full-image transforms run during a copy pass.
//!
//! A pass is looked up by name in a [`ShaderRegistry`]. Converters that need
//! one hold a [`LazyPass`], which resolves the program on first use and keeps
//! the resolved pass for the converter's lifetime.

mod normal;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::color::Color;
use crate::error::ConvertError;
use crate::image::Image;

pub use normal::{
    NormalMapDecoder, NormalMapEncoder, NORMAL_MAP_DECODER_PROGRAM, NORMAL_MAP_ENCODER_PROGRAM,
};

/// Read access to the source image of a copy, decoded to linear values.
#[derive(Clone, Copy)]
pub struct SourceView<'a> {
    image: &'a Image,
}

impl<'a> SourceView<'a> {
    pub fn new(image: &'a Image) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Fetch a texel, decoding RGB through the source color space.
    /// Alpha is always linear.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> Color {
        let px = self.image.get(x, y);
        let cs = self.image.color_space;
        Color::rgba(
            cs.decode(px.r),
            cs.decode(px.g),
            cs.decode(px.b),
            px.a as f64 / 255.0,
        )
    }

    /// Fetch a texel with clamped coordinates.
    pub fn texel_clamped(&self, x: i64, y: i64) -> Color {
        let cx = x.clamp(0, self.image.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.image.height as i64 - 1) as u32;
        self.texel(cx, cy)
    }
}

/// A full-image transform applied while a copy is written.
///
/// Implementations receive the whole source and may read any texel when
/// producing the output at `(x, y)`. The returned color is linear; the copy
/// pass applies the output transfer function.
pub trait ShaderPass: Send + Sync {
    /// Program name this pass was registered under.
    fn name(&self) -> &str;

    /// Compute the output color at `(x, y)`.
    fn shade(&self, source: &SourceView<'_>, x: u32, y: u32) -> Color;
}

impl fmt::Debug for dyn ShaderPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderPass").field("name", &self.name()).finish()
    }
}

/// Resolves named transform programs to pass objects.
pub trait ShaderRegistry: Send + Sync {
    fn resolve(&self, name: &str) -> Option<Arc<dyn ShaderPass>>;
}

/// In-memory program registry.
#[derive(Default)]
pub struct ShaderLibrary {
    programs: HashMap<String, Arc<dyn ShaderPass>>,
}

impl ShaderLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library containing the built-in normal map programs.
    pub fn with_builtins() -> Self {
        let mut library = Self::new();
        library.register(Arc::new(NormalMapEncoder));
        library.register(Arc::new(NormalMapDecoder));
        library
    }

    /// Register a pass under its own name, replacing any previous entry.
    pub fn register(&mut self, pass: Arc<dyn ShaderPass>) {
        self.register_as(pass.name().to_string(), pass);
    }

    /// Register a pass under an explicit name.
    pub fn register_as(&mut self, name: impl Into<String>, pass: Arc<dyn ShaderPass>) {
        self.programs.insert(name.into(), pass);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.programs.contains_key(name)
    }
}

impl ShaderRegistry for ShaderLibrary {
    fn resolve(&self, name: &str) -> Option<Arc<dyn ShaderPass>> {
        self.programs.get(name).cloned()
    }
}

/// A pass resolved on first use and cached afterwards.
///
/// Resolution happens under a lock, so concurrent first uses construct the
/// pass once. A failed lookup is not cached.
pub struct LazyPass {
    program: String,
    slot: Mutex<Option<Arc<dyn ShaderPass>>>,
}

impl LazyPass {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            slot: Mutex::new(None),
        }
    }

    /// Name of the program this slot resolves.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the pass has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Return the cached pass, resolving it through `registry` if needed.
    pub fn get_or_resolve(
        &self,
        registry: &dyn ShaderRegistry,
    ) -> Result<Arc<dyn ShaderPass>, ConvertError> {
        let mut slot = self.slot.lock();
        if let Some(pass) = slot.as_ref() {
            return Ok(Arc::clone(pass));
        }

        let pass = registry.resolve(&self.program).ok_or_else(|| {
            ConvertError::Configuration(format!("shader program '{}' not found", self.program))
        })?;
        tracing::debug!(program = %self.program, "resolved shader program");
        *slot = Some(Arc::clone(&pass));
        Ok(pass)
    }
}

impl fmt::Debug for LazyPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyPass")
            .field("program", &self.program)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
