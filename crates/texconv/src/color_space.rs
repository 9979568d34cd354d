//! Color spaces, sRGB transfer functions, and the process-wide sRGB-write flag.
//!
//! Render targets written during a copy pass consult a single process-wide
//! flag that decides whether linear values are gamma-encoded on write. The
//! flag is only ever changed through [`ColorSpaceScope`], which restores the
//! prior value when dropped, so every exit path (including `?` and panics)
//! puts it back.
//!
//! The flag lives behind a re-entrant lock. A scope holds the lock for its
//! whole lifetime: nested scopes on the same thread work, while a scope on
//! another thread waits until the outer one has restored the flag.

use std::cell::Cell;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use serde::{Deserialize, Serialize};

/// How 8-bit values stored in a texture are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    /// Stored values are physically linear quantities.
    #[default]
    Linear,
    /// Stored values are sRGB gamma-encoded.
    Srgb,
}

impl ColorSpace {
    /// Whether values in this space carry the sRGB curve.
    pub fn is_gamma_encoded(self) -> bool {
        matches!(self, ColorSpace::Srgb)
    }

    /// Decode a stored byte into a linear value in [0, 1].
    #[inline]
    pub fn decode(self, value: u8) -> f64 {
        match self {
            ColorSpace::Linear => value as f64 / 255.0,
            ColorSpace::Srgb => SRGB_TO_LINEAR_LUT[value as usize],
        }
    }
}

/// sRGB to linear (IEC 61966-2-1), input and output in [0, 1].
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear to sRGB (IEC 61966-2-1), input and output in [0, 1].
pub fn linear_to_srgb(v: f64) -> f64 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

static SRGB_TO_LINEAR_LUT: LazyLock<[f64; 256]> = LazyLock::new(|| {
    let mut lut = [0.0; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        *slot = srgb_to_linear(i as f64 / 255.0);
    }
    lut
});

static SRGB_WRITE: LazyLock<ReentrantMutex<Cell<bool>>> =
    LazyLock::new(|| ReentrantMutex::new(Cell::new(false)));

/// Current value of the process-wide sRGB-write flag.
///
/// Blocks while another thread holds a [`ColorSpaceScope`].
pub fn srgb_write_enabled() -> bool {
    SRGB_WRITE.lock().get()
}

/// Scoped override of the sRGB-write flag.
///
/// The prior value is captured on entry and written back on drop.
pub struct ColorSpaceScope {
    guard: ReentrantMutexGuard<'static, Cell<bool>>,
    prior: bool,
}

impl ColorSpaceScope {
    /// Set the flag to `srgb_write` until the returned scope is dropped.
    pub fn enter(srgb_write: bool) -> Self {
        let guard = SRGB_WRITE.lock();
        let prior = guard.replace(srgb_write);
        tracing::trace!(prior, srgb_write, "entered color space scope");
        Self { guard, prior }
    }

    /// Set the flag to match the given target color space.
    pub fn for_target(target: ColorSpace) -> Self {
        Self::enter(target.is_gamma_encoded())
    }

    /// The value the flag had before this scope was entered.
    pub fn prior(&self) -> bool {
        self.prior
    }
}

impl Drop for ColorSpaceScope {
    fn drop(&mut self) {
        self.guard.set(self.prior);
        tracing::trace!(restored = self.prior, "left color space scope");
    }
}
