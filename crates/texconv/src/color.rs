//! Pixel and working-color types.

/// An 8-bit RGBA pixel as stored in a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Create a new pixel.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque gray pixel.
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value, 255)
    }

    /// Create from `[r, g, b, a]`.
    pub const fn from_array(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Convert to `[r, g, b, a]`.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(rgba: [u8; 4]) -> Self {
        Self::from_array(rgba)
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(px: Rgba8) -> Self {
        px.to_array()
    }
}

/// Quantize a float in byte units to a byte.
///
/// Clamps to [0, 255] and truncates toward zero. NaN maps to 0.
#[inline]
pub fn clamp_byte(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// RGBA color with f64 components, used as the working value inside a
/// copy pass. Components are nominally in [0.0, 1.0] and linear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    /// Create a new color with alpha = 1.0.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a new color with alpha.
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create a grayscale color.
    pub const fn gray(value: f64) -> Self {
        Self::rgb(value, value, value)
    }

    /// Clamp all components to [0.0, 1.0]. NaN becomes 0.0.
    pub fn clamp(&self) -> Color {
        fn unit(v: f64) -> f64 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        }
        Color {
            r: unit(self.r),
            g: unit(self.g),
            b: unit(self.b),
            a: unit(self.a),
        }
    }

    /// Convert to 8-bit RGBA without any transfer function.
    pub fn to_rgba8(&self) -> Rgba8 {
        let c = self.clamp();
        Rgba8::new(
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        )
    }

    /// Create from 8-bit RGBA without any transfer function.
    pub fn from_rgba8(px: Rgba8) -> Self {
        Self {
            r: px.r as f64 / 255.0,
            g: px.g as f64 / 255.0,
            b: px.b as f64 / 255.0,
            a: px.a as f64 / 255.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}
