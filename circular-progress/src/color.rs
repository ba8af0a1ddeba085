//! RGBA color used by the ring paints.
//!
//! Values are stored as `f32` channels. Host toolkits that exchange colors as
//! packed 32-bit ARGB integers use [`Color::from_argb_u32`] and
//! [`Color::to_argb_u32`].
use std::str::FromStr;

/// Errors from parsing a color literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// The literal does not start with `#`.
    #[error("color literal `{0}` must start with '#'")]
    MissingHash(String),
    /// The literal has a length other than `#RRGGBB` or `#AARRGGBB`.
    #[error("color literal `{0}` must be #RRGGBB or #AARRGGBB")]
    InvalidLength(String),
    /// The literal contains non-hex digits.
    #[error("color literal `{0}` contains non-hex digits")]
    InvalidDigit(String),
}

/// A color with an alpha component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black, the default foreground ring color.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque gray `#FF888888`, the default background ring color.
    pub const GRAY: Color = Color::new(136.0 / 255.0, 136.0 / 255.0, 136.0 / 255.0, 1.0);

    /// Creates a new `Color` from four `f32` values (red, green, blue, alpha).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new `Color` from four `u8` values (red, green, blue, alpha).
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Creates a color from a packed `0xAARRGGBB` value.
    pub fn from_argb_u32(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::from_rgba_u8(r, g, b, a)
    }

    /// Packs the color into `0xAARRGGBB`, rounding each channel.
    pub fn to_argb_u32(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        u32::from_be_bytes([
            channel(self.a),
            channel(self.r),
            channel(self.g),
            channel(self.b),
        ])
    }

    /// Returns a copy with the alpha channel replaced.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: alpha, ..self }
    }

    /// Scales the alpha channel by `factor` (clamped to `0.0..=1.0`),
    /// rounding to the nearest 8-bit step.
    pub fn adjust_alpha(self, factor: f32) -> Self {
        let alpha = (self.a * 255.0 * factor.clamp(0.0, 1.0)).round() / 255.0;
        self.with_alpha(alpha)
    }
}

impl Default for Color {
    #[inline]
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl From<u32> for Color {
    fn from(argb: u32) -> Self {
        Self::from_argb_u32(argb)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_argb_u32()
    }
}

/// Parses `#RRGGBB` (opaque) or `#AARRGGBB`.
impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(s.to_string()))?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ColorParseError::InvalidDigit(s.to_string()))?;
        match hex.len() {
            6 => Ok(Self::from_argb_u32(0xFF00_0000 | value)),
            8 => Ok(Self::from_argb_u32(value)),
            _ => Err(ColorParseError::InvalidLength(s.to_string())),
        }
    }
}
