//! # Density-Independent Pixels (Dp)
//!
//! Stroke widths of the progress bar are specified in [`Dp`] and converted to
//! physical pixels only when paints are resolved, so the ring keeps the same
//! physical thickness on low and high density screens.
//!
//! ## Scale Factor
//!
//! The conversion is controlled by the global [`SCALE_FACTOR`]. Hosts set it
//! once at startup with [`set_scale_factor`]; until then one dp is one pixel.
//!
//! ```
//! use circular_progress::Dp;
//!
//! let stroke = Dp(4.0);
//! let pixels = stroke.to_pixels_f32();
//! let back = Dp::from_pixels_f32(pixels);
//! assert_eq!(back, stroke);
//! ```

use std::{fmt, str::FromStr, sync::OnceLock};

use parking_lot::RwLock;

use crate::attributes::AttributeError;

/// Global scale factor for converting between density-independent pixels and
/// physical pixels.
///
/// The value is how many physical pixels correspond to one dp unit:
/// - Scale factor of 1.0: 1 dp = 1 pixel (mdpi)
/// - Scale factor of 2.0: 1 dp = 2 pixels (xhdpi)
/// - Scale factor of 3.0: 1 dp = 3 pixels (xxhdpi)
pub static SCALE_FACTOR: OnceLock<RwLock<f64>> = OnceLock::new();

/// Sets the global scale factor. Non-finite or non-positive values are ignored.
pub fn set_scale_factor(factor: f64) {
    if !factor.is_finite() || factor <= 0.0 {
        tracing::debug!(factor, "ignoring invalid scale factor");
        return;
    }
    let lock = SCALE_FACTOR.get_or_init(|| RwLock::new(1.0));
    *lock.write() = factor;
}

/// Returns the current global scale factor, 1.0 when it was never set.
pub fn scale_factor() -> f64 {
    SCALE_FACTOR.get().map(|lock| *lock.read()).unwrap_or(1.0)
}

/// Density-independent pixels (dp).
///
/// `Dp` wraps a single `f64`. Arithmetic is done on the inner value:
///
/// ```
/// use circular_progress::Dp;
///
/// let base = Dp(4.0);
/// let double = Dp(base.0 * 2.0);
/// assert_eq!(double, Dp(8.0));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dp(pub f64);

impl Dp {
    /// Zero dp.
    pub const ZERO: Dp = Dp(0.0);

    /// Creates a new `Dp` instance with the specified value.
    pub const fn new(value: f64) -> Self {
        Dp(value)
    }

    /// Converts this dp value to physical pixels as an `f64`.
    pub fn to_pixels_f64(&self) -> f64 {
        self.0 * scale_factor()
    }

    /// Creates a `Dp` value from physical pixels specified as an `f64`.
    pub fn from_pixels_f64(value: f64) -> Self {
        Dp(value / scale_factor())
    }

    /// Converts this dp value to physical pixels as an `f32`.
    ///
    /// Converting from `f64` to `f32` may lose precision for very large values.
    pub fn to_pixels_f32(&self) -> f32 {
        self.to_pixels_f64() as f32
    }

    /// Creates a `Dp` value from physical pixels specified as an `f32`.
    pub fn from_pixels_f32(value: f32) -> Self {
        Self::from_pixels_f64(value as f64)
    }

    /// Returns this value, or zero when it is negative or NaN.
    pub fn non_negative(self) -> Self {
        if self.0 > 0.0 { self } else { Dp::ZERO }
    }
}

impl From<f64> for Dp {
    fn from(value: f64) -> Self {
        Dp::new(value)
    }
}

impl fmt::Display for Dp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}dp", self.0)
    }
}

/// Parses dimension literals: `"6dp"`, `"6dip"`, `"12px"` or a bare number
/// (read as dp). Pixel literals are converted with the current scale factor.
impl FromStr for Dp {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || AttributeError::MalformedDimension(s.to_string());

        let (number, is_px) = if let Some(rest) = trimmed.strip_suffix("px") {
            (rest, true)
        } else if let Some(rest) = trimmed.strip_suffix("dip") {
            (rest, false)
        } else if let Some(rest) = trimmed.strip_suffix("dp") {
            (rest, false)
        } else {
            (trimmed, false)
        };

        let value: f64 = number.trim().parse().map_err(|_| malformed())?;
        if !value.is_finite() {
            return Err(malformed());
        }
        Ok(if is_px {
            Dp::from_pixels_f64(value)
        } else {
            Dp(value)
        })
    }
}
