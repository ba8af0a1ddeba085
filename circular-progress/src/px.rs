//! Physical pixel units used by measurement.
//!
//! [`Px`] is an integer pixel count, matching how host layout passes resolve
//! widget sizes. Geometry that needs sub-pixel precision (the stroke-inset
//! rectangle) is expressed in `f32` by [`ArcRect`](crate::paint::ArcRect).

use std::ops::{Add, Sub};

use crate::Dp;

/// A physical pixel coordinate or length.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Px(pub i32);

impl Px {
    /// Zero pixels.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Px` instance.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn raw(self) -> i32 {
        self.0
    }

    /// Converts to density-independent pixels using the global scale factor.
    pub fn to_dp(self) -> Dp {
        Dp::from_pixels_f64(self.0 as f64)
    }

    /// Creates a `Px` from a dp value using the global scale factor.
    pub fn from_dp(dp: Dp) -> Self {
        Self::saturating_from_f32(dp.to_pixels_f32())
    }

    /// Converts to `f32`.
    pub fn to_f32(self) -> f32 {
        self.0 as f32
    }

    /// Converts from `f32`, truncating toward zero and saturating at the `i32`
    /// bounds. NaN maps to zero.
    pub fn saturating_from_f32(value: f32) -> Self {
        // `as` casts from float saturate and map NaN to 0.
        Self(value as i32)
    }

    /// Saturating addition.
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Px {
    type Output = Px;

    fn add(self, rhs: Self) -> Self::Output {
        Px(self.0 + rhs.0)
    }
}

impl Sub for Px {
    type Output = Px;

    fn sub(self, rhs: Self) -> Self::Output {
        Px(self.0 - rhs.0)
    }
}

impl From<i32> for Px {
    fn from(value: i32) -> Self {
        Px(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_px_arithmetic() {
        assert_eq!(Px(10) + Px(5), Px(15));
        assert_eq!(Px(10) - Px(5), Px(5));
    }

    #[test]
    fn test_saturating_from_f32() {
        assert_eq!(Px::saturating_from_f32(f32::MAX), Px(i32::MAX));
        assert_eq!(Px::saturating_from_f32(f32::MIN), Px(i32::MIN));
        assert_eq!(Px::saturating_from_f32(100.5), Px(100));
        assert_eq!(Px::saturating_from_f32(-100.5), Px(-100));
        assert_eq!(Px::saturating_from_f32(f32::NAN), Px::ZERO);
    }

    #[test]
    fn test_saturating_arithmetic() {
        assert_eq!(Px(i32::MAX).saturating_add(Px(1)), Px(i32::MAX));
        assert_eq!(Px(i32::MIN).saturating_sub(Px(1)), Px(i32::MIN));
    }
}
