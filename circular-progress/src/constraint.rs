//! # Layout Constraints
//!
//! The host passes one [`DimensionValue`] per axis when it asks the progress
//! bar to measure itself.
//!
//! ### Fixed
//! The host has already decided the size:
//! ```
//! # use circular_progress::{DimensionValue, Px};
//! let exact = DimensionValue::Fixed(Px(120));
//! ```
//!
//! ### Wrap
//! The widget may size itself, within optional bounds:
//! ```
//! # use circular_progress::{DimensionValue, Px};
//! let at_most = DimensionValue::Wrap { min: None, max: Some(Px(200)) };
//! ```
//!
//! ### Fill
//! The widget should take the available space, within optional bounds:
//! ```
//! # use circular_progress::{DimensionValue, Px};
//! let fill = DimensionValue::Fill { min: Some(Px(48)), max: Some(Px(300)) };
//! ```

use crate::Px;

/// How a single dimension should be calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionValue {
    /// An exact size.
    Fixed(Px),
    /// Size to content within optional bounds.
    Wrap {
        /// Lower bound.
        min: Option<Px>,
        /// Upper bound.
        max: Option<Px>,
    },
    /// Fill the available space within optional bounds.
    Fill {
        /// Lower bound.
        min: Option<Px>,
        /// Upper bound.
        max: Option<Px>,
    },
}

impl Default for DimensionValue {
    fn default() -> Self {
        Self::WRAP
    }
}

impl DimensionValue {
    /// Unbounded wrap.
    pub const WRAP: Self = Self::Wrap {
        min: None,
        max: None,
    };

    /// Unbounded fill.
    pub const FILLED: Self = Self::Fill {
        min: None,
        max: None,
    };

    /// Resolves the dimension to a concrete size.
    ///
    /// Bounded dimensions take their upper bound; an unbounded dimension falls
    /// back to its lower bound and then to `suggested_minimum`. Negative sizes
    /// resolve to zero.
    pub fn resolve(self, suggested_minimum: Px) -> Px {
        let resolved = match self {
            DimensionValue::Fixed(px) => px,
            DimensionValue::Wrap { min, max } | DimensionValue::Fill { min, max } => {
                max.or(min).unwrap_or(suggested_minimum)
            }
        };
        resolved.max(Px::ZERO)
    }
}

/// Size produced by a measure pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComputedData {
    /// Measured width.
    pub width: Px,
    /// Measured height.
    pub height: Px,
}

impl ComputedData {
    /// Zero size.
    pub const ZERO: Self = Self {
        width: Px::ZERO,
        height: Px::ZERO,
    };
}
