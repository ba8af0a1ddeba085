//! Square bounds of the ring.
//!
//! The widget always measures to a square whose side is the smaller resolved
//! dimension, and strokes its circle inside a rectangle inset by half of the
//! thicker stroke so neither ring is clipped.
use crate::{ComputedData, DimensionValue, Px, paint::ArcRect};

/// Resolves both dimensions and returns the side of the square.
pub fn square_side(width: DimensionValue, height: DimensionValue, suggested_minimum: Px) -> Px {
    let width = width.resolve(suggested_minimum);
    let height = height.resolve(suggested_minimum);
    width.min(height)
}

/// Measured size for a square of `side`.
pub fn square(side: Px) -> ComputedData {
    ComputedData {
        width: side,
        height: side,
    }
}

/// Rectangle the rings are stroked in, for a square of `side` pixels.
///
/// Each edge is inset by `max(stroke_width, background_stroke_width) / 2`.
pub fn stroke_rect(side: Px, stroke_width: f32, background_stroke_width: f32) -> ArcRect {
    let high_stroke = stroke_width.max(background_stroke_width).max(0.0);
    let inset = high_stroke / 2.0;
    let side = side.to_f32();
    ArcRect::new(inset, inset, side - inset, side - inset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_takes_smaller_side() {
        let side = square_side(
            DimensionValue::Fixed(Px(300)),
            DimensionValue::Wrap {
                min: None,
                max: Some(Px(200)),
            },
            Px::ZERO,
        );
        assert_eq!(side, Px(200));
        assert_eq!(square(side), ComputedData {
            width: Px(200),
            height: Px(200),
        });
    }

    #[test]
    fn test_unbounded_uses_suggested_minimum() {
        let side = square_side(DimensionValue::FILLED, DimensionValue::Fixed(Px(90)), Px(40));
        assert_eq!(side, Px(40));
    }

    #[test]
    fn test_rect_is_inset_by_half_the_thicker_stroke() {
        let rect = stroke_rect(Px(100), 8.0, 4.0);
        assert_eq!(rect, ArcRect::new(4.0, 4.0, 96.0, 96.0));

        let rect = stroke_rect(Px(100), 2.0, 10.0);
        assert_eq!(rect, ArcRect::new(5.0, 5.0, 95.0, 95.0));
    }

    #[test]
    fn test_rect_without_strokes_spans_square() {
        assert_eq!(stroke_rect(Px(64), 0.0, 0.0), ArcRect::new(0.0, 0.0, 64.0, 64.0));
    }
}
