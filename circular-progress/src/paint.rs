//! Paints and the drawing primitive contract.
//!
//! The progress bar never rasterises anything. It resolves two [`Paint`]s and
//! an [`ArcRect`] and hands them to a host [`Canvas`]: the background ring as
//! an oval, then the foreground as an arc.
use crate::Color;

/// Rectangle bounding the stroked circle, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ArcRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl ArcRect {
    /// Empty rectangle at the origin.
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    /// Creates a rectangle from its edges.
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Center point.
    pub fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// Stroke cap used for arc ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeCap {
    /// Flat stroke ends.
    #[default]
    Butt,
    /// Rounded stroke ends.
    Round,
}

/// Axis along which a two-color gradient runs across the measured square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum GradientDirection {
    /// Start color on the left edge.
    #[default]
    LeftToRight,
    /// Start color on the right edge.
    RightToLeft,
    /// Start color on the top edge.
    TopToBottom,
    /// Start color on the bottom edge.
    BottomToTop,
}

/// How a stroke is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    /// A single color.
    Solid(Color),
    /// A clamped linear gradient between two points.
    LinearGradient {
        /// Gradient start point.
        from: (f32, f32),
        /// Gradient end point.
        to: (f32, f32),
        /// Color at `from`.
        start_color: Color,
        /// Color at `to`.
        end_color: Color,
    },
}

impl Brush {
    /// Builds a brush for a `width × height` area.
    ///
    /// When `start` and `end` resolve to the same color the brush is solid;
    /// missing gradient stops fall back to `base`.
    pub fn resolve(
        base: Color,
        start: Option<Color>,
        end: Option<Color>,
        direction: GradientDirection,
        width: f32,
        height: f32,
    ) -> Self {
        let start_color = start.unwrap_or(base);
        let end_color = end.unwrap_or(base);
        if start_color == end_color {
            return Brush::Solid(start_color);
        }
        let (from, to) = match direction {
            GradientDirection::LeftToRight => ((0.0, 0.0), (width, 0.0)),
            GradientDirection::RightToLeft => ((width, 0.0), (0.0, 0.0)),
            GradientDirection::TopToBottom => ((0.0, 0.0), (0.0, height)),
            GradientDirection::BottomToTop => ((0.0, height), (0.0, 0.0)),
        };
        Brush::LinearGradient {
            from,
            to,
            start_color,
            end_color,
        }
    }

    /// Color at the gradient start, or the solid color.
    pub fn primary_color(&self) -> Color {
        match self {
            Brush::Solid(color) => *color,
            Brush::LinearGradient { start_color, .. } => *start_color,
        }
    }
}

impl Default for Brush {
    fn default() -> Self {
        Brush::Solid(Color::BLACK)
    }
}

/// Stroke paint handed to the canvas. Paints are always stroke-only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Paint {
    /// Stroke width in physical pixels.
    pub stroke_width: f32,
    /// Stroke coloring.
    pub brush: Brush,
    /// End cap of open arcs.
    pub cap: StrokeCap,
}

/// Drawing primitive supplied by the host.
pub trait Canvas {
    /// Strokes the oval inscribed in `rect`.
    fn draw_oval(&mut self, rect: ArcRect, paint: &Paint);

    /// Strokes the arc of the oval inscribed in `rect`, starting at
    /// `start_angle` degrees (0° at 3 o'clock, clockwise positive) and
    /// spanning `sweep_angle` degrees.
    fn draw_arc(&mut self, rect: ArcRect, start_angle: f32, sweep_angle: f32, paint: &Paint);
}
