//! A [`Canvas`] that rasterises strokes into a grid of terminal cells.
//!
//! One cell is one physical pixel. Cells are printed two characters wide so
//! the ring looks round in a typical terminal font.
use std::fmt::Write as _;

use circular_progress::{ArcRect, Brush, Canvas, Color, Paint};
use owo_colors::OwoColorize;

/// Strokes thinner than this still cover the cells they pass through.
const MIN_HALF_STROKE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Empty,
    Background(Color),
    Foreground(Color),
}

pub struct TextCanvas {
    side: usize,
    cells: Vec<Cell>,
    color: bool,
}

impl TextCanvas {
    pub fn new(side: usize, color: bool) -> Self {
        Self {
            side,
            cells: vec![Cell::Empty; side * side],
            color,
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.side * (self.side * 2 + 1) * 4);
        for row in self.cells.chunks(self.side.max(1)) {
            for cell in row {
                let _ = match (*cell, self.color) {
                    (Cell::Empty, _) => write!(out, "  "),
                    (Cell::Background(_), false) => write!(out, "░░"),
                    (Cell::Foreground(_), false) => write!(out, "██"),
                    (Cell::Background(color), true) => {
                        let (r, g, b) = blend_on_black(color);
                        write!(out, "{}", "░░".truecolor(r, g, b))
                    }
                    (Cell::Foreground(color), true) => {
                        let (r, g, b) = blend_on_black(color);
                        write!(out, "{}", "██".truecolor(r, g, b))
                    }
                };
            }
            out.push('\n');
        }
        out
    }

    /// Visits every cell whose center lies on the stroke of the oval inscribed
    /// in `rect`, passing the cell index, its center and its angle in degrees
    /// (0° at 3 o'clock, clockwise).
    fn for_each_stroke_cell(
        &mut self,
        rect: ArcRect,
        stroke_width: f32,
        mut visit: impl FnMut(&mut Cell, (f32, f32), f32),
    ) {
        let (cx, cy) = rect.center();
        let radius = rect.width().min(rect.height()) / 2.0;
        let half_stroke = (stroke_width / 2.0).max(MIN_HALF_STROKE);
        let side = self.side;
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let x = (index % side) as f32 + 0.5;
            let y = (index / side) as f32 + 0.5;
            let (dx, dy) = (x - cx, y - cy);
            let distance = (dx * dx + dy * dy).sqrt();
            if (distance - radius).abs() > half_stroke {
                continue;
            }
            let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
            visit(cell, (x, y), angle);
        }
    }
}

impl Canvas for TextCanvas {
    fn draw_oval(&mut self, rect: ArcRect, paint: &Paint) {
        let brush = paint.brush;
        self.for_each_stroke_cell(rect, paint.stroke_width, |cell, point, _| {
            *cell = Cell::Background(brush_color(&brush, point));
        });
    }

    fn draw_arc(&mut self, rect: ArcRect, start_angle: f32, sweep_angle: f32, paint: &Paint) {
        if sweep_angle == 0.0 {
            return;
        }
        let brush = paint.brush;
        self.for_each_stroke_cell(rect, paint.stroke_width, |cell, point, angle| {
            if arc_contains(start_angle, sweep_angle, angle) {
                *cell = Cell::Foreground(brush_color(&brush, point));
            }
        });
    }
}

fn arc_contains(start_angle: f32, sweep_angle: f32, angle: f32) -> bool {
    if sweep_angle.abs() >= 360.0 {
        return true;
    }
    let offset = if sweep_angle > 0.0 {
        (angle - start_angle).rem_euclid(360.0)
    } else {
        (start_angle - angle).rem_euclid(360.0)
    };
    offset <= sweep_angle.abs()
}

fn brush_color(brush: &Brush, (x, y): (f32, f32)) -> Color {
    match *brush {
        Brush::Solid(color) => color,
        Brush::LinearGradient {
            from,
            to,
            start_color,
            end_color,
        } => {
            let (gx, gy) = (to.0 - from.0, to.1 - from.1);
            let length_sq = gx * gx + gy * gy;
            if length_sq == 0.0 {
                return start_color;
            }
            let t = (((x - from.0) * gx + (y - from.1) * gy) / length_sq).clamp(0.0, 1.0);
            let mix = |a: f32, b: f32| a + (b - a) * t;
            Color::new(
                mix(start_color.r, end_color.r),
                mix(start_color.g, end_color.g),
                mix(start_color.b, end_color.b),
                mix(start_color.a, end_color.a),
            )
        }
    }
}

fn blend_on_black(color: Color) -> (u8, u8, u8) {
    let channel = |v: f32| ((v * color.a).clamp(0.0, 1.0) * 255.0).round() as u8;
    (channel(color.r), channel(color.g), channel(color.b))
}
