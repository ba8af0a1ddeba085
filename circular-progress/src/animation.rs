//! Value animations sampled from scheduler ticks.
//!
//! A [`ValueAnimation`] is a pure interpolation: given the scheduler clock it
//! returns the value to apply and whether the animation has reached its end.
//! It owns no timer; [`CircularProgressBar`](crate::CircularProgressBar)
//! drives it from a recurring frame timer.
use std::time::Duration;

use derive_setters::Setters;

/// Duration used when an animation is started without an explicit one.
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(1500);

/// Interval of the frame timer that samples running animations.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn cubic_bezier(t: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    let u = 1.0 - t;
    (u * u * u * a) + (3.0 * u * u * t * b) + (3.0 * u * t * t * c) + (t * t * t * d)
}

fn cubic_bezier_easing(progress: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let x = progress.clamp(0.0, 1.0);
    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut t = x;

    for _ in 0..16 {
        let mid = (lo + hi) * 0.5;
        let mid_x = cubic_bezier(mid, 0.0, x1, x2, 1.0);
        if mid_x < x {
            lo = mid;
        } else {
            hi = mid;
        }
        t = mid;
    }

    cubic_bezier(t, 0.0, y1, y2, 1.0).clamp(0.0, 1.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Easing curve applied to the linear time fraction of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Starts fast and slows down: `1 - (1 - t)^2`.
    #[default]
    Decelerate,
    /// Slow at both ends: `cos((t + 1)π) / 2 + 0.5`.
    AccelerateDecelerate,
    /// CSS-style cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier {
        /// First control point x.
        x1: f32,
        /// First control point y.
        y1: f32,
        /// Second control point x.
        x2: f32,
        /// Second control point y.
        y2: f32,
    },
}

impl Easing {
    /// Maps a time fraction in `0.0..=1.0` to an eased fraction.
    ///
    /// The endpoints are exact: `apply(0.0) == 0.0` and `apply(1.0) == 1.0`.
    pub fn apply(self, fraction: f32) -> f32 {
        let t = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Easing::Linear => t,
            Easing::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::AccelerateDecelerate => ((t + 1.0) * std::f32::consts::PI).cos() / 2.0 + 0.5,
            Easing::CubicBezier { x1, y1, x2, y2 } => cubic_bezier_easing(t, x1, y1, x2, y2),
        }
    }
}

/// Timing parameters of a progress animation.
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
pub struct AnimationSpec {
    /// Length of the interpolation, excluding the start delay.
    pub duration: Duration,
    /// Curve applied to the time fraction.
    pub easing: Easing,
    /// Time to hold the start value before interpolating.
    pub start_delay: Duration,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration: DEFAULT_ANIMATION_DURATION,
            easing: Easing::default(),
            start_delay: Duration::ZERO,
        }
    }
}

/// One sample of a running animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    /// Interpolated value.
    pub value: f32,
    /// Whether the animation reached its end with this sample.
    pub finished: bool,
}

/// Interpolation from one value to another over scheduler time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueAnimation {
    from: f32,
    to: f32,
    spec: AnimationSpec,
    started_at: Duration,
}

impl ValueAnimation {
    /// Creates an animation that starts at the scheduler time `started_at`.
    pub fn new(from: f32, to: f32, spec: AnimationSpec, started_at: Duration) -> Self {
        Self {
            from,
            to,
            spec,
            started_at,
        }
    }

    /// Start value.
    pub fn start_value(&self) -> f32 {
        self.from
    }

    /// End value.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Timing parameters.
    pub fn spec(&self) -> AnimationSpec {
        self.spec
    }

    /// Scheduler time at which the animation ends.
    pub fn end_time(&self) -> Duration {
        self.started_at + self.spec.start_delay + self.spec.duration
    }

    /// Samples the animation at scheduler time `now`.
    pub fn sample(&self, now: Duration) -> AnimationFrame {
        if now >= self.end_time() {
            return AnimationFrame {
                value: self.to,
                finished: true,
            };
        }
        let elapsed = now
            .saturating_sub(self.started_at)
            .saturating_sub(self.spec.start_delay);
        // end_time > now implies a non-zero duration here.
        let fraction = elapsed.as_secs_f32() / self.spec.duration.as_secs_f32();
        AnimationFrame {
            value: lerp(self.from, self.to, self.spec.easing.apply(fraction)),
            finished: false,
        }
    }
}
