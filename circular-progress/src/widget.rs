//! The circular progress bar widget.
//!
//! ## Usage
//!
//! Show how far a task has progressed as a ring that fills from its start
//! angle, or signal unknown completion time with the indeterminate
//! back-and-forth oscillation.
//!
//! The widget is host-agnostic. The host supplies a [`Scheduler`] for timers
//! and an [`Invalidator`] for redraw/re-layout requests, routes fired timers
//! to [`CircularProgressBar::on_timer`], calls
//! [`measure`](CircularProgressBar::measure) during layout and
//! [`draw`](CircularProgressBar::draw) with its [`Canvas`].
//!
//! ```
//! use std::{sync::Arc, time::Duration};
//!
//! use circular_progress::{
//!     CircularProgressBar, CircularProgressBarArgs, ManualScheduler, NoopInvalidator,
//! };
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let mut bar = CircularProgressBar::new(
//!     CircularProgressBarArgs::default(),
//!     scheduler.clone(),
//!     Arc::new(NoopInvalidator),
//! );
//!
//! bar.animate_progress_to(65.0, Some(Duration::from_millis(1000)));
//! scheduler.advance(Duration::from_millis(1100), |timer| {
//!     bar.on_timer(timer);
//! });
//! assert_eq!(bar.progress(), 65.0);
//! ```
use std::{fmt, sync::Arc, time::Duration};

use derive_setters::Setters;

use crate::{
    Color, ComputedData, DimensionValue, Dp, Px,
    animation::{AnimationSpec, DEFAULT_ANIMATION_DURATION, FRAME_INTERVAL, ValueAnimation},
    attributes::{AttributeSet, keys, read_optional, read_or},
    measure,
    paint::{ArcRect, Brush, Canvas, GradientDirection, Paint, StrokeCap},
    scheduler::{Scheduler, TimerId},
    state::{ArcAngles, DEFAULT_MAX_VALUE, ProgressDirection, ProgressState},
};

/// Redraw and re-layout requests, implemented by the host view system.
pub trait Invalidator {
    /// The widget's appearance changed and it should be drawn again.
    fn invalidate(&self);

    /// The widget's size requirements changed and it should be measured again.
    fn request_layout(&self);
}

impl<I: Invalidator + ?Sized> Invalidator for Arc<I> {
    fn invalidate(&self) {
        (**self).invalidate()
    }

    fn request_layout(&self) {
        (**self).request_layout()
    }
}

/// An [`Invalidator`] that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

impl Invalidator for NoopInvalidator {
    fn invalidate(&self) {}

    fn request_layout(&self) {}
}

/// Defaults for [`CircularProgressBarArgs`].
pub struct CircularProgressBarDefaults;

impl CircularProgressBarDefaults {
    /// Default foreground stroke width.
    pub const STROKE_WIDTH: Dp = Dp(4.0);
    /// Default background stroke width.
    pub const BACKGROUND_STROKE_WIDTH: Dp = Dp(2.0);
    /// Default foreground color.
    pub const COLOR: Color = Color::BLACK;
    /// Default background color.
    pub const BACKGROUND_COLOR: Color = Color::GRAY;
}

/// Initial configuration of a [`CircularProgressBar`].
#[derive(Clone, Debug, PartialEq, Setters)]
pub struct CircularProgressBarArgs {
    /// Initial progress.
    pub progress: f32,
    /// Maximum progress. Negative or non-finite values fall back to 100.
    pub progress_max: f32,
    /// Start in indeterminate mode.
    pub indeterminate_mode: bool,
    /// Foreground stroke width.
    pub stroke_width: Dp,
    /// Background stroke width.
    pub background_stroke_width: Dp,
    /// Foreground color.
    pub color: Color,
    /// Foreground gradient start color, defaults to `color`.
    #[setters(strip_option)]
    pub color_start: Option<Color>,
    /// Foreground gradient end color, defaults to `color`.
    #[setters(strip_option)]
    pub color_end: Option<Color>,
    /// Foreground gradient direction.
    pub color_direction: GradientDirection,
    /// Background color.
    pub background_color: Color,
    /// Background gradient start color, defaults to `background_color`.
    #[setters(strip_option)]
    pub background_color_start: Option<Color>,
    /// Background gradient end color, defaults to `background_color`.
    #[setters(strip_option)]
    pub background_color_end: Option<Color>,
    /// Background gradient direction.
    pub background_color_direction: GradientDirection,
    /// Sweep direction.
    pub direction: ProgressDirection,
    /// Rounded foreground stroke ends.
    pub round_border: bool,
    /// Start angle offset from the top of the circle, in degrees.
    pub start_angle: f32,
}

impl Default for CircularProgressBarArgs {
    fn default() -> Self {
        Self {
            progress: 0.0,
            progress_max: DEFAULT_MAX_VALUE,
            indeterminate_mode: false,
            stroke_width: CircularProgressBarDefaults::STROKE_WIDTH,
            background_stroke_width: CircularProgressBarDefaults::BACKGROUND_STROKE_WIDTH,
            color: CircularProgressBarDefaults::COLOR,
            color_start: None,
            color_end: None,
            color_direction: GradientDirection::default(),
            background_color: CircularProgressBarDefaults::BACKGROUND_COLOR,
            background_color_start: None,
            background_color_end: None,
            background_color_direction: GradientDirection::default(),
            direction: ProgressDirection::default(),
            round_border: false,
            start_angle: 0.0,
        }
    }
}

impl CircularProgressBarArgs {
    /// Reads the configuration from an attribute set.
    ///
    /// Missing or malformed attributes keep their defaults. The set is
    /// consumed and dropped before this returns.
    pub fn from_attributes<A: AttributeSet>(attrs: A) -> Self {
        let defaults = Self::default();
        let args = Self {
            progress: read_or(keys::PROGRESS, defaults.progress, |key| attrs.float(key)),
            progress_max: read_or(keys::PROGRESS_MAX, defaults.progress_max, |key| {
                attrs.float(key)
            }),
            indeterminate_mode: read_or(
                keys::INDETERMINATE_MODE,
                defaults.indeterminate_mode,
                |key| attrs.boolean(key),
            ),
            stroke_width: read_or(keys::PROGRESSBAR_WIDTH, defaults.stroke_width, |key| {
                attrs.dimension(key)
            }),
            background_stroke_width: read_or(
                keys::BACKGROUND_PROGRESSBAR_WIDTH,
                defaults.background_stroke_width,
                |key| attrs.dimension(key),
            ),
            color: read_or(keys::PROGRESSBAR_COLOR, defaults.color, |key| {
                attrs.color(key)
            }),
            color_start: read_optional(keys::PROGRESSBAR_COLOR_START, |key| attrs.color(key)),
            color_end: read_optional(keys::PROGRESSBAR_COLOR_END, |key| attrs.color(key)),
            color_direction: read_or(
                keys::PROGRESSBAR_COLOR_DIRECTION,
                defaults.color_direction,
                |key| attrs.gradient_direction(key),
            ),
            background_color: read_or(
                keys::BACKGROUND_PROGRESSBAR_COLOR,
                defaults.background_color,
                |key| attrs.color(key),
            ),
            background_color_start: read_optional(keys::BACKGROUND_PROGRESSBAR_COLOR_START, |key| {
                attrs.color(key)
            }),
            background_color_end: read_optional(keys::BACKGROUND_PROGRESSBAR_COLOR_END, |key| {
                attrs.color(key)
            }),
            background_color_direction: read_or(
                keys::BACKGROUND_PROGRESSBAR_COLOR_DIRECTION,
                defaults.background_color_direction,
                |key| attrs.gradient_direction(key),
            ),
            direction: read_or(keys::PROGRESS_DIRECTION, defaults.direction, |key| {
                attrs.progress_direction(key)
            }),
            round_border: read_or(keys::ROUND_BORDER, defaults.round_border, |key| {
                attrs.boolean(key)
            }),
            start_angle: read_or(keys::START_ANGLE, defaults.start_angle, |key| {
                attrs.float(key)
            }),
        };
        drop(attrs);
        tracing::debug!(?args, "loaded progress bar attributes");
        args
    }
}

/// Color configuration of one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RingColors {
    base: Color,
    start: Option<Color>,
    end: Option<Color>,
    direction: GradientDirection,
}

impl RingColors {
    fn brush(&self, size: Px) -> Brush {
        let side = size.to_f32();
        Brush::resolve(
            self.base,
            self.start,
            self.end,
            self.direction,
            side,
            side,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    animation: ValueAnimation,
    frame_timer: TimerId,
}

type ProgressListener = Box<dyn FnMut(f32)>;
type ModeListener = Box<dyn FnMut(bool)>;

/// A circular progress bar.
///
/// Invariants: progress stays within `0..=progress_max`; at most one progress
/// animation runs at a time; while attached, the indeterminate timer is
/// scheduled exactly when indeterminate mode is on.
pub struct CircularProgressBar {
    state: ProgressState,
    stroke_width: Dp,
    background_stroke_width: Dp,
    foreground: RingColors,
    background: RingColors,
    round_border: bool,
    foreground_paint: Paint,
    background_paint: Paint,
    size: Px,
    rect: ArcRect,
    active_animation: Option<ActiveAnimation>,
    indeterminate_timer: Option<TimerId>,
    on_progress_change: Option<ProgressListener>,
    on_indeterminate_mode_change: Option<ModeListener>,
    scheduler: Arc<dyn Scheduler>,
    invalidator: Arc<dyn Invalidator>,
}

impl fmt::Debug for CircularProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularProgressBar")
            .field("state", &self.state)
            .field("stroke_width", &self.stroke_width)
            .field("background_stroke_width", &self.background_stroke_width)
            .field("round_border", &self.round_border)
            .field("size", &self.size)
            .field("active_animation", &self.active_animation)
            .field("indeterminate_timer", &self.indeterminate_timer)
            .finish_non_exhaustive()
    }
}

impl CircularProgressBar {
    /// Creates a progress bar from `args`.
    ///
    /// When `args.indeterminate_mode` is set the oscillation timer is
    /// scheduled right away.
    pub fn new(
        args: CircularProgressBarArgs,
        scheduler: Arc<dyn Scheduler>,
        invalidator: Arc<dyn Invalidator>,
    ) -> Self {
        let foreground = RingColors {
            base: args.color,
            start: args.color_start,
            end: args.color_end,
            direction: args.color_direction,
        };
        let background = RingColors {
            base: args.background_color,
            start: args.background_color_start,
            end: args.background_color_end,
            direction: args.background_color_direction,
        };

        let mut state = ProgressState::new();
        state.set_progress_max(args.progress_max);
        state.set_progress(args.progress);
        state.set_direction(args.direction);
        state.set_start_angle(args.start_angle);

        let mut bar = Self {
            state,
            stroke_width: args.stroke_width.non_negative(),
            background_stroke_width: args.background_stroke_width.non_negative(),
            foreground,
            background,
            round_border: args.round_border,
            foreground_paint: Paint::default(),
            background_paint: Paint::default(),
            size: Px::ZERO,
            rect: ArcRect::ZERO,
            active_animation: None,
            indeterminate_timer: None,
            on_progress_change: None,
            on_indeterminate_mode_change: None,
            scheduler,
            invalidator,
        };
        bar.refresh_paints();

        if args.indeterminate_mode {
            bar.set_indeterminate_mode(true);
        }
        bar
    }

    /// Creates a progress bar configured from an attribute set.
    pub fn from_attributes<A: AttributeSet>(
        attrs: A,
        scheduler: Arc<dyn Scheduler>,
        invalidator: Arc<dyn Invalidator>,
    ) -> Self {
        Self::new(
            CircularProgressBarArgs::from_attributes(attrs),
            scheduler,
            invalidator,
        )
    }

    // --- Progress -----------------------------------------------------------

    /// Current progress.
    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    /// Sets the progress.
    ///
    /// Cancels any running animation and leaves indeterminate mode. The value
    /// is clamped into `0..=progress_max`. The progress listener only sees the
    /// new value.
    pub fn set_progress(&mut self, value: f32) {
        self.cancel_animation();
        if self.state.is_indeterminate() {
            self.switch_indeterminate(false, false);
        }
        self.apply_progress(value);
    }

    /// Maximum progress.
    pub fn progress_max(&self) -> f32 {
        self.state.progress_max()
    }

    /// Sets the maximum progress. Negative or non-finite values fall back to 100.
    pub fn set_progress_max(&mut self, value: f32) {
        let previous = self.state.progress();
        self.state.set_progress_max(value);
        if self.state.progress() != previous {
            self.notify_progress();
        }
        self.invalidator.request_layout();
        self.invalidator.invalidate();
    }

    /// Progress as a percentage of the maximum.
    pub fn real_progress(&self) -> f32 {
        self.state.real_progress()
    }

    /// Signed sweep of the foreground arc in degrees.
    pub fn sweep_angle(&self) -> f32 {
        self.state.sweep_angle()
    }

    /// Start and sweep of the foreground arc as it would be drawn now.
    pub fn arc_angles(&self) -> ArcAngles {
        self.state.arc_angles()
    }

    /// Numeric state of the bar.
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    // --- Animation ----------------------------------------------------------

    /// Animates progress to `target` over `duration` (1500 ms when `None`)
    /// with a decelerating curve. Any running animation is cancelled first.
    pub fn animate_progress_to(&mut self, target: f32, duration: Option<Duration>) {
        let spec = AnimationSpec::default().duration(duration.unwrap_or(DEFAULT_ANIMATION_DURATION));
        self.animate_progress(target, spec);
    }

    /// Animates progress to `target` with explicit timing. Any running
    /// animation is cancelled first.
    pub fn animate_progress(&mut self, target: f32, spec: AnimationSpec) {
        self.cancel_animation();
        let target = self.state.clamp_progress(target);
        let animation =
            ValueAnimation::new(self.state.progress(), target, spec, self.scheduler.now());
        let frame_timer = self
            .scheduler
            .schedule_repeating(FRAME_INTERVAL, FRAME_INTERVAL);
        tracing::debug!(
            from = animation.start_value(),
            target,
            duration_ms = spec.duration.as_millis() as u64,
            %frame_timer,
            "starting progress animation"
        );
        self.active_animation = Some(ActiveAnimation {
            animation,
            frame_timer,
        });
    }

    /// Whether a progress animation is running.
    pub fn is_animating(&self) -> bool {
        self.active_animation.is_some()
    }

    /// Target of the running animation.
    pub fn animation_target(&self) -> Option<f32> {
        self.active_animation
            .as_ref()
            .map(|active| active.animation.target())
    }

    /// Stops the running animation, leaving progress where it is.
    pub fn cancel_animation(&mut self) {
        if let Some(active) = self.active_animation.take() {
            self.scheduler.cancel(active.frame_timer);
            tracing::debug!(
                target = active.animation.target(),
                progress = self.state.progress(),
                "cancelled progress animation"
            );
        }
    }

    // --- Indeterminate mode -------------------------------------------------

    /// Whether indeterminate mode is on.
    pub fn is_indeterminate(&self) -> bool {
        self.state.is_indeterminate()
    }

    /// Turns the indeterminate oscillation on or off.
    ///
    /// Either way the mode listener is notified, the oscillation direction
    /// and the indeterminate start angle are reset, and the running timer and
    /// animation are cancelled. Enabling schedules the oscillation timer,
    /// which fires immediately and then every 1500 ms. Disabling sets progress
    /// to 0. The user sweep direction is left alone.
    pub fn set_indeterminate_mode(&mut self, enable: bool) {
        self.switch_indeterminate(enable, true);
    }

    fn switch_indeterminate(&mut self, enable: bool, reset_progress: bool) {
        self.state.set_indeterminate(enable);
        if let Some(listener) = self.on_indeterminate_mode_change.as_mut() {
            listener(enable);
        }
        self.state.reset_oscillation();

        self.cancel_indeterminate_timer();
        self.cancel_animation();

        if enable {
            self.schedule_indeterminate_timer();
        } else if reset_progress {
            self.apply_progress(0.0);
        }
        tracing::debug!(enable, "indeterminate mode changed");
        self.invalidator.invalidate();
    }

    /// Whether the oscillation timer is scheduled.
    pub fn has_indeterminate_timer(&self) -> bool {
        self.indeterminate_timer.is_some()
    }

    fn schedule_indeterminate_timer(&mut self) {
        let timer = self
            .scheduler
            .schedule_repeating(Duration::ZERO, DEFAULT_ANIMATION_DURATION);
        self.indeterminate_timer = Some(timer);
    }

    fn cancel_indeterminate_timer(&mut self) {
        if let Some(timer) = self.indeterminate_timer.take() {
            self.scheduler.cancel(timer);
        }
    }

    // --- Scheduler callbacks ------------------------------------------------

    /// Handles a fired timer. Returns `false` when `timer` does not belong to
    /// this progress bar.
    pub fn on_timer(&mut self, timer: TimerId) -> bool {
        if self.indeterminate_timer == Some(timer) {
            self.oscillate();
            true
        } else if self
            .active_animation
            .is_some_and(|active| active.frame_timer == timer)
        {
            self.advance_animation();
            true
        } else {
            false
        }
    }

    fn oscillate(&mut self) {
        if !self.state.is_indeterminate() {
            return;
        }
        let direction = self.state.indeterminate_direction().reverse();
        self.state.set_indeterminate_direction(direction);
        let target = if direction.is_right_to_left() {
            0.0
        } else {
            self.state.progress_max()
        };
        tracing::debug!(?direction, target, "indeterminate oscillation");
        self.animate_progress(target, AnimationSpec::default());
    }

    fn advance_animation(&mut self) {
        let Some(active) = self.active_animation else {
            return;
        };
        let frame = active.animation.sample(self.scheduler.now());
        tracing::trace!(value = frame.value, finished = frame.finished, "animation frame");

        self.apply_progress(frame.value);
        if self.state.is_indeterminate() {
            self.state.follow_indeterminate_value(frame.value);
        }

        if frame.finished {
            self.scheduler.cancel(active.frame_timer);
            self.active_animation = None;
        }
    }

    /// Stores progress without touching animations or indeterminate mode.
    fn apply_progress(&mut self, value: f32) {
        let progress = self.state.set_progress(value);
        if let Some(listener) = self.on_progress_change.as_mut() {
            listener(progress);
        }
        self.invalidator.invalidate();
    }

    fn notify_progress(&mut self) {
        let progress = self.state.progress();
        if let Some(listener) = self.on_progress_change.as_mut() {
            listener(progress);
        }
    }

    // --- Lifecycle ----------------------------------------------------------

    /// Cancels the running animation and the oscillation timer. Call when the
    /// widget leaves the view hierarchy.
    pub fn on_detached(&mut self) {
        self.cancel_animation();
        self.cancel_indeterminate_timer();
        tracing::debug!("progress bar detached");
    }

    /// Restarts the oscillation after [`on_detached`](Self::on_detached) when
    /// indeterminate mode is still on.
    pub fn on_attached(&mut self) {
        if self.state.is_indeterminate() && self.indeterminate_timer.is_none() {
            self.schedule_indeterminate_timer();
        }
    }

    // --- Listeners ----------------------------------------------------------

    /// Registers the listener called with every stored progress value.
    pub fn set_on_progress_change(&mut self, listener: impl FnMut(f32) + 'static) {
        self.on_progress_change = Some(Box::new(listener));
    }

    /// Removes the progress listener.
    pub fn clear_on_progress_change(&mut self) {
        self.on_progress_change = None;
    }

    /// Registers the listener called whenever indeterminate mode is set.
    pub fn set_on_indeterminate_mode_change(&mut self, listener: impl FnMut(bool) + 'static) {
        self.on_indeterminate_mode_change = Some(Box::new(listener));
    }

    /// Removes the indeterminate mode listener.
    pub fn clear_on_indeterminate_mode_change(&mut self) {
        self.on_indeterminate_mode_change = None;
    }

    // --- Appearance ---------------------------------------------------------

    /// Foreground stroke width.
    pub fn stroke_width(&self) -> Dp {
        self.stroke_width
    }

    /// Sets the foreground stroke width. Negative values become zero.
    pub fn set_stroke_width(&mut self, width: Dp) {
        self.stroke_width = width.non_negative();
        self.refresh_paints();
        self.invalidator.request_layout();
        self.invalidator.invalidate();
    }

    /// Background stroke width.
    pub fn background_stroke_width(&self) -> Dp {
        self.background_stroke_width
    }

    /// Sets the background stroke width. Negative values become zero.
    pub fn set_background_stroke_width(&mut self, width: Dp) {
        self.background_stroke_width = width.non_negative();
        self.refresh_paints();
        self.invalidator.request_layout();
        self.invalidator.invalidate();
    }

    /// Foreground color.
    pub fn color(&self) -> Color {
        self.foreground.base
    }

    /// Sets the foreground color.
    pub fn set_color(&mut self, color: Color) {
        self.foreground.base = color;
        self.restyle();
    }

    /// Sets the foreground gradient stops; `None` stops use the base color.
    pub fn set_color_gradient(&mut self, start: Option<Color>, end: Option<Color>) {
        self.foreground.start = start;
        self.foreground.end = end;
        self.restyle();
    }

    /// Sets the foreground gradient direction.
    pub fn set_color_direction(&mut self, direction: GradientDirection) {
        self.foreground.direction = direction;
        self.restyle();
    }

    /// Background color.
    pub fn background_color(&self) -> Color {
        self.background.base
    }

    /// Sets the background ring color.
    pub fn set_background_color(&mut self, color: Color) {
        self.background.base = color;
        self.restyle();
    }

    /// Sets the background gradient stops; `None` stops use the base color.
    pub fn set_background_color_gradient(&mut self, start: Option<Color>, end: Option<Color>) {
        self.background.start = start;
        self.background.end = end;
        self.restyle();
    }

    /// Sets the background gradient direction.
    pub fn set_background_color_direction(&mut self, direction: GradientDirection) {
        self.background.direction = direction;
        self.restyle();
    }

    /// Whether the foreground arc has rounded ends.
    pub fn round_border(&self) -> bool {
        self.round_border
    }

    /// Rounds (or flattens) the foreground arc ends.
    pub fn set_round_border(&mut self, round: bool) {
        self.round_border = round;
        self.restyle();
    }

    /// Sweep direction used outside indeterminate mode.
    pub fn direction(&self) -> ProgressDirection {
        self.state.direction()
    }

    /// Current direction of the indeterminate oscillation.
    pub fn indeterminate_direction(&self) -> ProgressDirection {
        self.state.indeterminate_direction()
    }

    /// Sets the sweep direction.
    pub fn set_direction(&mut self, direction: ProgressDirection) {
        self.state.set_direction(direction);
        self.invalidator.invalidate();
    }

    /// Start angle used outside indeterminate mode.
    pub fn start_angle(&self) -> f32 {
        self.state.start_angle()
    }

    /// Sets the start angle as an offset from the top of the circle.
    pub fn set_start_angle(&mut self, offset: f32) {
        self.state.set_start_angle(offset);
        self.invalidator.invalidate();
    }

    /// Paint of the foreground arc.
    pub fn foreground_paint(&self) -> &Paint {
        &self.foreground_paint
    }

    /// Paint of the background ring.
    pub fn background_paint(&self) -> &Paint {
        &self.background_paint
    }

    fn restyle(&mut self) {
        self.refresh_paints();
        self.invalidator.invalidate();
    }

    fn refresh_paints(&mut self) {
        let stroke_px = self.stroke_width.to_pixels_f32();
        let background_stroke_px = self.background_stroke_width.to_pixels_f32();
        self.foreground_paint = Paint {
            stroke_width: stroke_px,
            brush: self.foreground.brush(self.size),
            cap: if self.round_border {
                StrokeCap::Round
            } else {
                StrokeCap::Butt
            },
        };
        self.background_paint = Paint {
            stroke_width: background_stroke_px,
            brush: self.background.brush(self.size),
            cap: StrokeCap::Butt,
        };
        self.rect = measure::stroke_rect(self.size, stroke_px, background_stroke_px);
    }

    // --- Layout and drawing -------------------------------------------------

    /// Measures the bar as a square of the smaller resolved dimension and
    /// recomputes the stroke rectangle and gradients for that size.
    pub fn measure(&mut self, width: DimensionValue, height: DimensionValue) -> ComputedData {
        let side = measure::square_side(width, height, Px::ZERO);
        if side != self.size {
            tracing::debug!(side = side.raw(), "progress bar resized");
        }
        self.size = side;
        self.refresh_paints();
        measure::square(side)
    }

    /// Side of the last measured square.
    pub fn size(&self) -> Px {
        self.size
    }

    /// Rectangle the rings are stroked in.
    pub fn rect(&self) -> ArcRect {
        self.rect
    }

    /// Draws the background ring, then the foreground arc.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.draw_oval(self.rect, &self.background_paint);
        let angles = self.state.arc_angles();
        canvas.draw_arc(
            self.rect,
            angles.start_angle,
            angles.sweep_angle,
            &self.foreground_paint,
        );
    }
}

impl Drop for CircularProgressBar {
    fn drop(&mut self) {
        self.cancel_animation();
        self.cancel_indeterminate_timer();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        rc::Rc,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{
        ManualScheduler,
        animation::Easing,
        attributes::AttributeMap,
        state::DEFAULT_START_ANGLE,
    };

    #[derive(Default)]
    struct RecordingInvalidator {
        redraws: AtomicUsize,
        layouts: AtomicUsize,
    }

    impl Invalidator for RecordingInvalidator {
        fn invalidate(&self) {
            self.redraws.fetch_add(1, Ordering::SeqCst);
        }

        fn request_layout(&self) {
            self.layouts.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug, PartialEq)]
    enum DrawCall {
        Oval(ArcRect, Paint),
        Arc(ArcRect, f32, f32, Paint),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<DrawCall>,
    }

    impl Canvas for RecordingCanvas {
        fn draw_oval(&mut self, rect: ArcRect, paint: &Paint) {
            self.calls.push(DrawCall::Oval(rect, *paint));
        }

        fn draw_arc(&mut self, rect: ArcRect, start_angle: f32, sweep_angle: f32, paint: &Paint) {
            self.calls
                .push(DrawCall::Arc(rect, start_angle, sweep_angle, *paint));
        }
    }

    struct Harness {
        scheduler: Arc<ManualScheduler>,
        invalidator: Arc<RecordingInvalidator>,
        bar: CircularProgressBar,
    }

    impl Harness {
        fn new(args: CircularProgressBarArgs) -> Self {
            let scheduler = Arc::new(ManualScheduler::new());
            let invalidator = Arc::new(RecordingInvalidator::default());
            let bar = CircularProgressBar::new(args, scheduler.clone(), invalidator.clone());
            Self {
                scheduler,
                invalidator,
                bar,
            }
        }

        fn advance(&mut self, ms: u64) {
            let bar = &mut self.bar;
            self.scheduler
                .advance(Duration::from_millis(ms), |timer| {
                    bar.on_timer(timer);
                });
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_set_progress_clamps() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        h.bar.set_progress(150.0);
        assert_eq!(h.bar.progress(), 100.0);
        h.bar.set_progress(-20.0);
        assert_eq!(h.bar.progress(), 0.0);

        h.bar.set_progress_max(50.0);
        h.bar.set_progress(40.0);
        assert_eq!(h.bar.progress(), 40.0);
        assert_eq!(h.bar.real_progress(), 80.0);
        h.bar.set_direction(ProgressDirection::RightToLeft);
        assert_eq!(h.bar.sweep_angle(), 288.0);
    }

    #[test]
    fn test_negative_max_resets_and_requests_layout() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        let layouts = h.invalidator.layouts.load(Ordering::SeqCst);
        h.bar.set_progress_max(-3.0);
        assert_eq!(h.bar.progress_max(), 100.0);
        assert_eq!(h.invalidator.layouts.load(Ordering::SeqCst), layouts + 1);
    }

    #[test]
    fn test_progress_listener_and_redraws() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        h.bar.set_on_progress_change(move |value| sink.borrow_mut().push(value));

        let redraws = h.invalidator.redraws.load(Ordering::SeqCst);
        h.bar.set_progress(30.0);
        h.bar.set_progress(130.0);
        assert_eq!(*seen.borrow(), vec![30.0, 100.0]);
        assert_eq!(h.invalidator.redraws.load(Ordering::SeqCst), redraws + 2);

        h.bar.set_progress_max(40.0);
        assert_eq!(*seen.borrow(), vec![30.0, 100.0, 40.0]);

        h.bar.clear_on_progress_change();
        h.bar.set_progress(10.0);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_animation_reaches_target_with_deceleration() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        h.bar.animate_progress_to(80.0, Some(ms(1000)));
        assert!(h.bar.is_animating());

        h.advance(496);
        let halfway = h.bar.progress();
        // Decelerating: past the linear midpoint at half time.
        assert!(halfway > 40.0 && halfway < 80.0, "{halfway}");

        h.advance(600);
        assert_eq!(h.bar.progress(), 80.0);
        assert!(!h.bar.is_animating());
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_default_animation_duration() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        h.bar.animate_progress_to(50.0, None);
        h.advance(1400);
        assert!(h.bar.is_animating());
        h.advance(200);
        assert!(!h.bar.is_animating());
        assert_eq!(h.bar.progress(), 50.0);
    }

    #[test]
    fn test_second_animation_cancels_first() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        h.bar.animate_progress_to(90.0, Some(ms(1000)));
        h.advance(200);
        h.bar.animate_progress_to(20.0, Some(ms(500)));
        assert_eq!(h.bar.animation_target(), Some(20.0));
        // Only the second animation's frame timer is left.
        assert_eq!(h.scheduler.pending(), 1);

        h.advance(2000);
        assert_eq!(h.bar.progress(), 20.0);
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_animation_target_is_clamped() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        h.bar.animate_progress(
            500.0,
            AnimationSpec::default()
                .duration(ms(100))
                .easing(Easing::Linear),
        );
        assert_eq!(h.bar.animation_target(), Some(100.0));
        h.advance(200);
        assert_eq!(h.bar.progress(), 100.0);
    }

    #[test]
    fn test_set_progress_cancels_animation() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        h.bar.animate_progress_to(90.0, Some(ms(1000)));
        h.advance(100);
        h.bar.set_progress(5.0);
        assert!(!h.bar.is_animating());
        h.advance(2000);
        assert_eq!(h.bar.progress(), 5.0);
    }

    #[test]
    fn test_indeterminate_oscillates() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        let modes = Rc::new(RefCell::new(Vec::new()));
        let sink = modes.clone();
        h.bar
            .set_on_indeterminate_mode_change(move |mode| sink.borrow_mut().push(mode));

        h.bar.set_progress(60.0);
        h.bar.set_indeterminate_mode(true);
        assert!(h.bar.has_indeterminate_timer());
        assert_eq!(h.bar.indeterminate_direction(), ProgressDirection::LeftToRight);
        assert_eq!(*modes.borrow(), vec![true]);

        // First fire is immediate: flips to right-to-left and heads for 0.
        h.advance(0);
        assert_eq!(h.bar.indeterminate_direction(), ProgressDirection::RightToLeft);
        assert_eq!(h.bar.direction(), ProgressDirection::LeftToRight);
        assert_eq!(h.bar.animation_target(), Some(0.0));

        h.advance(1499);
        assert!(h.bar.progress() < 1.0);

        // Second fire at 1500 ms: back to left-to-right, heading for max.
        h.advance(1);
        assert_eq!(h.bar.indeterminate_direction(), ProgressDirection::LeftToRight);
        assert_eq!(h.bar.animation_target(), Some(100.0));

        h.advance(1400);
        assert!(h.bar.progress() > 90.0);
        let angles = h.bar.arc_angles();
        let expected = DEFAULT_START_ANGLE - h.bar.progress() * 360.0 / 100.0;
        assert!((angles.start_angle - expected).abs() < 1e-3);
        assert!(angles.sweep_angle < 0.0);
    }

    #[test]
    fn test_enable_then_disable_indeterminate() {
        let mut h = Harness::new(CircularProgressBarArgs::default().progress(35.0));
        h.bar.set_indeterminate_mode(true);
        h.advance(300);
        h.bar.set_indeterminate_mode(false);

        assert_eq!(h.bar.progress(), 0.0);
        assert!(!h.bar.has_indeterminate_timer());
        assert!(!h.bar.is_animating());
        assert_eq!(h.scheduler.pending(), 0);
        assert_eq!(h.bar.arc_angles().start_angle, h.bar.start_angle());
    }

    #[test]
    fn test_set_progress_leaves_indeterminate_mode() {
        let mut h = Harness::new(CircularProgressBarArgs::default().indeterminate_mode(true));
        assert!(h.bar.is_indeterminate());
        h.advance(200);

        let modes = Rc::new(RefCell::new(Vec::new()));
        let sink = modes.clone();
        h.bar
            .set_on_indeterminate_mode_change(move |mode| sink.borrow_mut().push(mode));
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = values.clone();
        h.bar.set_on_progress_change(move |value| sink.borrow_mut().push(value));
        h.bar.set_progress(42.0);

        assert!(!h.bar.is_indeterminate());
        assert_eq!(*modes.borrow(), vec![false]);
        // No intermediate reset to 0 reaches the listener.
        assert_eq!(*values.borrow(), vec![42.0]);
        assert_eq!(h.bar.progress(), 42.0);
        assert_eq!(h.scheduler.pending(), 0);
    }

    #[test]
    fn test_user_direction_survives_indeterminate_mode() {
        let mut h = Harness::new(
            CircularProgressBarArgs::default().direction(ProgressDirection::RightToLeft),
        );
        h.bar.set_indeterminate_mode(true);
        h.advance(10);
        // The oscillation draws with its own direction while the mode is on.
        assert_eq!(h.bar.indeterminate_direction(), ProgressDirection::RightToLeft);
        h.advance(1500);
        assert_eq!(h.bar.indeterminate_direction(), ProgressDirection::LeftToRight);
        assert!(h.bar.sweep_angle() <= 0.0);

        h.bar.set_indeterminate_mode(false);
        h.bar.set_progress(50.0);
        assert_eq!(h.bar.direction(), ProgressDirection::RightToLeft);
        assert_eq!(h.bar.sweep_angle(), 180.0);
        assert_eq!(h.bar.arc_angles().start_angle, h.bar.start_angle());
    }

    #[test]
    fn test_detach_cancels_timers_and_attach_restarts() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        h.bar.set_indeterminate_mode(true);
        h.advance(100);
        assert!(h.scheduler.pending() > 0);

        h.bar.on_detached();
        assert_eq!(h.scheduler.pending(), 0);
        assert!(!h.bar.is_animating());

        let progress = h.bar.progress();
        h.advance(5000);
        assert_eq!(h.bar.progress(), progress);

        h.bar.on_attached();
        assert!(h.bar.has_indeterminate_timer());
        assert_eq!(h.scheduler.pending(), 1);
    }

    #[test]
    fn test_drop_cancels_timers() {
        let h = Harness::new(CircularProgressBarArgs::default().indeterminate_mode(true));
        let scheduler = h.scheduler.clone();
        assert_eq!(scheduler.pending(), 1);
        drop(h);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_foreign_timers_are_ignored() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        let foreign = h.scheduler.schedule_once(ms(1));
        assert!(!h.bar.on_timer(foreign));
    }

    #[test]
    fn test_measure_square_and_rect() {
        let mut h = Harness::new(
            CircularProgressBarArgs::default()
                .stroke_width(Dp(8.0))
                .background_stroke_width(Dp(4.0)),
        );
        let size = h.bar.measure(
            DimensionValue::Fixed(Px(120)),
            DimensionValue::Fill {
                min: None,
                max: Some(Px(100)),
            },
        );
        assert_eq!(size, ComputedData {
            width: Px(100),
            height: Px(100),
        });
        let expected_inset = Dp(8.0).to_pixels_f32() / 2.0;
        assert_eq!(h.bar.rect().left, expected_inset);
        assert_eq!(h.bar.rect().right, 100.0 - expected_inset);

        let layouts = h.invalidator.layouts.load(Ordering::SeqCst);
        h.bar.set_stroke_width(Dp(-1.0));
        assert_eq!(h.bar.stroke_width(), Dp::ZERO);
        assert_eq!(h.invalidator.layouts.load(Ordering::SeqCst), layouts + 1);
        let expected_inset = Dp(4.0).to_pixels_f32() / 2.0;
        assert_eq!(h.bar.rect().top, expected_inset);
    }

    #[test]
    fn test_draw_background_then_arc() {
        let mut h = Harness::new(CircularProgressBarArgs::default().round_border(true));
        h.bar.measure(DimensionValue::Fixed(Px(50)), DimensionValue::Fixed(Px(50)));
        h.bar.set_progress(25.0);

        let mut canvas = RecordingCanvas::default();
        h.bar.draw(&mut canvas);
        assert_eq!(canvas.calls.len(), 2);
        match (&canvas.calls[0], &canvas.calls[1]) {
            (DrawCall::Oval(oval_rect, background), DrawCall::Arc(rect, start, sweep, paint)) => {
                assert_eq!(oval_rect, rect);
                assert_eq!(background.brush, Brush::Solid(Color::GRAY));
                assert_eq!(*start, 270.0);
                assert_eq!(*sweep, -90.0);
                assert_eq!(paint.cap, StrokeCap::Round);
                assert_eq!(paint.brush, Brush::Solid(Color::BLACK));
            }
            other => panic!("unexpected draw calls: {other:?}"),
        }
    }

    #[test]
    fn test_gradient_follows_measured_size() {
        let mut h = Harness::new(
            CircularProgressBarArgs::default()
                .color_start(Color::WHITE)
                .color_direction(GradientDirection::TopToBottom),
        );
        h.bar.measure(DimensionValue::Fixed(Px(64)), DimensionValue::Fixed(Px(80)));
        assert_eq!(
            h.bar.foreground_paint().brush,
            Brush::LinearGradient {
                from: (0.0, 0.0),
                to: (0.0, 64.0),
                start_color: Color::WHITE,
                end_color: Color::BLACK,
            }
        );

        h.bar.set_color_gradient(None, None);
        assert_eq!(h.bar.foreground_paint().brush, Brush::Solid(Color::BLACK));
    }

    #[test]
    fn test_appearance_setters_redraw() {
        let mut h = Harness::new(CircularProgressBarArgs::default());
        let redraws = h.invalidator.redraws.load(Ordering::SeqCst);
        let faded = Color::from_argb_u32(0xFF3F51B5).adjust_alpha(0.3);
        h.bar.set_color(Color::from_argb_u32(0xFF3F51B5));
        h.bar.set_background_color(faded);
        h.bar.set_start_angle(90.0);
        h.bar.set_round_border(true);
        assert_eq!(h.invalidator.redraws.load(Ordering::SeqCst), redraws + 4);
        assert_eq!(h.bar.background_color().to_argb_u32(), 0x4D3F51B5);
        assert_eq!(h.bar.start_angle(), 360.0);
        assert!(h.bar.round_border());
    }

    struct ReleaseTracking {
        inner: AttributeMap,
        released: Rc<RefCell<bool>>,
    }

    impl AttributeSet for ReleaseTracking {
        fn get(&self, key: &str) -> Option<crate::attributes::AttributeValue> {
            self.inner.get(key)
        }
    }

    impl Drop for ReleaseTracking {
        fn drop(&mut self) {
            *self.released.borrow_mut() = true;
        }
    }

    #[test]
    fn test_from_attributes_reads_and_releases() {
        let released = Rc::new(RefCell::new(false));
        let attrs = ReleaseTracking {
            inner: AttributeMap::new()
                .with(keys::PROGRESS, 120.0)
                .with(keys::PROGRESS_MAX, 200.0)
                .with(keys::PROGRESSBAR_WIDTH, "10dp")
                .with(keys::BACKGROUND_PROGRESSBAR_COLOR, "#4D3F51B5")
                .with(keys::PROGRESS_DIRECTION, "right_to_left")
                .with(keys::START_ANGLE, 90.0),
            released: released.clone(),
        };

        let args = CircularProgressBarArgs::from_attributes(attrs);
        assert!(*released.borrow());
        assert_eq!(args.progress, 120.0);
        assert_eq!(args.stroke_width, Dp(10.0));

        let h = Harness::new(args);
        // Maximum is applied before progress.
        assert_eq!(h.bar.progress(), 120.0);
        assert_eq!(h.bar.progress_max(), 200.0);
        assert_eq!(h.bar.direction(), ProgressDirection::RightToLeft);
        assert_eq!(h.bar.start_angle(), 360.0);
        assert_eq!(h.bar.background_color().to_argb_u32(), 0x4D3F51B5);
    }

    #[test]
    fn test_from_attributes_malformed_values_use_defaults() {
        let attrs = AttributeMap::new()
            .with(keys::PROGRESS, "half")
            .with(keys::PROGRESS_MAX, true)
            .with(keys::INDETERMINATE_MODE, "yes")
            .with(keys::PROGRESSBAR_WIDTH, "wide")
            .with(keys::PROGRESSBAR_COLOR, "#12")
            .with(keys::PROGRESSBAR_COLOR_START, "nope");
        let args = CircularProgressBarArgs::from_attributes(attrs);
        assert_eq!(args, CircularProgressBarArgs::default());
    }

    #[test]
    fn test_indeterminate_attribute_starts_timer() {
        let scheduler = Arc::new(ManualScheduler::new());
        let attrs = AttributeMap::new().with(keys::INDETERMINATE_MODE, true);
        let bar =
            CircularProgressBar::from_attributes(attrs, scheduler.clone(), Arc::new(NoopInvalidator));
        assert!(bar.is_indeterminate());
        assert!(bar.has_indeterminate_timer());
        assert_eq!(scheduler.pending(), 1);
    }
}
