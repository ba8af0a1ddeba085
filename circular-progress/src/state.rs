//! Progress value, maximum, direction and start angles of the ring, and the
//! angle maths derived from them.
//!
//! [`ProgressState`] holds no timers and triggers nothing; it only enforces
//! its clamping rules. Side effects (listeners, redraws, animations) live in
//! [`CircularProgressBar`](crate::CircularProgressBar).

/// Default and fallback value of [`ProgressState::progress_max`].
pub const DEFAULT_MAX_VALUE: f32 = 100.0;

/// Angle of the top of the circle, where 0° is at 3 o'clock and angles grow
/// clockwise.
pub const DEFAULT_START_ANGLE: f32 = 270.0;

/// Direction in which the arc sweeps from its start angle.
///
/// `RightToLeft` sweeps with a positive angle, `LeftToRight` with a negative
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ProgressDirection {
    /// Negative sweep.
    #[default]
    LeftToRight,
    /// Positive sweep.
    RightToLeft,
}

impl ProgressDirection {
    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            ProgressDirection::LeftToRight => ProgressDirection::RightToLeft,
            ProgressDirection::RightToLeft => ProgressDirection::LeftToRight,
        }
    }

    /// Whether this is [`ProgressDirection::RightToLeft`].
    pub fn is_right_to_left(self) -> bool {
        self == ProgressDirection::RightToLeft
    }

    /// `1.0` for a positive sweep, `-1.0` for a negative one.
    pub fn sweep_sign(self) -> f32 {
        if self.is_right_to_left() { 1.0 } else { -1.0 }
    }
}

/// Arc angles handed to the drawing primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcAngles {
    /// Start of the arc in degrees.
    pub start_angle: f32,
    /// Signed span of the arc in degrees.
    pub sweep_angle: f32,
}

/// Numeric state of a circular progress bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    progress: f32,
    progress_max: f32,
    direction: ProgressDirection,
    indeterminate_direction: ProgressDirection,
    indeterminate_mode: bool,
    start_angle: f32,
    indeterminate_start_angle: f32,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            progress: 0.0,
            progress_max: DEFAULT_MAX_VALUE,
            direction: ProgressDirection::default(),
            indeterminate_direction: ProgressDirection::default(),
            indeterminate_mode: false,
            start_angle: DEFAULT_START_ANGLE,
            indeterminate_start_angle: DEFAULT_START_ANGLE,
        }
    }
}

impl ProgressState {
    /// Creates a state with progress 0 of 100.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current progress, always within `0.0..=progress_max`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Maximum progress value.
    pub fn progress_max(&self) -> f32 {
        self.progress_max
    }

    /// Sweep direction configured by the user.
    pub fn direction(&self) -> ProgressDirection {
        self.direction
    }

    /// Sweep direction of the indeterminate oscillation.
    pub fn indeterminate_direction(&self) -> ProgressDirection {
        self.indeterminate_direction
    }

    /// Direction the arc is drawn with in the current mode.
    pub fn effective_direction(&self) -> ProgressDirection {
        if self.indeterminate_mode {
            self.indeterminate_direction
        } else {
            self.direction
        }
    }

    /// Whether the indeterminate oscillation is on.
    pub fn is_indeterminate(&self) -> bool {
        self.indeterminate_mode
    }

    /// Start angle used outside indeterminate mode.
    pub fn start_angle(&self) -> f32 {
        self.start_angle
    }

    /// Start angle used while indeterminate mode is on.
    pub fn indeterminate_start_angle(&self) -> f32 {
        self.indeterminate_start_angle
    }

    /// Clamps `value` into `0.0..=progress_max`. NaN becomes 0.
    pub fn clamp_progress(&self, value: f32) -> f32 {
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, self.progress_max)
        }
    }

    /// Stores a clamped progress value and returns it.
    pub fn set_progress(&mut self, value: f32) -> f32 {
        self.progress = self.clamp_progress(value);
        self.progress
    }

    /// Stores a new maximum and re-clamps the progress.
    ///
    /// Negative or non-finite maxima fall back to [`DEFAULT_MAX_VALUE`].
    /// Returns the stored maximum.
    pub fn set_progress_max(&mut self, value: f32) -> f32 {
        self.progress_max = if value.is_finite() && value >= 0.0 {
            value
        } else {
            DEFAULT_MAX_VALUE
        };
        self.progress = self.clamp_progress(self.progress);
        self.progress_max
    }

    /// Sets the user sweep direction.
    pub fn set_direction(&mut self, direction: ProgressDirection) {
        self.direction = direction;
    }

    /// Sets the oscillation direction. Only drawn in indeterminate mode.
    pub fn set_indeterminate_direction(&mut self, direction: ProgressDirection) {
        self.indeterminate_direction = direction;
    }

    /// Sets the indeterminate flag.
    pub fn set_indeterminate(&mut self, enabled: bool) {
        self.indeterminate_mode = enabled;
    }

    /// Sets the start angle as an offset from the top of the circle.
    ///
    /// The offset is added to [`DEFAULT_START_ANGLE`], wrapped below 360 and
    /// clamped into `0.0..=360.0`. Returns the stored angle.
    pub fn set_start_angle(&mut self, offset: f32) -> f32 {
        let mut angle = offset + DEFAULT_START_ANGLE;
        if angle.is_finite() && angle > 360.0 {
            angle = angle.rem_euclid(360.0);
            if angle == 0.0 {
                angle = 360.0;
            }
        }
        self.start_angle = if angle.is_nan() {
            DEFAULT_START_ANGLE
        } else {
            angle.clamp(0.0, 360.0)
        };
        self.start_angle
    }

    /// Sets the indeterminate start angle.
    pub fn set_indeterminate_start_angle(&mut self, angle: f32) {
        self.indeterminate_start_angle = angle;
    }

    /// Moves the indeterminate start angle along with an animated progress
    /// value: `270 ± value * 360 / 100`, `+` when sweeping right to left.
    pub fn follow_indeterminate_value(&mut self, value: f32) {
        let update_angle = value * 360.0 / 100.0;
        self.indeterminate_start_angle =
            DEFAULT_START_ANGLE + self.indeterminate_direction.sweep_sign() * update_angle;
    }

    /// Puts the oscillation direction and indeterminate start angle back to
    /// their defaults. The user direction is kept.
    pub fn reset_oscillation(&mut self) {
        self.indeterminate_direction = ProgressDirection::default();
        self.indeterminate_start_angle = DEFAULT_START_ANGLE;
    }

    /// Progress scaled to `0..=100` of the maximum. Zero when the maximum is
    /// zero.
    pub fn real_progress(&self) -> f32 {
        if self.progress_max == 0.0 {
            0.0
        } else {
            self.progress * DEFAULT_MAX_VALUE / self.progress_max
        }
    }

    /// Signed sweep of the foreground arc in degrees.
    pub fn sweep_angle(&self) -> f32 {
        self.effective_direction().sweep_sign() * 360.0 * self.real_progress() / 100.0
    }

    /// Start angle of the foreground arc for the current mode.
    pub fn arc_start_angle(&self) -> f32 {
        if self.indeterminate_mode {
            self.indeterminate_start_angle
        } else {
            self.start_angle
        }
    }

    /// Start and sweep of the foreground arc.
    pub fn arc_angles(&self) -> ArcAngles {
        ArcAngles {
            start_angle: self.arc_start_angle(),
            sweep_angle: self.sweep_angle(),
        }
    }
}
