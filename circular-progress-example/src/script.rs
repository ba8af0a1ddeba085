//! Scripted replay of the interactive demo: each step is what a user would
//! have done with one of the demo's sliders or switches.
use std::time::Duration;

use circular_progress::{CircularProgressBar, Color, Dp, ProgressDirection};

const INDIGO: u32 = 0xFF3F51B5;
const BACKGROUND_ALPHA: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    AnimateTo { target: f32, duration: Duration },
    SeekProgress(f32),
    SeekStartAngle(f32),
    SeekStrokeWidths { foreground: Dp, background: Dp },
    PickColor(Color),
    RoundBorder(bool),
    Direction(ProgressDirection),
    Indeterminate(bool),
}

impl Action {
    pub fn apply(self, bar: &mut CircularProgressBar) {
        match self {
            Action::AnimateTo { target, duration } => {
                bar.animate_progress_to(target, Some(duration))
            }
            Action::SeekProgress(progress) => bar.set_progress(progress),
            Action::SeekStartAngle(angle) => bar.set_start_angle(angle),
            Action::SeekStrokeWidths {
                foreground,
                background,
            } => {
                bar.set_stroke_width(foreground);
                bar.set_background_stroke_width(background);
            }
            Action::PickColor(color) => {
                bar.set_color(color);
                bar.set_background_color(color.adjust_alpha(BACKGROUND_ALPHA));
            }
            Action::RoundBorder(round) => bar.set_round_border(round),
            Action::Direction(direction) => bar.set_direction(direction),
            Action::Indeterminate(enable) => bar.set_indeterminate_mode(enable),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub at: Duration,
    pub label: &'static str,
    pub action: Action,
}

pub struct Script {
    steps: Vec<Step>,
    next: usize,
    end: Duration,
}

impl Script {
    /// The demo timeline; indeterminate mode stays on for `indeterminate`.
    pub fn demo(indeterminate: Duration) -> Self {
        let ms = Duration::from_millis;
        let indeterminate_on = ms(5500);
        let indeterminate_off = indeterminate_on + indeterminate;
        let steps = vec![
            Step {
                at: Duration::ZERO,
                label: "animate to 65",
                action: Action::AnimateTo {
                    target: 65.0,
                    duration: ms(1000),
                },
            },
            Step {
                at: ms(2000),
                label: "progress slider",
                action: Action::SeekProgress(30.0),
            },
            Step {
                at: ms(2500),
                label: "start angle slider",
                action: Action::SeekStartAngle(90.0),
            },
            Step {
                at: ms(3000),
                label: "stroke width sliders",
                action: Action::SeekStrokeWidths {
                    foreground: Dp(6.0),
                    background: Dp(3.0),
                },
            },
            Step {
                at: ms(3500),
                label: "color slider",
                action: Action::PickColor(Color::from_argb_u32(INDIGO)),
            },
            Step {
                at: ms(4000),
                label: "round border",
                action: Action::RoundBorder(true),
            },
            Step {
                at: ms(4500),
                label: "direction",
                action: Action::Direction(ProgressDirection::RightToLeft),
            },
            Step {
                at: indeterminate_on,
                label: "indeterminate on",
                action: Action::Indeterminate(true),
            },
            Step {
                at: indeterminate_off,
                label: "indeterminate off",
                action: Action::Indeterminate(false),
            },
            Step {
                at: indeterminate_off + ms(500),
                label: "animate to 100",
                action: Action::AnimateTo {
                    target: 100.0,
                    duration: ms(1500),
                },
            },
        ];
        Self::new(steps, indeterminate_off + ms(2500))
    }

    pub fn new(mut steps: Vec<Step>, end: Duration) -> Self {
        steps.sort_by_key(|step| step.at);
        Self {
            steps,
            next: 0,
            end,
        }
    }

    /// Applies every step due at `elapsed` and returns the label of the last
    /// one applied.
    pub fn run_due(
        &mut self,
        elapsed: Duration,
        bar: &mut CircularProgressBar,
    ) -> Option<&'static str> {
        let mut last = None;
        while let Some(step) = self.steps.get(self.next).filter(|step| step.at <= elapsed) {
            tracing::info!(label = step.label, at_ms = step.at.as_millis() as u64, "demo step");
            step.action.apply(bar);
            last = Some(step.label);
            self.next += 1;
        }
        last
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.next >= self.steps.len() && elapsed >= self.end
    }
}
