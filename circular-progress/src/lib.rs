//! circular-progress is a host-agnostic circular progress bar widget.
//!
//! The widget draws a full background ring and a foreground arc whose sweep
//! is proportional to `progress / progress_max`. Progress can be set directly,
//! animated with easing, or replaced by an indeterminate oscillation that
//! sweeps the arc back and forth.
//!
//! # Host integration
//!
//! Nothing here owns a window, a thread or a clock. A host provides three
//! capabilities:
//!
//! - a [`Scheduler`] that records timer deadlines ([`ManualScheduler`] is
//!   bundled), and routes fired [`TimerId`]s to
//!   [`CircularProgressBar::on_timer`];
//! - an [`Invalidator`] that receives redraw and re-layout requests;
//! - a [`Canvas`](paint::Canvas) that strokes ovals and arcs.
//!
//! ```
//! use std::sync::Arc;
//!
//! use circular_progress::{
//!     CircularProgressBar, CircularProgressBarArgs, Dp, ManualScheduler, NoopInvalidator,
//!     ProgressDirection,
//! };
//!
//! let mut bar = CircularProgressBar::new(
//!     CircularProgressBarArgs::default()
//!         .progress_max(50.0)
//!         .progress(40.0)
//!         .stroke_width(Dp(6.0))
//!         .direction(ProgressDirection::RightToLeft),
//!     Arc::new(ManualScheduler::new()),
//!     Arc::new(NoopInvalidator),
//! );
//!
//! assert_eq!(bar.real_progress(), 80.0);
//! assert_eq!(bar.sweep_angle(), 288.0);
//!
//! bar.set_progress(500.0);
//! assert_eq!(bar.progress(), 50.0);
//! ```
//!
//! # Declarative configuration
//!
//! Widgets can also be configured from an [`AttributeSet`], such as an
//! [`AttributeMap`] loaded from TOML. See the [`attributes`] module.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod animation;
pub mod attributes;
pub mod color;
pub mod constraint;
pub mod dp;
pub mod measure;
pub mod paint;
pub mod px;
pub mod scheduler;
pub mod state;
mod widget;

pub use crate::{
    animation::{AnimationSpec, Easing},
    attributes::{AttributeMap, AttributeSet, AttributeValue},
    color::Color,
    constraint::{ComputedData, DimensionValue},
    dp::Dp,
    paint::{ArcRect, Brush, Canvas, GradientDirection, Paint, StrokeCap},
    px::Px,
    scheduler::{ManualScheduler, Scheduler, TimerId},
    state::{ArcAngles, ProgressDirection, ProgressState},
    widget::{
        CircularProgressBar, CircularProgressBarArgs, CircularProgressBarDefaults, Invalidator,
        NoopInvalidator,
    },
};
