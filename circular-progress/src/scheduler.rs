//! Timer scheduling capability supplied by the host event loop.
//!
//! The progress bar never sleeps or spawns threads. It asks a [`Scheduler`]
//! for one-shot and recurring timers and receives the fired [`TimerId`]s back
//! through [`CircularProgressBar::on_timer`](crate::CircularProgressBar::on_timer).
//! Timers only record deadlines, so the host decides when callbacks run and
//! they never overlap with setter calls.
//!
//! [`ManualScheduler`] is an explicit-clock implementation. Hosts advance it
//! from their frame loop, tests advance it deterministically.
//!
//! ```
//! use std::time::Duration;
//!
//! use circular_progress::{ManualScheduler, Scheduler};
//!
//! let scheduler = ManualScheduler::new();
//! let id = scheduler.schedule_repeating(Duration::ZERO, Duration::from_millis(100));
//!
//! let mut fired = Vec::new();
//! scheduler.pump(Duration::from_millis(250), |timer| fired.push(timer));
//! assert_eq!(fired, vec![id, id, id]);
//! ```
use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use parking_lot::Mutex;

/// Handle of a scheduled timer. Unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Schedule-once, schedule-recurring and cancel, plus the clock the
/// deadlines are measured against.
pub trait Scheduler {
    /// Current scheduler time.
    fn now(&self) -> Duration;

    /// Schedules a timer that fires once after `delay`.
    fn schedule_once(&self, delay: Duration) -> TimerId;

    /// Schedules a timer that first fires after `delay` and then every
    /// `period`.
    fn schedule_repeating(&self, delay: Duration, period: Duration) -> TimerId;

    /// Cancels a timer. Cancelling an unknown or finished timer is a no-op.
    fn cancel(&self, id: TimerId);
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn schedule_once(&self, delay: Duration) -> TimerId {
        (**self).schedule_once(delay)
    }

    fn schedule_repeating(&self, delay: Duration, period: Duration) -> TimerId {
        (**self).schedule_repeating(delay, period)
    }

    fn cancel(&self, id: TimerId) {
        (**self).cancel(id)
    }
}

/// Shortest accepted period of a recurring timer.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    deadline: Duration,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
struct SchedulerState {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, TimerEntry>,
}

impl SchedulerState {
    fn insert(&mut self, delay: Duration, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            TimerEntry {
                deadline: self.now + delay,
                period: period.map(|period| period.max(MIN_PERIOD)),
            },
        );
        id
    }
}

/// A [`Scheduler`] whose clock only moves when the host advances it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    state: Mutex<SchedulerState>,
}

impl ManualScheduler {
    /// Creates a scheduler with its clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Recurring timers are rescheduled one period later.
    ///
    /// Ties fire in scheduling order.
    pub fn next_due(&self, until: Duration) -> Option<TimerId> {
        let mut state = self.state.lock();
        let (id, entry) = state
            .timers
            .iter()
            .filter(|(_, entry)| entry.deadline <= until)
            .min_by_key(|(id, entry)| (entry.deadline, **id))
            .map(|(id, entry)| (*id, *entry))?;

        state.now = state.now.max(entry.deadline);
        match entry.period {
            Some(period) => {
                if let Some(timer) = state.timers.get_mut(&id) {
                    timer.deadline = entry.deadline + period;
                }
            }
            None => {
                state.timers.remove(&id);
            }
        }
        Some(id)
    }

    /// Fires every timer due up to `until`, in deadline order, then moves the
    /// clock to `until`.
    ///
    /// `on_fire` runs without the scheduler lock held, so it may schedule or
    /// cancel timers; timers it schedules before `until` fire in the same pump.
    pub fn pump(&self, until: Duration, mut on_fire: impl FnMut(TimerId)) {
        while let Some(id) = self.next_due(until) {
            on_fire(id);
        }
        let mut state = self.state.lock();
        state.now = state.now.max(until);
    }

    /// Advances the clock by `by`, firing due timers through `on_fire`.
    pub fn advance(&self, by: Duration, on_fire: impl FnMut(TimerId)) {
        let until = self.now() + by;
        self.pump(until, on_fire);
    }

    /// Whether `id` is still scheduled.
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.state.lock().timers.contains_key(&id)
    }

    /// Number of scheduled timers.
    pub fn pending(&self) -> usize {
        self.state.lock().timers.len()
    }

    /// Deadline of the earliest scheduled timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state
            .lock()
            .timers
            .values()
            .map(|entry| entry.deadline)
            .min()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.state.lock().now
    }

    fn schedule_once(&self, delay: Duration) -> TimerId {
        self.state.lock().insert(delay, None)
    }

    fn schedule_repeating(&self, delay: Duration, period: Duration) -> TimerId {
        self.state.lock().insert(delay, Some(period))
    }

    fn cancel(&self, id: TimerId) {
        self.state.lock().timers.remove(&id);
    }
}
