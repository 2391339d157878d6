//! Cancelable delayed tasks and the wall clock they run against.
//!
//! Timed work is named by a [`Timer`] rather than a closure: the scheduler
//! hands the timer back to the owner of the application context when it is
//! due, and the context dispatches it. This keeps every callback on the one
//! execution context and lets tests drive time with [`ManualScheduler`].

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Timed callbacks the notepad schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Debounced save of the pending document text.
    Save,
    /// Paste has settled into the input surface.
    PasteSettled,
    /// Hide the "saved" indicator.
    HideSaveIndicator,
    /// Periodic re-render of the last-save relative time.
    RefreshLastSave,
}

/// Opaque handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Source of time and delayed tasks.
pub trait Scheduler {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Schedule `timer` to fire once after `delay`.
    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle;

    /// Cancel a scheduled timer. Cancelling a fired or unknown handle is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TimerHandle,
    due: DateTime<Utc>,
    timer: Timer,
}

/// Simulated clock for deterministic tests.
///
/// Time only moves when the caller advances it. Timers due at the same
/// instant fire in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    now: DateTime<Utc>,
    next_handle: u64,
    queue: Vec<Scheduled>,
}

impl ManualScheduler {
    /// Create a scheduler whose clock starts at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: start,
            next_handle: 1,
            queue: Vec::new(),
        }
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Returns `None` when nothing is due; the clock is left
    /// unchanged in that case.
    pub fn next_due(&mut self, until: DateTime<Utc>) -> Option<Timer> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= until)
            .min_by_key(|(_, s)| (s.due, s.handle))
            .map(|(i, _)| i)?;

        let scheduled = self.queue.remove(index);
        if scheduled.due > self.now {
            self.now = scheduled.due;
        }
        Some(scheduled.timer)
    }

    /// Move the clock forward to `t` without firing anything.
    pub fn advance_to(&mut self, t: DateTime<Utc>) {
        if t > self.now {
            self.now = t;
        }
    }

    /// Move the clock forward by `d` without firing anything.
    pub fn advance_by(&mut self, d: Duration) {
        self.now += delta(d);
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether a timer of the given kind is waiting to fire.
    pub fn is_scheduled(&self, timer: Timer) -> bool {
        self.queue.iter().any(|s| s.timer == timer)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.queue.push(Scheduled {
            handle,
            due: self
                .now
                .checked_add_signed(delta(delay))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            timer,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.queue.retain(|s| s.handle != handle);
    }
}

fn delta(d: Duration) -> chrono::TimeDelta {
    chrono::TimeDelta::from_std(d).unwrap_or(chrono::TimeDelta::MAX)
}
