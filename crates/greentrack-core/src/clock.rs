//! Virtual scene clock driving the timed transitions.
//!
//! The splash screen and the intro animation advance on timers. Rather than
//! sleeping, the coordinator owns a [`SceneClock`] that only moves when the
//! host tells it how much time has passed, so tests can step through the
//! sequence deterministically.
//!
//! # Design Principles
//!
//! - At most one timer is pending. Scheduling replaces it.
//! - Timers fire once. A fired timer is gone until rescheduled.
//! - Time never moves backwards and all additions are checked.

use std::time::Duration;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Virtual time would overflow.
    #[error("scene clock overflow: cannot advance beyond {now:?} by {by:?}")]
    Overflow {
        /// Current virtual time.
        now: Duration,
        /// The requested step.
        by: Duration,
    },
}

/// What a pending timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// The splash delay has elapsed.
    LoadingComplete,
    /// The current intro word has been shown long enough.
    IntroWord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    kind: TimerKind,
    deadline: Duration,
}

/// Monotonic virtual time with a single fire-once timer slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneClock {
    now: Duration,
    pending: Option<Timer>,
}

impl SceneClock {
    /// A clock at time zero with nothing scheduled.
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
            pending: None,
        }
    }

    /// Current virtual time since the clock was created.
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// The kind of the pending timer, if any.
    pub fn pending(&self) -> Option<TimerKind> {
        self.pending.map(|t| t.kind)
    }

    /// Schedule `kind` to fire `after` from now, replacing any pending timer.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if the deadline is not representable.
    pub fn schedule(&mut self, kind: TimerKind, after: Duration) -> Result<(), ClockError> {
        let deadline = self.offset(after)?;
        self.pending = Some(Timer { kind, deadline });
        Ok(())
    }

    /// Time left until the pending timer fires.
    pub fn time_until_due(&self) -> Option<Duration> {
        self.pending.map(|t| t.deadline.saturating_sub(self.now))
    }

    /// Compute the absolute time `by` from now.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Overflow`] if the result is not representable.
    pub fn offset(&self, by: Duration) -> Result<Duration, ClockError> {
        self.now
            .checked_add(by)
            .ok_or(ClockError::Overflow { now: self.now, by })
    }

    /// Move time forward towards `target`, stopping early at the pending
    /// deadline if it falls on or before `target`.
    ///
    /// Returns the timer that fired, if any. Call repeatedly until it
    /// returns `None` to process every timer up to `target`, rescheduling in
    /// between. A `target` in the past leaves time where it is.
    pub fn advance_until(&mut self, target: Duration) -> Option<TimerKind> {
        match self.pending {
            Some(timer) if timer.deadline <= target => {
                self.now = self.now.max(timer.deadline);
                self.pending = None;
                Some(timer.kind)
            }
            _ => {
                self.now = self.now.max(target);
                None
            }
        }
    }
}
