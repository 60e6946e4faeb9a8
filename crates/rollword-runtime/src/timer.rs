#![forbid(unsafe_code)]

//! Deadline timers on a caller-supplied clock.
//!
//! Timers never read the wall clock. The owner passes the current time (an
//! offset from its loop epoch) and asks which deadlines are due, which keeps
//! them deterministic under a manual clock.
//!
//! # Example
//! ```
//! use rollword_runtime::timer::{OneShotTimer, RepeatingTimer};
//! use std::time::Duration;
//!
//! let ms = Duration::from_millis;
//! let mut tick = RepeatingTimer::new(ms(0), ms(10));
//! let settle = OneShotTimer::new(ms(0), ms(25));
//!
//! assert_eq!(tick.fire_due(ms(25)), Some(ms(10)));
//! assert_eq!(tick.fire_due(ms(25)), Some(ms(20)));
//! assert_eq!(tick.fire_due(ms(25)), None);
//! assert!(settle.is_due(ms(25)));
//! ```

use std::time::Duration;

/// Smallest interval a repeating timer accepts.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A timer that fires every `interval` after it was armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatingTimer {
    interval: Duration,
    next: Duration,
}

impl RepeatingTimer {
    /// Arm a timer at `now`; the first deadline is `now + interval`.
    ///
    /// Intervals below [`MIN_INTERVAL`] are raised to it.
    #[must_use]
    pub fn new(now: Duration, interval: Duration) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next: now.saturating_add(interval),
        }
    }

    /// The firing interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The next deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Duration {
        self.next
    }

    /// Consume the next deadline if it is at or before `limit`.
    ///
    /// Returns the deadline that fired. Call repeatedly to replay every
    /// deadline missed since the last call.
    pub fn fire_due(&mut self, limit: Duration) -> Option<Duration> {
        if self.next > limit || self.next == Duration::MAX {
            return None;
        }
        let fired = self.next;
        self.next = self.next.saturating_add(self.interval);
        Some(fired)
    }
}

/// A timer that fires once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Duration,
}

impl OneShotTimer {
    /// Arm a timer at `now` that is due `after` later.
    #[must_use]
    pub fn new(now: Duration, after: Duration) -> Self {
        Self {
            deadline: now.saturating_add(after),
        }
    }

    /// The deadline.
    #[must_use]
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Whether the deadline has been reached at `now`.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        now >= self.deadline
    }

    /// Time left until the deadline (zero once due).
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.deadline.saturating_sub(now)
    }
}
