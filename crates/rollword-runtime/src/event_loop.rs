#![forbid(unsafe_code)]

//! Single-threaded cooperative event loop.
//!
//! The loop owns a [`Clock`] and a [`ShutdownSignal`]. Each iteration polls
//! every widget at the current time, then sleeps until the earliest armed
//! deadline. Nothing runs in parallel: timers fire only from inside
//! [`EventLoop::run_until_idle`], one widget after another.
//!
//! # How it works
//!
//! 1. Read `now` from the clock and [`Scheduled::poll`] each widget
//! 2. Collect [`Scheduled::next_deadline`]; if none is armed, return
//!    [`LoopExit::Idle`]
//! 3. Sleep until that deadline, waking early on shutdown
//! 4. On shutdown, tear every widget down and return [`LoopExit::Shutdown`]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::engine::Advance;
use crate::shutdown::{ShutdownHandle, ShutdownSignal};

/// Something the loop can drive.
pub trait Scheduled {
    /// Fire everything due at `now`.
    fn poll(&mut self, now: Duration) -> Advance;

    /// Earliest armed deadline, or `None` when idle.
    fn next_deadline(&self) -> Option<Duration>;

    /// Release every armed timer without rendering.
    fn teardown(&mut self);
}

/// Source of the loop's notion of "now", as an offset from its epoch.
pub trait Clock {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;

    /// Sleep until `deadline`, waking early if `shutdown` triggers.
    ///
    /// Returns `true` if shutdown was requested.
    fn sleep_until(&self, deadline: Duration, shutdown: &ShutdownSignal) -> bool;
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: web_time::Instant,
}

impl SystemClock {
    /// A clock whose epoch is the moment of creation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep_until(&self, deadline: Duration, shutdown: &ShutdownSignal) -> bool {
        let wait = deadline.saturating_sub(self.now());
        if wait.is_zero() {
            return shutdown.is_triggered();
        }
        shutdown.wait_timeout(wait)
    }
}

/// Virtual clock for tests. Sleeping jumps straight to the deadline.
///
/// Clones share the same time, so a test can keep one and hand another to
/// the loop.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// A clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get().saturating_add(delta));
    }

    /// Set the current time. Time never moves backwards.
    pub fn set(&self, now: Duration) {
        self.now.set(self.now.get().max(now));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep_until(&self, deadline: Duration, shutdown: &ShutdownSignal) -> bool {
        if shutdown.is_triggered() {
            return true;
        }
        self.set(deadline);
        false
    }
}

/// Why [`EventLoop::run_until_idle`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopExit {
    /// No widget has an armed timer.
    Idle,
    /// Shutdown was requested; every widget was torn down.
    Shutdown,
}

/// Drives widgets against a clock.
pub struct EventLoop<C = SystemClock> {
    clock: C,
    shutdown: ShutdownSignal,
}

impl EventLoop<SystemClock> {
    /// A loop on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for EventLoop<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EventLoop<C> {
    /// A loop on a custom clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// The loop's clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current loop time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// A handle that stops the loop from any thread.
    #[must_use]
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.handle()
    }

    /// Whether shutdown was requested.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Sleep for `delay`, waking early on shutdown.
    ///
    /// Returns `true` if shutdown was requested.
    pub fn pause(&self, delay: Duration) -> bool {
        let deadline = self.clock.now().saturating_add(delay);
        self.clock.sleep_until(deadline, &self.shutdown)
    }

    /// Poll `widgets` until none has an armed timer or shutdown is requested.
    pub fn run_until_idle(&mut self, widgets: &mut [&mut dyn Scheduled]) -> LoopExit {
        loop {
            if self.shutdown.is_triggered() {
                return self.teardown(widgets);
            }

            let now = self.clock.now();
            for widget in widgets.iter_mut() {
                widget.poll(now);
            }

            let Some(deadline) = widgets.iter().filter_map(|w| w.next_deadline()).min() else {
                tracing::trace!(now_ms = now.as_millis() as u64, "event loop idle");
                return LoopExit::Idle;
            };
            if self.clock.sleep_until(deadline, &self.shutdown) {
                return self.teardown(widgets);
            }
        }
    }

    fn teardown(&self, widgets: &mut [&mut dyn Scheduled]) -> LoopExit {
        tracing::info!(widgets = widgets.len(), "shutdown requested, tearing down");
        for widget in widgets.iter_mut() {
            widget.teardown();
        }
        LoopExit::Shutdown
    }
}
