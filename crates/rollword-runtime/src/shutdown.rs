#![forbid(unsafe_code)]

//! Host teardown signal for the event loop.
//!
//! The loop sleeps on a [`ShutdownSignal`] between deadlines. Any clone of
//! the matching [`ShutdownHandle`] (for example one owned by a signal
//! handler thread) wakes it immediately. Dropping a handle does not trigger
//! shutdown.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

struct Shared {
    triggered: Mutex<bool>,
    cvar: Condvar,
}

/// The waiting side, owned by the event loop.
#[derive(Clone)]
pub struct ShutdownSignal {
    inner: Arc<Shared>,
}

/// The triggering side. Cheap to clone and `Send`.
#[derive(Clone)]
pub struct ShutdownHandle {
    inner: Arc<Shared>,
}

impl ShutdownSignal {
    /// Create an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Shared {
                triggered: Mutex::new(false),
                cvar: Condvar::new(),
            }),
        }
    }

    /// A handle that triggers this signal.
    #[must_use]
    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether shutdown was requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self
            .inner
            .triggered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Block until shutdown is requested or `timeout` elapses.
    ///
    /// Returns `true` if shutdown was requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self
            .inner
            .triggered
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let (guard, _) = self
            .inner
            .cvar
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .unwrap_or_else(|e| e.into_inner());
        *guard
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    /// Request shutdown and wake the waiting loop.
    pub fn trigger(&self) {
        let mut triggered = self
            .inner
            .triggered
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *triggered = true;
        self.inner.cvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn starts_untriggered() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
    }

    #[test]
    fn trigger_is_observed() {
        let signal = ShutdownSignal::new();
        signal.handle().trigger();
        assert!(signal.is_triggered());
        assert!(signal.wait_timeout(Duration::from_secs(10)));
    }

    #[test]
    fn wait_times_out_without_trigger() {
        let signal = ShutdownSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn dropping_handle_does_not_trigger() {
        let signal = ShutdownSignal::new();
        drop(signal.handle());
        assert!(!signal.is_triggered());
    }

    #[test]
    fn trigger_from_other_thread_wakes_waiter() {
        let signal = ShutdownSignal::new();
        let handle = signal.handle();
        let start = Instant::now();
        let worker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.trigger();
        });
        assert!(signal.wait_timeout(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        worker.join().expect("worker");
    }
}
