#![forbid(unsafe_code)]

//! SIGINT/SIGTERM handling.
//!
//! A background thread waits for termination signals and triggers the
//! event loop's [`ShutdownHandle`]. The loop then unmounts its widgets and
//! returns, so the terminal line is finished cleanly instead of the process
//! dying mid-frame.

use std::io;

use rollword_runtime::ShutdownHandle;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

/// Keeps the signal thread alive. Dropping it stops the thread.
#[derive(Debug)]
pub struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SignalGuard {
    /// Route SIGINT and SIGTERM to `shutdown`.
    pub fn install(shutdown: ShutdownHandle) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                tracing::warn!(signal, "termination signal received, stopping");
                shutdown.trigger();
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
