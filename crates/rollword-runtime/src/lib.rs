#![forbid(unsafe_code)]

//! Rolling word runtime.
//!
//! This crate turns a resolved [`rollword_core::RollConfig`] into timed
//! renders: scramble frames on a repeating tick, then one settled word.
//!
//! # Key Components
//!
//! - [`RollEngine`] - Idle/Rolling state machine owning the tick and settle timers
//! - [`RollingWord`] - mountable widget: option declarations, word sources, lifecycle
//! - [`EventLoop`] - single-threaded loop sleeping until the next deadline
//! - [`RenderSurface`] - where frames and the settled word go
//! - [`ShutdownHandle`] - wakes the loop and tears every widget down
//!
//! # How it fits in the system
//! `rollword-core` decides *what* to roll; this crate decides *when* each
//! frame renders. Neither reads a clock directly except [`SystemClock`], so
//! every timing property can be checked under a [`ManualClock`].

pub mod engine;
pub mod event_loop;
pub mod shutdown;
pub mod surface;
pub mod timer;
pub mod widget;

pub use engine::{Advance, RollEngine, RunState, StartOutcome};
pub use event_loop::{Clock, EventLoop, LoopExit, ManualClock, Scheduled, SystemClock};
pub use shutdown::{ShutdownHandle, ShutdownSignal};
pub use surface::{RecordingSurface, RenderSurface};
pub use timer::{MIN_INTERVAL, OneShotTimer, RepeatingTimer};
pub use widget::{RollingWord, SharedLists};
