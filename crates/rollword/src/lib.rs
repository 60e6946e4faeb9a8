#![forbid(unsafe_code)]

//! Rolling word terminal host.
//!
//! Mounts one rolling word widget on the current terminal line: scramble
//! frames overwrite each other in place, then a randomly chosen word stays.
//!
//! # Key Components
//!
//! - [`Settings`] - TOML settings: widget declarations, named lists, resolver defaults, logging
//! - [`Cli`] - command-line flags layered over the settings file
//! - [`TerminalSurface`] - crossterm single-line render surface
//! - [`execute`] - mount, roll, pause, repeat
//!
//! The library crates are re-exported whole.

pub mod cli;
pub mod error;
pub mod host;
pub mod logging;
pub mod settings;
#[cfg(unix)]
pub mod signals;
pub mod terminal;

pub use cli::{Cli, run, run_from_env};
pub use error::{Error, Result};
pub use host::{RunPlan, RunReport, execute};
pub use settings::Settings;
pub use terminal::TerminalSurface;

pub use rollword_core;
pub use rollword_runtime;
