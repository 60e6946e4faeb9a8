#![forbid(unsafe_code)]

//! Top-level error for the terminal host.

use std::io;
use std::path::PathBuf;

use rollword_core::{ConfigError, WordSourceError};
use thiserror::Error;

/// Everything that can stop the `rollword` binary.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WordSource(#[from] WordSourceError),

    #[error("cannot read settings {}: {source}", .path.display())]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("invalid log filter: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("cannot install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("terminal output failed: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::WordSource(_) | Self::SettingsIo { .. } | Self::Settings(_) | Self::LogFilter(_) => {
                3
            }
            Self::Logging(_) | Self::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
