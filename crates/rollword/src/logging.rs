#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! Logs go to stderr; stdout is the render surface. The filter comes from
//! `ROLLWORD_LOG` when set, otherwise from `[logging] level`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::Result;
use crate::settings::LoggingSettings;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "ROLLWORD_LOG";

/// The filter directive to use, given the environment value (if any).
#[must_use]
pub fn filter_directive<'a>(env: Option<&'a str>, settings: &'a LoggingSettings) -> &'a str {
    match env.map(str::trim) {
        Some(directive) if !directive.is_empty() => directive,
        _ => settings.level.trim(),
    }
}

/// Parse the effective filter.
pub fn build_filter(env: Option<&str>, settings: &LoggingSettings) -> Result<EnvFilter> {
    Ok(EnvFilter::try_new(filter_directive(env, settings))?)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(env.as_deref(), settings)?;
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt.json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt)
            .try_init()?;
    }
    tracing::debug!(json = settings.json, "logging initialized");
    Ok(())
}
