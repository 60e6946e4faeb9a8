#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rollword_core::{EmptyWordsPolicy, load_word_file};
use rollword_runtime::EventLoop;

use crate::error::Result;
use crate::host::{RunPlan, execute};
use crate::settings::{EmptyWords, OptionValue, Settings};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "rollword",
    about = "Scramble a line of text, then settle on a random word",
    version
)]
pub struct Cli {
    /// Inline words to settle on.
    #[arg(value_name = "WORD")]
    pub words: Vec<String>,

    /// Settings file (TOML).
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Word list file: `<option>` markup or one word per line.
    #[arg(long = "list-file", value_name = "FILE")]
    pub list_file: Option<PathBuf>,

    /// Name of a `[lists]` entry from the settings file.
    #[arg(long)]
    pub list: Option<String>,

    /// Milliseconds between scramble frames.
    #[arg(long, short = 's')]
    pub speed: Option<String>,

    /// Milliseconds of scrambling before settling.
    #[arg(long, short = 'd')]
    pub duration: Option<String>,

    /// Comma-separated scramble characters, e.g. "0,1".
    #[arg(long, short = 'a')]
    pub alphabet: Option<String>,

    /// Characters per scramble frame.
    #[arg(long, short = 'l')]
    pub length: Option<String>,

    /// Number of rolls before exiting.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub rolls: u32,

    /// Milliseconds to hold each settled word before the next roll.
    #[arg(long = "pause-ms", default_value_t = 500)]
    pub pause_ms: u64,

    /// Exit quietly instead of failing when no word is available.
    #[arg(long)]
    pub permissive: bool,

    /// Fixed RNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter directive (overridden by ROLLWORD_LOG).
    #[arg(long = "log-level", value_name = "DIRECTIVE")]
    pub log_level: Option<String>,

    /// Log as JSON lines.
    #[arg(long = "log-json")]
    pub log_json: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_toml_file(path)?,
        None => Settings::default(),
    };
    apply_overrides(&mut settings, &cli);
    crate::logging::init(&settings.logging)?;
    for problem in settings.validate() {
        tracing::warn!(%problem, "settings corrected");
    }

    let plan = build_plan(&cli, &settings)?;
    let mut event_loop = EventLoop::new();
    #[cfg(unix)]
    let _signals = crate::signals::SignalGuard::install(event_loop.shutdown_handle())?;

    let stdout = std::io::stdout();
    let report = execute(&plan, &mut event_loop, stdout.lock())?;
    if report.deferred {
        tracing::info!("no words available; nothing rendered");
    }
    Ok(())
}

/// Let command-line flags override the settings file.
pub fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    let widget = &mut settings.widget;
    if !cli.words.is_empty() {
        widget.words = cli.words.clone();
    }
    if let Some(list) = &cli.list {
        widget.list = Some(list.clone());
    }
    if let Some(speed) = &cli.speed {
        widget.speed = Some(OptionValue::from(speed.as_str()));
    }
    if let Some(duration) = &cli.duration {
        widget.duration = Some(OptionValue::from(duration.as_str()));
    }
    if let Some(alphabet) = &cli.alphabet {
        widget.alphabet = Some(alphabet.clone());
    }
    if let Some(length) = &cli.length {
        widget.length = Some(OptionValue::from(length.as_str()));
    }
    if cli.permissive {
        widget.empty_words = EmptyWords::Permissive;
    }
    if let Some(level) = &cli.log_level {
        settings.logging.level = level.clone();
    }
    if cli.log_json {
        settings.logging.json = true;
    }
}

/// Resolve the run plan, loading `--list-file` if given.
///
/// A loaded file is registered under its path and becomes the widget's
/// `list` reference.
pub fn build_plan(cli: &Cli, settings: &Settings) -> Result<RunPlan> {
    let mut options = settings.widget.declared_options();
    let mut lists = settings.list_registry();
    if let Some(path) = &cli.list_file {
        let words = load_word_file(path)?;
        let id = path.display().to_string();
        tracing::debug!(list = %id, words = words.len(), "word list file loaded");
        lists.insert(id.clone(), words);
        options.set(rollword_core::OptionName::List, Some(id));
    }

    Ok(RunPlan {
        options,
        inline: settings.widget.words.clone(),
        lists,
        defaults: settings.defaults.resolver_defaults(),
        policy: EmptyWordsPolicy::from(settings.widget.empty_words),
        rolls: cli.rolls,
        pause: Duration::from_millis(cli.pause_ms),
        seed: cli.seed,
    })
}
