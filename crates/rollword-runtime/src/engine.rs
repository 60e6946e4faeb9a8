#![forbid(unsafe_code)]

//! The two-phase roll engine.
//!
//! A roll scrambles for a while, then settles on a word:
//!
//! 1. [`RollEngine::start`] snapshots the configuration and arms two timers:
//!    a repeating tick timer and a one-shot settle timer.
//! 2. Every tick renders a fresh frame of random alphabet characters.
//! 3. When the settle timer fires, the tick timer is disarmed, one word is
//!    picked and rendered, and the engine returns to [`RunState::Idle`].
//!
//! `start` while a roll is in flight does nothing: the running roll owns the
//! outcome. The timers live inside the rolling state, so returning to idle
//! (by settling or by [`RollEngine::release`]) drops them.
//!
//! The engine does not read a clock. The host passes the current time to
//! [`RollEngine::advance`], which fires whatever is due in deadline order.
//! Ticks due at or before the settle deadline always render before the
//! settled word, and no tick renders after it.
//!
//! # Example
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use rollword_core::{Alphabet, RollConfig};
//! use rollword_runtime::engine::{RollEngine, RunState};
//! use rollword_runtime::surface::RecordingSurface;
//! use std::time::Duration;
//!
//! let ms = Duration::from_millis;
//! let config = RollConfig::new(["OK"])
//!     .alphabet(Alphabet::parse("X").unwrap())
//!     .tick_interval(ms(10))
//!     .total_duration(ms(30))
//!     .frame_length(3);
//!
//! let mut engine = RollEngine::with_rng(SmallRng::seed_from_u64(7));
//! let mut surface = RecordingSurface::new();
//! engine.start(&config, ms(0)).unwrap();
//! engine.advance(ms(30), &mut surface);
//!
//! assert_eq!(surface.frames(), ["XXX", "XXX", "XXX", "OK"]);
//! assert_eq!(engine.state(), RunState::Idle);
//! ```

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rollword_core::{ConfigError, RollConfig, pick_uniform, scramble_frame};

use crate::surface::RenderSurface;
use crate::timer::{OneShotTimer, RepeatingTimer};

/// Whether a roll is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No timers armed.
    #[default]
    Idle,
    /// Tick and settle timers armed.
    Rolling,
}

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartOutcome {
    /// A new roll began.
    Started,
    /// A roll was already in flight; nothing changed.
    AlreadyRolling,
    /// No words are available and the host tolerates that; nothing renders.
    Deferred,
    /// The widget is not mounted; nothing was scheduled.
    Detached,
}

/// What one call to [`RollEngine::advance`] rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advance {
    /// Scramble frames rendered.
    pub ticks: usize,
    /// The settled word, if the roll ended during this call.
    pub settled: Option<String>,
}

impl Advance {
    /// Whether anything was rendered.
    #[must_use]
    pub fn rendered(&self) -> bool {
        self.ticks > 0 || self.settled.is_some()
    }
}

/// Timers and configuration owned by an in-flight roll.
#[derive(Debug, Clone)]
struct ActiveRoll {
    config: RollConfig,
    tick: RepeatingTimer,
    settle: OneShotTimer,
    started_at: Duration,
    ticks: u64,
}

#[derive(Debug, Clone)]
enum Run {
    Idle,
    Rolling(Box<ActiveRoll>),
}

/// Drives scramble ticks and the final settle for one widget.
#[derive(Debug)]
pub struct RollEngine<R = SmallRng> {
    run: Run,
    rng: R,
    runs: u64,
}

impl RollEngine<SmallRng> {
    /// Create an idle engine with an OS-seeded RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }
}

impl Default for RollEngine<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RollEngine<R> {
    /// Create an idle engine drawing from `rng`.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            run: Run::Idle,
            rng,
            runs: 0,
        }
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        match self.run {
            Run::Idle => RunState::Idle,
            Run::Rolling(_) => RunState::Rolling,
        }
    }

    /// Whether a roll is in flight.
    #[must_use]
    pub fn is_rolling(&self) -> bool {
        matches!(self.run, Run::Rolling(_))
    }

    /// Number of rolls that have settled.
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Configuration snapshot of the in-flight roll.
    #[must_use]
    pub fn active_config(&self) -> Option<&RollConfig> {
        match &self.run {
            Run::Idle => None,
            Run::Rolling(active) => Some(&active.config),
        }
    }

    /// Earliest armed deadline, if rolling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match &self.run {
            Run::Idle => None,
            Run::Rolling(active) => Some(
                active
                    .tick
                    .next_deadline()
                    .min(active.settle.deadline()),
            ),
        }
    }

    /// Begin a roll at `now`.
    ///
    /// A no-op while rolling. Fails without changing state when `config`
    /// has no words.
    pub fn start(&mut self, config: &RollConfig, now: Duration) -> Result<StartOutcome, ConfigError> {
        if self.is_rolling() {
            tracing::debug!(now_ms = now.as_millis() as u64, "start ignored while rolling");
            return Ok(StartOutcome::AlreadyRolling);
        }
        if !config.has_words() {
            return Err(ConfigError::NoWords { list: None });
        }

        let active = ActiveRoll {
            config: config.clone(),
            tick: RepeatingTimer::new(now, config.interval()),
            settle: OneShotTimer::new(now, config.duration()),
            started_at: now,
            ticks: 0,
        };
        tracing::info!(
            words = config.words().len(),
            tick_ms = config.interval().as_millis() as u64,
            duration_ms = config.duration().as_millis() as u64,
            frame_length = config.length(),
            "roll started"
        );
        self.run = Run::Rolling(Box::new(active));
        Ok(StartOutcome::Started)
    }

    /// Fire every timer due at `now`, rendering into `surface`.
    pub fn advance<S>(&mut self, now: Duration, surface: &mut S) -> Advance
    where
        S: RenderSurface + ?Sized,
    {
        let Run::Rolling(active) = &mut self.run else {
            return Advance::default();
        };
        let _span = tracing::debug_span!("roll.advance", now_ms = now.as_millis() as u64).entered();

        let mut advance = Advance::default();
        let limit = now.min(active.settle.deadline());
        while active.tick.fire_due(limit).is_some() {
            let frame = scramble_frame(
                active.config.scramble_alphabet(),
                active.config.length(),
                &mut self.rng,
            );
            tracing::trace!(frame = %frame, "tick");
            surface.render(&frame);
            active.ticks += 1;
            advance.ticks += 1;
        }

        if active.settle.is_due(now) {
            advance.settled = self.settle(surface);
        }
        advance
    }

    /// Drop the in-flight roll without rendering.
    ///
    /// Returns `true` if a roll was released.
    pub fn release(&mut self) -> bool {
        match std::mem::replace(&mut self.run, Run::Idle) {
            Run::Idle => false,
            Run::Rolling(active) => {
                tracing::debug!(ticks = active.ticks, "roll released");
                true
            }
        }
    }

    fn settle<S>(&mut self, surface: &mut S) -> Option<String>
    where
        S: RenderSurface + ?Sized,
    {
        // Disarming the tick timer and rendering the word happen in one step.
        let Run::Rolling(active) = std::mem::replace(&mut self.run, Run::Idle) else {
            return None;
        };
        self.runs += 1;

        let Some(word) = pick_uniform(active.config.words(), &mut self.rng).cloned() else {
            tracing::warn!("settle found no words; nothing rendered");
            return None;
        };
        surface.render(&word);
        tracing::info!(
            word = %word,
            ticks = active.ticks,
            elapsed_ms = active.settle.deadline().saturating_sub(active.started_at).as_millis() as u64,
            "roll settled"
        );
        Some(word)
    }
}
