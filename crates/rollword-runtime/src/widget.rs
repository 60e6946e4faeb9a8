#![forbid(unsafe_code)]

//! The rolling word widget: declared options, word sources and lifecycle.
//!
//! [`RollingWord`] is what a host mounts. It keeps the raw option
//! declarations, re-resolves its [`RollConfig`] whenever one of them (or a
//! word source) changes, and forwards lifecycle hooks to its [`RollEngine`]:
//!
//! - [`on_mount`](RollingWord::on_mount) starts the first roll
//! - [`roll`](RollingWord::roll) starts another one (ignored while rolling)
//! - [`on_unmount`](RollingWord::on_unmount) releases any armed timers
//!
//! A roll in flight keeps the configuration it started with; changes apply
//! from the next roll.
//!
//! # Example
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use rollword_runtime::surface::RecordingSurface;
//! use rollword_runtime::widget::RollingWord;
//! use std::time::Duration;
//!
//! let mut widget = RollingWord::new(RecordingSurface::new())
//!     .with_rng(SmallRng::seed_from_u64(1))
//!     .inline_words(["HELLO", "WORLD"])
//!     .attribute("duration", "300");
//!
//! widget.on_mount(Duration::ZERO).unwrap();
//! widget.poll(Duration::from_millis(300));
//!
//! let settled = widget.surface().last().unwrap();
//! assert!(settled == "HELLO" || settled == "WORLD");
//! ```

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::rngs::SmallRng;
use rollword_core::{
    ConfigError, ConfigResolver, DeclaredOptions, EmptyWordsPolicy, ListLookup, ListRegistry,
    OptionName, RollConfig, normalize_words,
};

use crate::engine::{Advance, RollEngine, RunState, StartOutcome};
use crate::event_loop::Scheduled;
use crate::surface::RenderSurface;

/// Shared, read-only word lists a widget's `list` option refers to.
pub type SharedLists = Arc<dyn ListLookup + Send + Sync>;

/// A mountable rolling word display.
pub struct RollingWord<S, R = SmallRng> {
    options: DeclaredOptions,
    inline: Vec<String>,
    lists: SharedLists,
    resolver: ConfigResolver,
    policy: EmptyWordsPolicy,
    config: RollConfig,
    engine: RollEngine<R>,
    surface: S,
    mounted: bool,
}

impl<S: RenderSurface> RollingWord<S, SmallRng> {
    /// Create an unmounted widget rendering into `surface`.
    #[must_use]
    pub fn new(surface: S) -> Self {
        let lists: SharedLists = Arc::new(ListRegistry::new());
        let resolver = ConfigResolver::new();
        let options = DeclaredOptions::new();
        let config = resolver.resolve(&options, lists.as_ref(), &[]);
        Self {
            options,
            inline: Vec::new(),
            lists,
            resolver,
            policy: EmptyWordsPolicy::default(),
            config,
            engine: RollEngine::new(),
            surface,
            mounted: false,
        }
    }
}

impl<S: RenderSurface, R: Rng> RollingWord<S, R> {
    /// Replace the random source. Any in-flight roll is released.
    #[must_use]
    pub fn with_rng<R2: Rng>(self, rng: R2) -> RollingWord<S, R2> {
        RollingWord {
            options: self.options,
            inline: self.inline,
            lists: self.lists,
            resolver: self.resolver,
            policy: self.policy,
            config: self.config,
            engine: RollEngine::with_rng(rng),
            surface: self.surface,
            mounted: self.mounted,
        }
    }

    /// Builder form of [`set_inline_words`](Self::set_inline_words).
    #[must_use]
    pub fn inline_words<I, T>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.set_inline_words(words);
        self
    }

    /// Builder form of [`set_lists`](Self::set_lists).
    #[must_use]
    pub fn lists(mut self, lists: SharedLists) -> Self {
        self.set_lists(lists);
        self
    }

    /// Use a resolver with custom defaults.
    #[must_use]
    pub fn resolver(mut self, resolver: ConfigResolver) -> Self {
        self.resolver = resolver;
        self.reresolve();
        self
    }

    /// Choose how mounting without words behaves.
    #[must_use]
    pub fn empty_words(mut self, policy: EmptyWordsPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.set_attribute(name, Some(&value));
        self
    }

    /// Declare, change or remove an option.
    ///
    /// Returns `true` if the declaration changed (and the configuration was
    /// re-resolved).
    pub fn set_option(&mut self, name: OptionName, value: Option<String>) -> bool {
        if !self.options.set(name, value) {
            return false;
        }
        tracing::debug!(option = name.as_str(), value = ?self.options.get(name), "option changed");
        self.reresolve();
        true
    }

    /// Attribute-style variant of [`set_option`](Self::set_option).
    ///
    /// Names the widget does not observe are ignored and return `false`.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) -> bool {
        match OptionName::from_attribute(name) {
            Some(option) => self.set_option(option, value.map(str::to_string)),
            None => false,
        }
    }

    /// Replace the inline word list.
    pub fn set_inline_words<I, T>(&mut self, words: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.inline = normalize_words(words);
        self.reresolve();
    }

    /// Replace the external lists the `list` option resolves against.
    pub fn set_lists(&mut self, lists: SharedLists) {
        self.lists = lists;
        self.reresolve();
    }

    /// Mount the widget and start the first roll at `now`.
    ///
    /// With [`EmptyWordsPolicy::Strict`] this fails when no word resolves;
    /// the widget stays mounted so a later [`roll`](Self::roll) can succeed.
    pub fn on_mount(&mut self, now: Duration) -> Result<StartOutcome, ConfigError> {
        self.mounted = true;
        tracing::debug!(words = self.config.words().len(), "widget mounted");
        self.roll(now)
    }

    /// Unmount the widget, releasing any armed timers.
    pub fn on_unmount(&mut self) {
        if self.engine.release() {
            tracing::debug!("in-flight roll released on unmount");
        }
        self.mounted = false;
    }

    /// Start a roll at `now` unless one is in flight.
    pub fn roll(&mut self, now: Duration) -> Result<StartOutcome, ConfigError> {
        if !self.mounted {
            return Ok(StartOutcome::Detached);
        }
        if self.engine.is_rolling() {
            return self.engine.start(&self.config, now);
        }
        if !self.config.has_words() {
            let list = self.options.list().map(str::to_string);
            return match self.policy {
                EmptyWordsPolicy::Strict => {
                    tracing::warn!(list = ?list, "no words to roll");
                    Err(ConfigError::NoWords { list })
                }
                EmptyWordsPolicy::Permissive => {
                    tracing::debug!(list = ?list, "no words yet; staying blank");
                    Ok(StartOutcome::Deferred)
                }
            };
        }
        self.engine.start(&self.config, now)
    }

    /// Fire due timers, rendering into the surface.
    pub fn poll(&mut self, now: Duration) -> Advance {
        self.engine.advance(now, &mut self.surface)
    }

    /// Earliest armed deadline, if rolling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.engine.next_deadline()
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.engine.state()
    }

    /// Whether the host has mounted the widget.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of rolls that have settled.
    #[must_use]
    pub fn runs(&self) -> u64 {
        self.engine.runs()
    }

    /// The configuration the next roll would use.
    #[must_use]
    pub fn config(&self) -> &RollConfig {
        &self.config
    }

    /// The raw declarations.
    #[must_use]
    pub fn options(&self) -> &DeclaredOptions {
        &self.options
    }

    /// The render surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the render surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Tear down and return the surface.
    pub fn into_surface(mut self) -> S {
        self.on_unmount();
        self.surface
    }

    fn reresolve(&mut self) {
        self.config = self
            .resolver
            .resolve(&self.options, self.lists.as_ref(), &self.inline);
    }
}

impl<S: RenderSurface, R: Rng> Scheduled for RollingWord<S, R> {
    fn poll(&mut self, now: Duration) -> Advance {
        RollingWord::poll(self, now)
    }

    fn next_deadline(&self) -> Option<Duration> {
        RollingWord::next_deadline(self)
    }

    fn teardown(&mut self) {
        self.on_unmount();
    }
}
