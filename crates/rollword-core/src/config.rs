#![forbid(unsafe_code)]

//! Declared options and their resolution into a [`RollConfig`].
//!
//! Hosts declare options as loose strings, the way markup attributes arrive.
//! [`ConfigResolver::resolve`] turns a snapshot of those declarations (plus
//! the available word sources) into a validated configuration. Resolution is
//! a pure function: hosts call it again whenever a declaration changes
//! instead of patching the previous result.
//!
//! Malformed numeric values never produce an error. They fall back to the
//! resolver defaults and are reported at `debug` level only.
//!
//! # Example
//! ```
//! use rollword_core::config::{ConfigResolver, DeclaredOptions, OptionName};
//! use rollword_core::word_source::ListRegistry;
//! use std::time::Duration;
//!
//! let mut options = DeclaredOptions::new();
//! options.set(OptionName::Speed, Some("50".into()));
//! options.set(OptionName::Duration, Some("fast".into()));
//!
//! let inline = vec!["HELLO".to_string()];
//! let config = ConfigResolver::new().resolve(&options, &ListRegistry::new(), &inline);
//! assert_eq!(config.interval(), Duration::from_millis(50));
//! assert_eq!(config.duration(), Duration::from_millis(1000));
//! assert_eq!(config.words(), ["HELLO"]);
//! ```

use std::fmt;
use std::time::Duration;

use crate::word_source::{ListLookup, resolve_words};

/// Default scramble-frame cadence.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Default time spent scrambling before settling.
pub const DEFAULT_TOTAL_DURATION: Duration = Duration::from_millis(1000);

/// Default number of scrambled characters per frame.
pub const DEFAULT_FRAME_LENGTH: usize = 10;

/// Upper bound for the frame length; larger declarations are clamped.
pub const MAX_FRAME_LENGTH: usize = 4096;

/// Uppercase Latin letters followed by a space.
pub const DEFAULT_ALPHABET: [char; 27] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ',
];

// ---------------------------------------------------------------------------
// Declared options
// ---------------------------------------------------------------------------

/// The option names a rolling word widget observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    /// Reference to an external named word list.
    List,
    /// Tick interval in milliseconds.
    Speed,
    /// Total scramble duration in milliseconds.
    Duration,
    /// Comma-separated scramble characters.
    Alphabet,
    /// Characters per scramble frame.
    Length,
}

impl OptionName {
    /// Every observed option, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Speed,
        Self::Duration,
        Self::Alphabet,
        Self::Length,
    ];

    /// Map an attribute name to an observed option.
    ///
    /// Attribute names are matched ASCII case-insensitively. Returns `None`
    /// for names the widget does not observe.
    #[must_use]
    pub fn from_attribute(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// The attribute spelling of this option.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Speed => "speed",
            Self::Duration => "duration",
            Self::Alphabet => "alphabet",
            Self::Length => "length",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw option declarations, exactly as the host supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredOptions {
    list: Option<String>,
    speed: Option<String>,
    duration: Option<String>,
    alphabet: Option<String>,
    length: Option<String>,
}

impl DeclaredOptions {
    /// Create an empty declaration set (every option absent).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: OptionName, value: impl Into<String>) -> Self {
        self.set(name, Some(value.into()));
        self
    }

    /// Declare or remove an option.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, name: OptionName, value: Option<String>) -> bool {
        let slot = self.slot_mut(name);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Current raw value of an option.
    #[must_use]
    pub fn get(&self, name: OptionName) -> Option<&str> {
        match name {
            OptionName::List => self.list.as_deref(),
            OptionName::Speed => self.speed.as_deref(),
            OptionName::Duration => self.duration.as_deref(),
            OptionName::Alphabet => self.alphabet.as_deref(),
            OptionName::Length => self.length.as_deref(),
        }
    }

    /// The external list reference, if declared and non-blank.
    #[must_use]
    pub fn list(&self) -> Option<&str> {
        self.list.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    fn slot_mut(&mut self, name: OptionName) -> &mut Option<String> {
        match name {
            OptionName::List => &mut self.list,
            OptionName::Speed => &mut self.speed,
            OptionName::Duration => &mut self.duration,
            OptionName::Alphabet => &mut self.alphabet,
            OptionName::Length => &mut self.length,
        }
    }
}

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// A non-empty, duplicate-free set of scramble characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    /// Build an alphabet from characters, dropping duplicates.
    ///
    /// Returns `None` when no character is supplied.
    #[must_use]
    pub fn new(chars: impl IntoIterator<Item = char>) -> Option<Self> {
        let mut unique = Vec::new();
        for ch in chars {
            if !unique.contains(&ch) {
                unique.push(ch);
            }
        }
        (!unique.is_empty()).then_some(Self(unique))
    }

    /// Parse a comma-separated declaration such as `"A,B, "`.
    ///
    /// Tokens are taken verbatim, so `" "` declares a space. Empty tokens
    /// and tokens longer than one character are skipped.
    #[must_use]
    pub fn parse(declared: &str) -> Option<Self> {
        Self::new(declared.split(',').filter_map(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(ch),
                _ => None,
            }
        }))
    }

    /// The characters, in declaration order.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.0
    }

    /// Whether `ch` belongs to the alphabet.
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.0.contains(&ch)
    }

    /// Number of distinct characters (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self(DEFAULT_ALPHABET.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// The effective parameters of one roll.
///
/// Immutable once a roll starts; the engine keeps its own snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollConfig {
    words: Vec<String>,
    alphabet: Alphabet,
    tick_interval: Duration,
    total_duration: Duration,
    frame_length: usize,
}

impl RollConfig {
    /// Create a configuration with the given words and default parameters.
    ///
    /// Words are trimmed and blank entries dropped.
    #[must_use]
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let defaults = ResolverDefaults::default();
        Self {
            words: crate::word_source::normalize_words(words),
            alphabet: defaults.alphabet,
            tick_interval: defaults.tick_interval,
            total_duration: defaults.total_duration,
            frame_length: defaults.frame_length,
        }
    }

    /// Set the scramble alphabet.
    #[must_use]
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Set the tick interval. Zero is raised to one millisecond.
    #[must_use]
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Set the total scramble duration. Zero is raised to one millisecond.
    #[must_use]
    pub fn total_duration(mut self, duration: Duration) -> Self {
        self.total_duration = duration.max(Duration::from_millis(1));
        self
    }

    /// Set the frame length, clamped to [`MAX_FRAME_LENGTH`].
    #[must_use]
    pub fn frame_length(mut self, length: usize) -> Self {
        self.frame_length = length.min(MAX_FRAME_LENGTH);
        self
    }

    /// The words a roll may settle on.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Whether at least one word is available.
    #[must_use]
    pub fn has_words(&self) -> bool {
        !self.words.is_empty()
    }

    /// The scramble alphabet.
    #[must_use]
    pub fn scramble_alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Scramble-frame cadence.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.tick_interval
    }

    /// Time spent scrambling before settling.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.total_duration
    }

    /// Characters per scramble frame.
    #[must_use]
    pub fn length(&self) -> usize {
        self.frame_length
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Values substituted for absent or malformed declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverDefaults {
    /// Used when `speed` is absent or malformed.
    pub tick_interval: Duration,
    /// Used when `duration` is absent or malformed.
    pub total_duration: Duration,
    /// Used when `length` is absent or malformed.
    pub frame_length: usize,
    /// Used when `alphabet` is absent or yields no character.
    pub alphabet: Alphabet,
}

impl Default for ResolverDefaults {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            total_duration: DEFAULT_TOTAL_DURATION,
            frame_length: DEFAULT_FRAME_LENGTH,
            alphabet: Alphabet::default(),
        }
    }
}

/// Turns declared options into a [`RollConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    defaults: ResolverDefaults,
}

impl ConfigResolver {
    /// Resolver using the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver using custom defaults.
    #[must_use]
    pub fn with_defaults(defaults: ResolverDefaults) -> Self {
        Self { defaults }
    }

    /// The defaults this resolver falls back to.
    #[must_use]
    pub fn defaults(&self) -> &ResolverDefaults {
        &self.defaults
    }

    /// Resolve a configuration snapshot.
    ///
    /// The word list comes from the `list` reference when it names a
    /// non-empty list in `lists`, otherwise from `inline`. An empty result
    /// is not an error here; the caller applies its empty-words policy.
    #[must_use]
    pub fn resolve(
        &self,
        options: &DeclaredOptions,
        lists: &dyn ListLookup,
        inline: &[String],
    ) -> RollConfig {
        let defaults = &self.defaults;
        let tick_interval =
            Self::numeric(options, OptionName::Speed, parse_millis, defaults.tick_interval);
        let total_duration =
            Self::numeric(options, OptionName::Duration, parse_millis, defaults.total_duration);
        let frame_length =
            Self::numeric(options, OptionName::Length, parse_frame_length, defaults.frame_length);

        let alphabet = match options.get(OptionName::Alphabet) {
            None => defaults.alphabet.clone(),
            Some(raw) => Alphabet::parse(raw).unwrap_or_else(|| {
                tracing::debug!(
                    option = "alphabet",
                    value = raw,
                    "no usable characters, using default"
                );
                defaults.alphabet.clone()
            }),
        };

        let words = resolve_words(options.list(), lists, inline);

        tracing::trace!(
            words = words.len(),
            tick_ms = tick_interval.as_millis() as u64,
            duration_ms = total_duration.as_millis() as u64,
            frame_length,
            alphabet = alphabet.len(),
            "configuration resolved"
        );

        RollConfig {
            words,
            alphabet,
            tick_interval,
            total_duration,
            frame_length,
        }
    }

    fn numeric<T: Copy>(
        options: &DeclaredOptions,
        name: OptionName,
        parse: fn(&str) -> Option<T>,
        default: T,
    ) -> T {
        let Some(raw) = options.get(name) else {
            return default;
        };
        parse(raw).unwrap_or_else(|| {
            tracing::debug!(
                option = name.as_str(),
                value = raw,
                "malformed option, using default"
            );
            default
        })
    }
}

// ---------------------------------------------------------------------------
// Numeric parsing
// ---------------------------------------------------------------------------

fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a positive millisecond count. Fractions are truncated; anything
/// that truncates below one millisecond is rejected.
#[must_use]
pub fn parse_millis(raw: &str) -> Option<Duration> {
    let value = parse_number(raw)?.trunc();
    if value < 1.0 {
        return None;
    }
    // `as` saturates for values beyond u64::MAX.
    Some(Duration::from_millis(value as u64))
}

/// Parse a non-negative frame length, clamped to [`MAX_FRAME_LENGTH`].
#[must_use]
pub fn parse_frame_length(raw: &str) -> Option<usize> {
    let value = parse_number(raw)?.trunc();
    if value < 0.0 {
        return None;
    }
    Some((value.min(MAX_FRAME_LENGTH as f64)) as usize)
}
