#![forbid(unsafe_code)]

//! Rolling word core.
//!
//! Everything here is pure: option parsing, word list resolution and the
//! uniform sampling primitive. Timing and rendering live in
//! `rollword-runtime`.
//!
//! # Key Components
//!
//! - [`ConfigResolver`] - declared options to [`RollConfig`]
//! - [`ListRegistry`] - named external word lists
//! - [`pick_uniform`] - the single sampling primitive
//! - [`ConfigError`] - the empty-word-list failure

pub mod config;
pub mod error;
pub mod pick;
pub mod word_source;

pub use config::{
    Alphabet, ConfigResolver, DEFAULT_ALPHABET, DEFAULT_FRAME_LENGTH, DEFAULT_TICK_INTERVAL,
    DEFAULT_TOTAL_DURATION, DeclaredOptions, MAX_FRAME_LENGTH, OptionName, ResolverDefaults,
    RollConfig,
};
pub use error::{ConfigError, WordSourceError};
pub use pick::{pick_uniform, scramble_frame};
pub use word_source::{
    ListLookup, ListRegistry, load_word_file, normalize_words, parse_option_markup,
    parse_word_lines, parse_word_text, resolve_words,
};

/// What to do when no word can be resolved at mount time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EmptyWordsPolicy {
    /// Mounting (or rolling) without words returns [`ConfigError::NoWords`].
    #[default]
    Strict,
    /// Mounting without words succeeds; nothing renders until words appear.
    Permissive,
}
