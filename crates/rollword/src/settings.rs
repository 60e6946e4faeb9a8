#![forbid(unsafe_code)]

//! File-based settings for the terminal host.
//!
//! # Loading
//!
//! ```toml
//! # rollword.toml
//! [widget]
//! list = "greetings"
//! speed = 80
//! duration = "1500"
//! alphabet = "A,B,C, "
//! length = 12
//! words = ["HELLO", "WORLD"]
//! empty_words = "permissive"
//!
//! [lists]
//! greetings = ["HOWDY", "HI", "HEY"]
//!
//! [defaults]
//! tick_ms = 100
//! duration_ms = 1000
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```
//!
//! Widget options are declarations, not validated values: a malformed
//! `speed` falls back to the default at resolve time, exactly as if it had
//! been declared on a mounted widget. Every section is optional.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use rollword_core::{
    Alphabet, DeclaredOptions, EmptyWordsPolicy, ListRegistry, MAX_FRAME_LENGTH, OptionName,
    ResolverDefaults,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Top-level Settings
// ---------------------------------------------------------------------------

/// Everything the host reads from its settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Declared options and word sources of the mounted widget.
    pub widget: WidgetSettings,

    /// Named word lists the widget's `list` option can refer to.
    pub lists: BTreeMap<String, Vec<String>>,

    /// Resolver fallbacks for absent or malformed options.
    pub defaults: DefaultsSettings,

    /// Log output.
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(Error::Settings)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Problems that will be silently corrected at resolve time.
    ///
    /// An empty list means every value is used as written.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.defaults.tick_ms == Some(0) {
            problems.push("defaults.tick_ms is 0; using 1ms".to_string());
        }
        if self.defaults.duration_ms == Some(0) {
            problems.push("defaults.duration_ms is 0; using 1ms".to_string());
        }
        if let Some(length) = self.defaults.length
            && length > MAX_FRAME_LENGTH
        {
            problems.push(format!(
                "defaults.length {length} exceeds {MAX_FRAME_LENGTH}; clamping"
            ));
        }
        if let Some(alphabet) = &self.defaults.alphabet
            && Alphabet::parse(alphabet).is_none()
        {
            problems.push(format!(
                "defaults.alphabet {alphabet:?} has no single-character entry; using the built-in alphabet"
            ));
        }
        if let Some(list) = &self.widget.list
            && !list.trim().is_empty()
            && !self.lists.contains_key(list.trim())
        {
            problems.push(format!("widget.list {list:?} names no [lists] entry"));
        }
        problems
    }

    /// The `[lists]` section as a lookup registry.
    #[must_use]
    pub fn list_registry(&self) -> ListRegistry {
        let mut registry = ListRegistry::new();
        for (id, words) in &self.lists {
            registry.insert(id.clone(), words);
        }
        registry
    }
}

// ---------------------------------------------------------------------------
// [widget]
// ---------------------------------------------------------------------------

/// A declared option value as written in TOML.
///
/// Numbers and strings are both accepted and passed to the resolver as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// How a widget without words behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyWords {
    #[default]
    Strict,
    Permissive,
}

impl From<EmptyWords> for EmptyWordsPolicy {
    fn from(value: EmptyWords) -> Self {
        match value {
            EmptyWords::Strict => Self::Strict,
            EmptyWords::Permissive => Self::Permissive,
        }
    }
}

/// The mounted widget's declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetSettings {
    pub list: Option<String>,
    pub speed: Option<OptionValue>,
    pub duration: Option<OptionValue>,
    pub alphabet: Option<String>,
    pub length: Option<OptionValue>,
    /// Inline words, used when `list` is absent or names an empty list.
    pub words: Vec<String>,
    pub empty_words: EmptyWords,
}

impl WidgetSettings {
    /// The declarations as widget options.
    #[must_use]
    pub fn declared_options(&self) -> DeclaredOptions {
        let mut options = DeclaredOptions::new();
        options.set(OptionName::List, self.list.clone());
        options.set(OptionName::Speed, self.speed.as_ref().map(ToString::to_string));
        options.set(
            OptionName::Duration,
            self.duration.as_ref().map(ToString::to_string),
        );
        options.set(OptionName::Alphabet, self.alphabet.clone());
        options.set(OptionName::Length, self.length.as_ref().map(ToString::to_string));
        options
    }
}

// ---------------------------------------------------------------------------
// [defaults]
// ---------------------------------------------------------------------------

/// Overrides for the resolver's built-in fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsSettings {
    pub tick_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    pub length: Option<usize>,
    /// Comma-separated, parsed like the `alphabet` option.
    pub alphabet: Option<String>,
}

impl DefaultsSettings {
    /// Resolver defaults with these overrides applied.
    #[must_use]
    pub fn resolver_defaults(&self) -> ResolverDefaults {
        let builtin = ResolverDefaults::default();
        let at_least_one_ms = |ms: u64| Duration::from_millis(ms.max(1));
        ResolverDefaults {
            tick_interval: self
                .tick_ms
                .map_or(builtin.tick_interval, at_least_one_ms),
            total_duration: self
                .duration_ms
                .map_or(builtin.total_duration, at_least_one_ms),
            frame_length: self
                .length
                .map_or(builtin.frame_length, |n| n.min(MAX_FRAME_LENGTH)),
            alphabet: self
                .alphabet
                .as_deref()
                .and_then(Alphabet::parse)
                .unwrap_or(builtin.alphabet),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Log output settings. `ROLLWORD_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `warn` or `rollword_runtime=debug`.
    pub level: String,
    /// Emit newline-delimited JSON instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollword_core::ListLookup;

    const FULL: &str = r#"
        [widget]
        list = "greetings"
        speed = 80
        duration = "1500"
        alphabet = "A,B"
        length = 2.5
        words = ["HELLO", "WORLD"]
        empty_words = "permissive"

        [lists]
        greetings = ["HOWDY", " HI ", ""]

        [defaults]
        tick_ms = 50
        duration_ms = 0
        alphabet = "X"

        [logging]
        level = "debug"
        json = true
    "#;

    #[test]
    fn empty_file_is_all_defaults() {
        let settings = Settings::from_toml_str("").expect("parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.widget.empty_words, EmptyWords::Strict);
        assert!(settings.validate().is_empty());
    }

    #[test]
    fn full_file_parses() {
        let settings = Settings::from_toml_str(FULL).expect("parse");
        assert_eq!(settings.widget.speed, Some(OptionValue::Int(80)));
        assert_eq!(settings.widget.duration, Some(OptionValue::from("1500")));
        assert_eq!(settings.widget.length, Some(OptionValue::Float(2.5)));
        assert_eq!(settings.widget.words, ["HELLO", "WORLD"]);
        assert_eq!(
            EmptyWordsPolicy::from(settings.widget.empty_words),
            EmptyWordsPolicy::Permissive
        );
        assert!(settings.logging.json);
    }

    #[test]
    fn declared_options_carry_text_forms() {
        let settings = Settings::from_toml_str(FULL).expect("parse");
        let options = settings.widget.declared_options();
        assert_eq!(options.get(OptionName::List), Some("greetings"));
        assert_eq!(options.get(OptionName::Speed), Some("80"));
        assert_eq!(options.get(OptionName::Duration), Some("1500"));
        assert_eq!(options.get(OptionName::Length), Some("2.5"));
        assert_eq!(options.get(OptionName::Alphabet), Some("A,B"));
    }

    #[test]
    fn lists_section_becomes_registry() {
        let settings = Settings::from_toml_str(FULL).expect("parse");
        let registry = settings.list_registry();
        assert_eq!(
            registry.lookup("greetings"),
            Some(["HOWDY".to_string(), "HI".to_string()].as_slice())
        );
    }

    #[test]
    fn defaults_override_resolver_fallbacks() {
        let settings = Settings::from_toml_str(FULL).expect("parse");
        let defaults = settings.defaults.resolver_defaults();
        assert_eq!(defaults.tick_interval, Duration::from_millis(50));
        assert_eq!(defaults.total_duration, Duration::from_millis(1));
        assert_eq!(defaults.frame_length, 10);
        assert_eq!(defaults.alphabet.chars(), ['X']);
    }

    #[test]
    fn validate_reports_corrections() {
        let settings = Settings::from_toml_str(
            r#"
            [widget]
            list = "nowhere"
            [defaults]
            tick_ms = 0
            length = 100000
            alphabet = "ab,cd"
            "#,
        )
        .expect("parse");
        let problems = settings.validate();
        assert_eq!(problems.len(), 4, "{problems:?}");
        assert!(problems.iter().any(|p| p.contains("tick_ms")));
        assert!(problems.iter().any(|p| p.contains("nowhere")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml_str("[widget]\nspeeed = 3\n").expect_err("typo");
        assert!(matches!(err, Error::Settings(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Settings::from_toml_file("/definitely/not/here.toml").expect_err("missing");
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rollword.toml");
        std::fs::write(&path, FULL).expect("write");
        let settings = Settings::from_toml_file(&path).expect("load");
        assert_eq!(settings.lists.len(), 1);
    }
}
