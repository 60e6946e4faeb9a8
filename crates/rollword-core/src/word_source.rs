#![forbid(unsafe_code)]

//! Word sources: named external lists, inline lists, and loaders.
//!
//! A widget can take its words from two places. An external list is a named
//! list living outside the widget (in a page this is a `<datalist>` found by
//! id); the widget refers to it through its `list` option. An inline list is
//! bundled with the widget itself. [`resolve_words`] applies the priority
//! between the two.
//!
//! Loaders accept either `<option>` markup or plain text with one word per
//! line.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::WordSourceError;

static OPTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<option\b([^>]*)>").expect("option tag regex"));

static VALUE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bvalue\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
        .expect("value attribute regex")
});

static CHAR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("char ref regex"));

/// Lookup of named word lists.
pub trait ListLookup {
    /// Words of the list named `id`, if such a list exists.
    fn lookup(&self, id: &str) -> Option<&[String]>;
}

/// An in-memory set of named word lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRegistry {
    lists: HashMap<String, Vec<String>>,
}

impl ListRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a list. Words are normalized on the way in.
    ///
    /// Returns the previous words stored under `id`.
    pub fn insert<I, S>(&mut self, id: impl Into<String>, words: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lists.insert(id.into(), normalize_words(words))
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_list<I, S>(mut self, id: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(id, words);
        self
    }

    /// Remove a list, returning its words.
    pub fn remove(&mut self, id: &str) -> Option<Vec<String>> {
        self.lists.remove(id)
    }

    /// Number of registered lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether no list is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl ListLookup for ListRegistry {
    fn lookup(&self, id: &str) -> Option<&[String]> {
        self.lists.get(id).map(Vec::as_slice)
    }
}

impl<T: ListLookup + ?Sized> ListLookup for &T {
    fn lookup(&self, id: &str) -> Option<&[String]> {
        (**self).lookup(id)
    }
}

/// Trim words and drop blank entries, keeping order.
#[must_use]
pub fn normalize_words<I, S>(words: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|word| word.as_ref().trim().to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Pick the effective word list.
///
/// A `list` reference wins when it names a list with at least one word.
/// Otherwise the inline words are used. The result may be empty.
#[must_use]
pub fn resolve_words(list: Option<&str>, lists: &dyn ListLookup, inline: &[String]) -> Vec<String> {
    if let Some(id) = list {
        match lists.lookup(id) {
            Some(words) if words.iter().any(|w| !w.trim().is_empty()) => {
                return normalize_words(words);
            }
            Some(_) => tracing::debug!(list = id, "referenced list is empty, using inline words"),
            None => tracing::debug!(list = id, "referenced list not found, using inline words"),
        }
    }
    normalize_words(inline)
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Extract the words of every `<option>` element in `markup`.
///
/// The word is the element's text with whitespace collapsed. An option with
/// no text falls back to its `value` attribute. Options with neither are
/// skipped.
#[must_use]
pub fn parse_option_markup(markup: &str) -> Vec<String> {
    let mut words = Vec::new();
    for caps in OPTION_TAG.captures_iter(markup) {
        let Some(tag) = caps.get(0) else { continue };
        let rest = &markup[tag.end()..];
        let text = rest.find('<').map_or(rest, |end| &rest[..end]);
        let text = collapse_whitespace(&decode_char_refs(text));

        let word = if text.is_empty() {
            caps.get(1)
                .and_then(|attrs| value_attribute(attrs.as_str()))
                .map(|value| collapse_whitespace(&decode_char_refs(value)))
                .unwrap_or_default()
        } else {
            text
        };
        if !word.is_empty() {
            words.push(word);
        }
    }
    words
}

/// Read one word per line. Blank lines and lines starting with `#` are
/// ignored.
#[must_use]
pub fn parse_word_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Parse word list text, choosing markup or line format by content.
#[must_use]
pub fn parse_word_text(text: &str) -> Vec<String> {
    if OPTION_TAG.is_match(text) {
        parse_option_markup(text)
    } else {
        parse_word_lines(text)
    }
}

/// Load a word list file (markup or line format).
pub fn load_word_file(path: impl AsRef<Path>) -> Result<Vec<String>, WordSourceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| WordSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let words = parse_word_text(&text);
    tracing::debug!(path = %path.display(), words = words.len(), "word list loaded");
    Ok(words)
}

fn value_attribute(attrs: &str) -> Option<&str> {
    let caps = VALUE_ATTR.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_char_refs(text: &str) -> String {
    CHAR_REF
        .replace_all(text, |caps: &regex_lite::Captures<'_>| {
            let name = &caps[1];
            let decoded = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{00a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
