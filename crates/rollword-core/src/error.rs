#![forbid(unsafe_code)]

//! Error types for configuration and word loading.
//!
//! Malformed numeric options never surface here: the resolver substitutes
//! defaults for them. The only configuration failure is an empty word list.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration failures that reach the host.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Neither the referenced list nor the inline list yielded a word.
    #[error("no words to settle on ({})", list_hint(.list))]
    NoWords {
        /// The `list` reference that was declared, if any.
        list: Option<String>,
    },
}

fn list_hint(list: &Option<String>) -> String {
    match list {
        Some(id) => format!("list `{id}` is missing or empty, and no inline words are defined"),
        None => "no `list` reference and no inline words are defined".to_string(),
    }
}

/// Failures while loading a word list from disk.
#[derive(Error, Debug)]
pub enum WordSourceError {
    /// The file could not be read.
    #[error("cannot read word list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_words_message_names_the_list() {
        let err = ConfigError::NoWords {
            list: Some("greetings".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("`greetings`"), "{msg}");
    }

    #[test]
    fn no_words_message_without_list() {
        let err = ConfigError::NoWords { list: None };
        assert!(err.to_string().contains("no `list` reference"));
    }
}
