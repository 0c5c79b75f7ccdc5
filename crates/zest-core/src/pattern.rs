//! Compiled regular expressions that serialize as their source text.
//!
//! Patterns are compiled once when they are created, so a malformed
//! expression is reported to whoever supplied it instead of surfacing later
//! during evaluation.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ZestError;

/// A regular expression together with the text it was compiled from.
#[derive(Clone)]
pub struct Pattern {
    src: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `src`.
    pub fn new(src: impl Into<String>) -> Result<Self, ZestError> {
        let src = src.into();
        let regex = Regex::new(&src).map_err(|source| ZestError::InvalidPattern {
            pattern: src.clone(),
            source,
        })?;
        Ok(Self { src, regex })
    }

    /// Compile `src`, matching letters regardless of case.
    ///
    /// The flag is kept in the source text as an inline `(?i)` group, so it
    /// survives serialization and takes part in equality.
    pub fn case_insensitive(src: &str) -> Result<Self, ZestError> {
        Self::new(format!("(?i){src}"))
    }

    /// The source text of the pattern.
    pub fn as_str(&self) -> &str {
        &self.src
    }

    /// True if the pattern matches anywhere inside `text`.
    pub fn is_found(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte range of the first match in `text`.
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        self.regex.find(text).map(|m| (m.start(), m.end()))
    }

    /// Byte range of the first match starting at or after `from`.
    pub fn find_at(&self, text: &str, from: usize) -> Option<(usize, usize)> {
        self.regex.find_at(text, from).map(|m| (m.start(), m.end()))
    }

    /// Replace every match in `text` with `replacement` taken literally.
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        self.regex
            .replace_all(text, regex::NoExpand(replacement))
            .into_owned()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.src).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.src)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.src == other.src
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.src)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let src = String::deserialize(deserializer)?;
        Pattern::new(src).map_err(serde::de::Error::custom)
    }
}
