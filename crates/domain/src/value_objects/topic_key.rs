//! Topic key value object
//!
//! A topic key is the canonical identifier under which a generated
//! script/audio pair is cached and retrieved. Raw input usually arrives as a
//! URL path segment, so it is percent-decoded and de-slugified before use.
//!
//! # Examples
//!
//! ```
//! use domain::TopicKey;
//!
//! let key = TopicKey::new("Cooking-Tips").unwrap();
//! assert_eq!(key.as_str(), "cooking tips");
//!
//! let key = TopicKey::from_path("/strawberry%20growing_guide/42").unwrap();
//! assert_eq!(key.as_str(), "strawberry growing guide");
//!
//! assert!(TopicKey::new("  --  ").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// A normalized topic key
///
/// Deserialization goes through `TryFrom<String>`, which expects an already
/// decoded key: it tidies separators and case but never percent-decodes, so
/// a key survives a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Validate)]
#[serde(try_from = "String", into = "String")]
pub struct TopicKey {
    #[validate(length(min = 1))]
    value: String,
}

impl TopicKey {
    /// Normalize raw input into a topic key
    ///
    /// Percent-decodes the input, turns slug separators (`-`, `_`, `+`) into
    /// spaces, collapses whitespace and lowercases the result.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTopicKey` if nothing is left after
    /// normalization.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        Self::checked(tidy(&percent_decode(raw.as_ref())))
    }

    fn checked(value: String) -> Result<Self, DomainError> {
        let candidate = Self { value };
        candidate
            .validate()
            .map_err(|e| DomainError::InvalidTopicKey(e.to_string()))?;
        Ok(candidate)
    }

    /// Build a topic key from a request path
    ///
    /// The first non-empty path segment names the topic; the rest of the
    /// path is ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTopicKey` if the path has no segments.
    pub fn from_path(path: &str) -> Result<Self, DomainError> {
        let segment = path
            .split('/')
            .find(|s| !s.trim().is_empty())
            .ok_or_else(|| DomainError::InvalidTopicKey(format!("no topic in path '{path}'")))?;
        Self::new(segment)
    }

    /// Get the key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Percent-decode raw input; malformed escapes are kept verbatim
fn percent_decode(raw: &str) -> String {
    let trimmed = raw.trim();
    urlencoding::decode(trimmed).map_or_else(|_| trimmed.to_string(), std::borrow::Cow::into_owned)
}

/// Turn slug separators into spaces, collapse whitespace and lowercase
fn tidy(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if matches!(c, '-' | '_' | '+') { ' ' } else { c })
        .collect();

    spaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for TopicKey {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl FromStr for TopicKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TopicKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::checked(tidy(&value))
    }
}

impl From<TopicKey> for String {
    fn from(key: TopicKey) -> Self {
        key.value
    }
}
