//! Verbosity profile value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Target length band for generated scripts
///
/// The profile is a configuration choice; it is never inferred from the
/// topic of an individual request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityProfile {
    /// Roughly 300-450 words
    #[default]
    Short,
    /// Roughly 1500-2000 words
    Long,
}

impl VerbosityProfile {
    /// Inclusive target word range
    #[must_use]
    pub const fn word_range(&self) -> (u32, u32) {
        match self {
            Self::Short => (300, 450),
            Self::Long => (1500, 2000),
        }
    }

    /// Token budget for the upper end of the word range
    ///
    /// Uses ~1.6 tokens per English word plus headroom for a title line.
    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        let (_, max_words) = self.word_range();
        max_words * 8 / 5 + 64
    }

    /// Lowercase name as used in configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for VerbosityProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerbosityProfile {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" | "brief" => Ok(Self::Short),
            "long" | "detailed" => Ok(Self::Long),
            other => Err(DomainError::InvalidProfile(other.to_string())),
        }
    }
}
