//! Generation pipeline configuration.

use std::time::Duration;

use application::{ChunkSelectorConfig, ContentServiceConfig};
use domain::VerbosityProfile;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Settings for the generate-or-retrieve pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationAppConfig {
    /// Target length of generated scripts (`short` or `long`)
    #[serde(default)]
    pub profile: VerbosityProfile,

    /// Language code used to pick the speech voice
    #[serde(default = "default_language")]
    pub language: String,

    /// Upper bound for one script generation call in milliseconds
    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,

    /// Upper bound for one speech synthesis attempt in milliseconds
    #[serde(default = "default_synthesis_timeout_ms")]
    pub synthesis_timeout_ms: u64,

    /// Share one pipeline run between concurrent requests for a key
    #[serde(default = "default_true")]
    pub single_flight: bool,

    /// Fewest sentences the sentence window tries before truncating
    #[serde(default = "default_window_min_sentences")]
    pub window_min_sentences: usize,

    /// Most sentences the sentence window starts from
    #[serde(default = "default_window_max_sentences")]
    pub window_max_sentences: usize,

    /// Length of the last-resort excerpt in characters
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Earliest position a sentence end may cut the excerpt
    #[serde(default = "default_excerpt_min_offset")]
    pub excerpt_min_offset: usize,
}

fn default_language() -> String {
    "en".to_string()
}

const fn default_generation_timeout_ms() -> u64 {
    120_000
}

const fn default_synthesis_timeout_ms() -> u64 {
    12_000
}

const fn default_window_min_sentences() -> usize {
    3
}

const fn default_window_max_sentences() -> usize {
    5
}

const fn default_excerpt_chars() -> usize {
    200
}

const fn default_excerpt_min_offset() -> usize {
    50
}

impl Default for GenerationAppConfig {
    fn default() -> Self {
        Self {
            profile: VerbosityProfile::default(),
            language: default_language(),
            generation_timeout_ms: default_generation_timeout_ms(),
            synthesis_timeout_ms: default_synthesis_timeout_ms(),
            single_flight: true,
            window_min_sentences: default_window_min_sentences(),
            window_max_sentences: default_window_max_sentences(),
            excerpt_chars: default_excerpt_chars(),
            excerpt_min_offset: default_excerpt_min_offset(),
        }
    }
}

impl GenerationAppConfig {
    /// Check the values the pipeline cannot run with
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.generation_timeout_ms == 0 {
            return Err("generation.generation_timeout_ms must be greater than 0".to_string());
        }
        if self.synthesis_timeout_ms == 0 {
            return Err("generation.synthesis_timeout_ms must be greater than 0".to_string());
        }
        if self.window_min_sentences == 0 {
            return Err("generation.window_min_sentences must be greater than 0".to_string());
        }
        if self.window_min_sentences > self.window_max_sentences {
            return Err(format!(
                "generation.window_min_sentences ({}) exceeds window_max_sentences ({})",
                self.window_min_sentences, self.window_max_sentences
            ));
        }
        if self.excerpt_chars == 0 {
            return Err("generation.excerpt_chars must be greater than 0".to_string());
        }
        if self.language.trim().is_empty() {
            return Err("generation.language must not be empty".to_string());
        }
        Ok(())
    }

    /// Convert into the service configuration
    #[must_use]
    pub fn to_service_config(&self) -> ContentServiceConfig {
        ContentServiceConfig {
            profile: self.profile,
            language: self.language.clone(),
            generation_timeout: Duration::from_millis(self.generation_timeout_ms),
            single_flight: self.single_flight,
            chunk_selector: ChunkSelectorConfig {
                synthesis_timeout: Duration::from_millis(self.synthesis_timeout_ms),
                window_max_sentences: self.window_max_sentences,
                window_min_sentences: self.window_min_sentences,
                excerpt_chars: self.excerpt_chars,
                excerpt_min_offset: self.excerpt_min_offset,
            },
        }
    }
}
