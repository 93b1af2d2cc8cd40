//! Speech provider settings

use std::collections::HashMap;

use domain::AudioFormat;
use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// Settings for an OpenAI-compatible speech endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Bearer token; required to build a provider
    pub openai_api_key: Option<String>,
    /// API root; `/audio/speech` and `/models` are appended
    pub openai_base_url: String,
    pub tts_model: String,
    /// Voice for languages without an entry in `voices`
    pub default_voice: String,
    /// Voice by language tag, e.g. `de = "onyx"`, `en-gb = "fable"`
    pub voices: HashMap<String, String>,
    pub output_format: AudioFormat,
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Playback speed multiplier (0.25 - 4.0)
    pub speed: f32,
    /// Longest input accepted per request, in characters
    pub max_input_chars: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            tts_model: "tts-1".to_string(),
            default_voice: "nova".to_string(),
            voices: HashMap::new(),
            output_format: AudioFormat::Mp3,
            timeout_ms: 30_000,
            speed: 1.0,
            max_input_chars: 1000,
        }
    }
}

impl SpeechConfig {
    /// Voice for a language tag
    ///
    /// Tries the full tag (`en-GB`), then the primary subtag (`en`), then
    /// the default voice. Tags compare case-insensitively and accept `_`.
    #[must_use]
    pub fn voice_for_language(&self, language: &str) -> &str {
        let tag = language.trim().to_ascii_lowercase().replace('_', "-");
        let primary = tag.split('-').next().unwrap_or_default();

        [tag.as_str(), primary]
            .into_iter()
            .find_map(|candidate| self.voices.get(candidate))
            .unwrap_or(&self.default_voice)
    }

    /// Check everything a provider needs before it talks to the backend
    pub fn validate(&self) -> Result<(), SpeechError> {
        let invalid = |msg: String| Err(SpeechError::InvalidConfig(msg));

        if self
            .openai_api_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
        {
            return invalid("openai_api_key is required".to_string());
        }
        if self.openai_base_url.trim().is_empty() {
            return invalid("openai_base_url must not be empty".to_string());
        }
        if !(0.25..=4.0).contains(&self.speed) {
            return invalid(format!("speed {} is outside 0.25 - 4.0", self.speed));
        }
        if self.timeout_ms == 0 {
            return invalid("timeout_ms must be greater than 0".to_string());
        }
        if self.max_input_chars == 0 {
            return invalid("max_input_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}
