//! Caller-facing result of a generate-or-retrieve request

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::ContentRecord;
use crate::value_objects::{AudioFormat, TopicKey};

/// Fallback strategy that produced an audio payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioTier {
    /// The whole normalized script
    FullText,
    /// A prefix window of whole sentences
    SentenceWindow,
    /// A short excerpt from the start of the raw script
    Excerpt,
}

impl AudioTier {
    /// Snake-case name used in logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullText => "full_text",
            Self::SentenceWindow => "sentence_window",
            Self::Excerpt => "excerpt",
        }
    }
}

impl fmt::Display for AudioTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio bytes together with their format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    /// Raw audio bytes
    pub data: Vec<u8>,
    /// Container format
    pub format: AudioFormat,
}

impl AudioPayload {
    /// Create a new payload
    #[must_use]
    pub const fn new(data: Vec<u8>, format: AudioFormat) -> Self {
        Self { data, format }
    }

    /// Size of the payload in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Coarse classification of an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Script and audio are both available
    Complete,
    /// Script is available, audio is not
    PartialSuccess,
    /// No script could be produced
    Failed,
}

/// Result of one pipeline execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Key the request was made for
    pub key: TopicKey,
    /// Generated or stored script
    pub script: Option<String>,
    /// Generated or stored audio
    pub audio: Option<AudioPayload>,
    /// Whether the result was served from the content store
    pub from_cache: bool,
    /// Generation error, set only on hard failure
    pub error: Option<String>,
    /// Tier that produced fresh audio (None for cache hits and missing audio)
    pub audio_tier: Option<AudioTier>,
}

impl GenerationOutcome {
    /// Outcome served from a stored record
    #[must_use]
    pub fn cache_hit(record: ContentRecord) -> Self {
        let audio = match record.audio {
            Some(data) if !data.is_empty() => Some(AudioPayload::new(
                data,
                record.audio_format.unwrap_or_default(),
            )),
            _ => None,
        };

        Self {
            key: record.key,
            script: record.script,
            audio,
            from_cache: true,
            error: None,
            audio_tier: None,
        }
    }

    /// Freshly generated outcome, with or without audio
    #[must_use]
    pub fn generated(
        key: TopicKey,
        script: String,
        audio: Option<(AudioPayload, AudioTier)>,
    ) -> Self {
        let (audio, audio_tier) = match audio {
            Some((payload, tier)) => (Some(payload), Some(tier)),
            None => (None, None),
        };

        Self {
            key,
            script: Some(script),
            audio,
            from_cache: false,
            error: None,
            audio_tier,
        }
    }

    /// Hard failure: no script was produced
    #[must_use]
    pub fn failed(key: TopicKey, error: impl Into<String>) -> Self {
        Self {
            key,
            script: None,
            audio: None,
            from_cache: false,
            error: Some(error.into()),
            audio_tier: None,
        }
    }

    /// Whether audio bytes are available
    #[must_use]
    pub const fn audio_available(&self) -> bool {
        self.audio.is_some()
    }

    /// Classify the outcome
    #[must_use]
    pub const fn status(&self) -> OutcomeStatus {
        match (&self.script, &self.audio) {
            (None, _) => OutcomeStatus::Failed,
            (Some(_), None) => OutcomeStatus::PartialSuccess,
            (Some(_), Some(_)) => OutcomeStatus::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entities::ContentUpdate;

    fn key() -> TopicKey {
        TopicKey::new("math tutorials").unwrap()
    }

    #[test]
    fn cache_hit_carries_stored_fields() {
        let record = ContentRecord::from_update(
            key(),
            ContentUpdate::script("Stored.").with_audio(vec![1, 2], AudioFormat::Opus),
            Utc::now(),
        );

        let outcome = GenerationOutcome::cache_hit(record);

        assert!(outcome.from_cache);
        assert_eq!(outcome.script.as_deref(), Some("Stored."));
        assert_eq!(outcome.audio, Some(AudioPayload::new(vec![1, 2], AudioFormat::Opus)));
        assert_eq!(outcome.status(), OutcomeStatus::Complete);
        assert!(outcome.audio_tier.is_none());
    }

    #[test]
    fn cache_hit_without_audio_is_partial() {
        let record = ContentRecord::from_update(key(), ContentUpdate::script("Text."), Utc::now());
        let outcome = GenerationOutcome::cache_hit(record);
        assert_eq!(outcome.status(), OutcomeStatus::PartialSuccess);
        assert!(!outcome.audio_available());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn cache_hit_defaults_missing_format() {
        let mut record = ContentRecord::new(key());
        record.script = Some("Text.".to_string());
        record.audio = Some(vec![7]);

        let outcome = GenerationOutcome::cache_hit(record);
        assert_eq!(outcome.audio.map(|a| a.format), Some(AudioFormat::Mp3));
    }

    #[test]
    fn generated_with_audio_records_tier() {
        let outcome = GenerationOutcome::generated(
            key(),
            "Fresh.".to_string(),
            Some((AudioPayload::new(vec![3], AudioFormat::Mp3), AudioTier::SentenceWindow)),
        );
        assert!(!outcome.from_cache);
        assert_eq!(outcome.audio_tier, Some(AudioTier::SentenceWindow));
        assert_eq!(outcome.status(), OutcomeStatus::Complete);
    }

    #[test]
    fn failed_has_error_and_nothing_else() {
        let outcome = GenerationOutcome::failed(key(), "upstream down");
        assert_eq!(outcome.status(), OutcomeStatus::Failed);
        assert!(outcome.script.is_none());
        assert!(outcome.audio.is_none());
        assert_eq!(outcome.error.as_deref(), Some("upstream down"));
    }

    #[test]
    fn tier_names() {
        assert_eq!(AudioTier::FullText.to_string(), "full_text");
        assert_eq!(AudioTier::Excerpt.as_str(), "excerpt");
    }
}
