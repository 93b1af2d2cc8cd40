//! Content record entity
//!
//! One record per topic key. Script and audio are written by the pipeline in
//! separate steps, so updates merge into the stored record instead of
//! replacing it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{AudioFormat, TopicKey};

/// Persisted script/audio pair for a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Canonical topic key (primary lookup)
    pub key: TopicKey,
    /// Generated long-form text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Synthesized speech payload, opaque to the pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<u8>>,
    /// Container format of `audio`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_format: Option<AudioFormat>,
    /// When the record was first written; never updated afterwards
    pub created_at: DateTime<Utc>,
    /// When the record was last written
    pub updated_at: DateTime<Utc>,
}

/// Partial field set written by an upsert
///
/// Absent fields leave the stored value untouched, except that
/// `clear_audio` drops stored audio the update does not replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentUpdate {
    /// New script, if any
    pub script: Option<String>,
    /// New audio payload, if any
    pub audio: Option<Vec<u8>>,
    /// Format of the new audio payload
    pub audio_format: Option<AudioFormat>,
    /// Remove stored audio and its format when `audio` is absent
    pub clear_audio: bool,
}

impl ContentUpdate {
    /// Update carrying only a script
    #[must_use]
    pub fn script(script: impl Into<String>) -> Self {
        Self {
            script: Some(script.into()),
            ..Self::default()
        }
    }

    /// Attach audio to this update
    #[must_use]
    pub fn with_audio(mut self, data: Vec<u8>, format: AudioFormat) -> Self {
        self.audio = Some(data);
        self.audio_format = Some(format);
        self
    }

    /// Drop stored audio unless this update carries its own
    ///
    /// Used when the script is replaced, since audio of an earlier script
    /// must not be served next to the new one.
    #[must_use]
    pub const fn replacing_audio(mut self) -> Self {
        self.clear_audio = true;
        self
    }

    /// Whether the update changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.script.is_none()
            && self.audio.is_none()
            && self.audio_format.is_none()
            && !self.clear_audio
    }
}

impl ContentRecord {
    /// Create an empty record for a key
    #[must_use]
    pub fn new(key: TopicKey) -> Self {
        let now = Utc::now();
        Self {
            key,
            script: None,
            audio: None,
            audio_format: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a record from its first update
    #[must_use]
    pub fn from_update(key: TopicKey, update: ContentUpdate, at: DateTime<Utc>) -> Self {
        let mut record = Self {
            key,
            script: None,
            audio: None,
            audio_format: None,
            created_at: at,
            updated_at: at,
        };
        record.apply(update, at);
        record
    }

    /// Merge an update into this record
    ///
    /// Present fields win, absent fields keep the stored value and
    /// `created_at` is never touched. With `clear_audio`, absent audio
    /// fields become absent in the record too.
    pub fn apply(&mut self, update: ContentUpdate, at: DateTime<Utc>) {
        if update.clear_audio {
            self.audio = None;
            self.audio_format = None;
        }
        if let Some(script) = update.script {
            self.script = Some(script);
        }
        if let Some(audio) = update.audio {
            self.audio = Some(audio);
        }
        if let Some(format) = update.audio_format {
            self.audio_format = Some(format);
        }
        self.updated_at = at;
    }

    /// Whether the record holds a usable script
    ///
    /// A record without a non-blank script counts as "not yet generated".
    #[must_use]
    pub fn is_servable(&self) -> bool {
        self.script.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Whether the record holds a non-empty audio payload
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio.as_ref().is_some_and(|a| !a.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn key() -> TopicKey {
        TopicKey::new("cooking tips").unwrap()
    }

    #[test]
    fn new_record_is_not_servable() {
        let record = ContentRecord::new(key());
        assert!(!record.is_servable());
        assert!(!record.has_audio());
    }

    #[test]
    fn blank_script_is_not_servable() {
        let record = ContentRecord::from_update(key(), ContentUpdate::script("  \n "), Utc::now());
        assert!(!record.is_servable());
    }

    #[test]
    fn script_without_audio_is_servable() {
        let record = ContentRecord::from_update(key(), ContentUpdate::script("Hello."), Utc::now());
        assert!(record.is_servable());
        assert!(!record.has_audio());
    }

    #[test]
    fn script_only_update_keeps_audio() {
        let t0 = Utc::now();
        let mut record = ContentRecord::from_update(
            key(),
            ContentUpdate::script("First.").with_audio(vec![1, 2, 3], AudioFormat::Mp3),
            t0,
        );

        record.apply(ContentUpdate::script("Second."), t0 + Duration::seconds(5));

        assert_eq!(record.script.as_deref(), Some("Second."));
        assert_eq!(record.audio, Some(vec![1, 2, 3]));
        assert_eq!(record.audio_format, Some(AudioFormat::Mp3));
    }

    #[test]
    fn replacing_script_drops_earlier_audio() {
        let t0 = Utc::now();
        let mut record = ContentRecord::from_update(
            key(),
            ContentUpdate::script("First.").with_audio(vec![1, 2, 3], AudioFormat::Mp3),
            t0,
        );

        record.apply(
            ContentUpdate::script("Second.").replacing_audio(),
            t0 + Duration::seconds(5),
        );

        assert_eq!(record.script.as_deref(), Some("Second."));
        assert!(record.audio.is_none());
        assert!(record.audio_format.is_none());
        assert!(record.is_servable());
    }

    #[test]
    fn replacing_audio_keeps_new_payload() {
        let t0 = Utc::now();
        let mut record = ContentRecord::from_update(
            key(),
            ContentUpdate::script("First.").with_audio(vec![1], AudioFormat::Mp3),
            t0,
        );

        record.apply(
            ContentUpdate::script("Second.")
                .with_audio(vec![7, 7], AudioFormat::Opus)
                .replacing_audio(),
            t0,
        );

        assert_eq!(record.audio, Some(vec![7, 7]));
        assert_eq!(record.audio_format, Some(AudioFormat::Opus));
    }

    #[test]
    fn apply_refreshes_updated_at_only() {
        let t0 = Utc::now();
        let t1 = t0 + Duration::minutes(1);
        let mut record = ContentRecord::from_update(key(), ContentUpdate::script("A."), t0);

        record.apply(ContentUpdate::default().with_audio(vec![9], AudioFormat::Wav), t1);

        assert_eq!(record.created_at, t0);
        assert_eq!(record.updated_at, t1);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(ContentUpdate::default().is_empty());
        assert!(!ContentUpdate::script("x").is_empty());
        assert!(!ContentUpdate::default().replacing_audio().is_empty());
    }

    #[test]
    fn empty_audio_does_not_count() {
        let record = ContentRecord::from_update(
            key(),
            ContentUpdate::script("A.").with_audio(Vec::new(), AudioFormat::Mp3),
            Utc::now(),
        );
        assert!(!record.has_audio());
    }
}
