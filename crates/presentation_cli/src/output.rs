//! Human and JSON rendering of outcomes and records

use std::path::Path;

use domain::{ContentRecord, GenerationOutcome, OutcomeStatus};
use serde::Serialize;

/// JSON view of a pipeline outcome
#[derive(Debug, Serialize)]
struct OutcomeView<'a> {
    key: &'a str,
    status: OutcomeStatus,
    from_cache: bool,
    script: Option<&'a str>,
    audio_available: bool,
    audio_tier: Option<&'static str>,
    audio_format: Option<String>,
    audio_mime_type: Option<&'static str>,
    audio_bytes: usize,
    error: Option<&'a str>,
}

/// JSON view of a stored record
#[derive(Debug, Serialize)]
struct RecordView<'a> {
    key: &'a str,
    script: Option<&'a str>,
    audio_format: Option<String>,
    audio_mime_type: Option<&'static str>,
    audio_bytes: usize,
    created_at: String,
    updated_at: String,
}

/// Check mark for health output
pub const fn health_mark(ok: bool) -> &'static str {
    if ok { "✅" } else { "❌" }
}

/// Serialize an outcome; audio bytes are reported by size only
pub fn outcome_json(outcome: &GenerationOutcome) -> serde_json::Result<String> {
    let view = OutcomeView {
        key: outcome.key.as_str(),
        status: outcome.status(),
        from_cache: outcome.from_cache,
        script: outcome.script.as_deref(),
        audio_available: outcome.audio_available(),
        audio_tier: outcome.audio_tier.map(|t| t.as_str()),
        audio_format: outcome.audio.as_ref().map(|a| a.format.to_string()),
        audio_mime_type: outcome.audio.as_ref().map(|a| a.format.mime_type()),
        audio_bytes: outcome.audio.as_ref().map_or(0, |a| a.size_bytes()),
        error: outcome.error.as_deref(),
    };
    serde_json::to_string_pretty(&view)
}

/// Serialize a record; audio bytes are reported by size only
pub fn record_json(record: &ContentRecord) -> serde_json::Result<String> {
    let view = RecordView {
        key: record.key.as_str(),
        script: record.script.as_deref(),
        audio_format: record.audio_format.map(|f| f.to_string()),
        audio_mime_type: record.audio_format.map(|f| f.mime_type()),
        audio_bytes: record.audio.as_ref().map_or(0, Vec::len),
        created_at: record.created_at.to_rfc3339(),
        updated_at: record.updated_at.to_rfc3339(),
    };
    serde_json::to_string_pretty(&view)
}

pub fn print_outcome(outcome: &GenerationOutcome, audio_out: Option<&Path>) {
    let source = if outcome.from_cache { "stored" } else { "generated" };
    match outcome.status() {
        OutcomeStatus::Complete => println!("✅ {} ({source})", outcome.key),
        OutcomeStatus::PartialSuccess => println!("⚠️  {} ({source}, no audio)", outcome.key),
        OutcomeStatus::Failed => {
            println!("❌ {}: {}", outcome.key, outcome.error.as_deref().unwrap_or("unknown error"));
            return;
        },
    }

    if let Some(audio) = &outcome.audio {
        let tier = outcome.audio_tier.map_or("stored", |t| t.as_str());
        println!("   🔊 {} bytes of {} ({tier})", audio.size_bytes(), audio.format);
        if let Some(target) = audio_out {
            println!("   📁 Audio written to {}", target.display());
        }
    }

    if let Some(script) = &outcome.script {
        println!();
        println!("{script}");
    }
}

pub fn print_record(record: &ContentRecord, audio_out: Option<&Path>) {
    println!("📄 {}", record.key);
    println!("   Created: {}", record.created_at.to_rfc3339());
    println!("   Updated: {}", record.updated_at.to_rfc3339());

    match (&record.audio, record.audio_format) {
        (Some(audio), format) if !audio.is_empty() => {
            let format = format.map_or_else(|| "unknown".to_string(), |f| f.to_string());
            println!("   🔊 {} bytes of {format}", audio.len());
            if let Some(target) = audio_out {
                println!("   📁 Audio written to {}", target.display());
            }
        },
        _ => println!("   🔇 No audio"),
    }

    match record.script.as_deref() {
        Some(script) if !script.trim().is_empty() => {
            println!();
            println!("{script}");
        },
        _ => println!("   (no script yet)"),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use domain::{AudioFormat, AudioPayload, AudioTier, ContentUpdate, TopicKey};

    use super::*;

    fn key() -> TopicKey {
        TopicKey::new("tea").unwrap()
    }

    #[test]
    fn outcome_json_reports_audio_by_size() {
        let outcome = GenerationOutcome::generated(
            key(),
            "Tea began in China.".to_string(),
            Some((AudioPayload::new(vec![0; 42], AudioFormat::Mp3), AudioTier::Excerpt)),
        );

        let json: serde_json::Value = serde_json::from_str(&outcome_json(&outcome).unwrap()).unwrap();
        assert_eq!(json["status"], "complete");
        assert_eq!(json["audio_bytes"], 42);
        assert_eq!(json["audio_tier"], "excerpt");
        assert_eq!(json["audio_format"], "mp3");
        assert_eq!(json["audio_mime_type"], "audio/mpeg");
        assert_eq!(json["from_cache"], false);
    }

    #[test]
    fn failed_outcome_json_carries_error() {
        let outcome = GenerationOutcome::failed(key(), "Generation failed: empty");

        let json: serde_json::Value = serde_json::from_str(&outcome_json(&outcome).unwrap()).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json["script"].is_null());
        assert_eq!(json["error"], "Generation failed: empty");
    }

    #[test]
    fn record_json_without_audio() {
        let record = ContentRecord::from_update(key(), ContentUpdate::script("Steep."), Utc::now());

        let json: serde_json::Value = serde_json::from_str(&record_json(&record).unwrap()).unwrap();
        assert_eq!(json["script"], "Steep.");
        assert_eq!(json["audio_bytes"], 0);
        assert!(json["audio_format"].is_null());
        assert!(json["audio_mime_type"].is_null());
    }

    #[test]
    fn record_json_names_opus_container() {
        let record = ContentRecord::from_update(
            key(),
            ContentUpdate::script("Steep.").with_audio(vec![1, 2], AudioFormat::Opus),
            Utc::now(),
        );

        let json: serde_json::Value = serde_json::from_str(&record_json(&record).unwrap()).unwrap();
        assert_eq!(json["audio_format"], "opus");
        assert_eq!(json["audio_mime_type"], "audio/ogg");
    }

    #[test]
    fn partial_outcome_status_is_snake_case() {
        let outcome = GenerationOutcome::generated(key(), "Steep.".to_string(), None);

        let json: serde_json::Value = serde_json::from_str(&outcome_json(&outcome).unwrap()).unwrap();
        assert_eq!(json["status"], "partial_success");
        assert_eq!(json["audio_available"], false);
    }
}
