//! Audio chunk selector - Fits a script under the synthesizer's input ceiling
//!
//! Generated scripts are usually longer than the speech backend accepts in
//! one request. The selector walks an ordered list of tiers, each producing a
//! candidate chunk, and returns the audio of the first tier that synthesizes
//! successfully:
//!
//! 1. [`AudioTier::FullText`]: the whole normalized script, when it fits
//! 2. [`AudioTier::SentenceWindow`]: the largest prefix of whole sentences that fits
//! 3. [`AudioTier::Excerpt`]: a short excerpt from the start of the script
//!
//! Exhausting every tier yields no audio, never an error.

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use domain::{AudioPayload, AudioTier};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{SpeechSynthesizerPort, SynthesizedAudio},
};

/// Characters stripped from a script before it is sent to synthesis
const MARKUP_CHARS: &[char] = &['*', '_', '#', '`', '~', '<', '>', '[', ']', '{', '}', '|'];

/// Evaluation order of the tiers
const TIER_ORDER: [AudioTier; 3] = [
    AudioTier::FullText,
    AudioTier::SentenceWindow,
    AudioTier::Excerpt,
];

/// Configuration for chunk selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSelectorConfig {
    /// Upper bound for a single synthesis attempt
    pub synthesis_timeout: Duration,
    /// Largest sentence window tried
    pub window_max_sentences: usize,
    /// Smallest sentence window tried before truncating
    pub window_min_sentences: usize,
    /// Length of the last-resort excerpt in characters
    pub excerpt_chars: usize,
    /// Earliest position at which the excerpt may end on a sentence terminator
    pub excerpt_min_offset: usize,
}

impl Default for ChunkSelectorConfig {
    fn default() -> Self {
        Self {
            synthesis_timeout: Duration::from_secs(12),
            window_max_sentences: 5,
            window_min_sentences: 3,
            excerpt_chars: 200,
            excerpt_min_offset: 50,
        }
    }
}

/// Picks the chunk of a script that gets synthesized
pub struct AudioChunkSelector {
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    config: ChunkSelectorConfig,
}

impl fmt::Debug for AudioChunkSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioChunkSelector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AudioChunkSelector {
    /// Create a selector with default configuration
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizerPort>) -> Self {
        Self::with_config(synthesizer, ChunkSelectorConfig::default())
    }

    /// Create a selector with custom configuration
    pub fn with_config(
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        config: ChunkSelectorConfig,
    ) -> Self {
        Self {
            synthesizer,
            config,
        }
    }

    /// Synthesize the best-fitting chunk of `script`
    ///
    /// Returns the audio and the tier that produced it, or `None` when every
    /// applicable tier failed.
    #[instrument(skip(self, script), fields(script_chars = script.chars().count()))]
    pub async fn select(&self, script: &str, language: &str) -> Option<(AudioPayload, AudioTier)> {
        let ceiling = self.synthesizer.max_input_chars();
        let normalized = normalize_for_speech(script);
        let fits = normalized.chars().count() <= ceiling;

        let mut failed_chunks: Vec<String> = Vec::new();
        let mut full_text_failed = false;

        for tier in TIER_ORDER {
            let chunk = match tier {
                AudioTier::FullText => fits.then(|| normalized.clone()),
                AudioTier::SentenceWindow => (!fits || full_text_failed).then(|| {
                    sentence_window(
                        &normalized,
                        ceiling,
                        self.config.window_min_sentences,
                        self.config.window_max_sentences,
                    )
                }),
                AudioTier::Excerpt => Some(normalize_for_speech(&excerpt(
                    script,
                    self.config.excerpt_chars.min(ceiling),
                    self.config.excerpt_min_offset,
                ))),
            };

            let Some(chunk) = chunk else {
                debug!(tier = %tier, "Tier not applicable");
                continue;
            };

            if chunk.is_empty() || failed_chunks.contains(&chunk) {
                debug!(tier = %tier, "Skipping tier with empty or already failed chunk");
                continue;
            }

            let start = Instant::now();
            match self.attempt(&chunk, language).await {
                Ok(audio) => {
                    #[allow(clippy::cast_possible_truncation)]
                    let latency_ms = start.elapsed().as_millis() as u64;
                    info!(
                        tier = %tier,
                        chars = chunk.chars().count(),
                        audio_bytes = audio.data.len(),
                        latency_ms,
                        "Audio synthesized"
                    );
                    return Some((AudioPayload::new(audio.data, audio.format), tier));
                },
                Err(e) => {
                    warn!(tier = %tier, chars = chunk.chars().count(), error = %e, "Synthesis tier failed");
                    if tier == AudioTier::FullText {
                        full_text_failed = true;
                    }
                    failed_chunks.push(chunk);
                },
            }
        }

        warn!("All synthesis tiers failed, continuing without audio");
        None
    }

    async fn attempt(&self, chunk: &str, language: &str) -> Result<SynthesizedAudio, ApplicationError> {
        let timeout = self.config.synthesis_timeout;
        match tokio::time::timeout(timeout, self.synthesizer.synthesize(chunk, language)).await {
            Ok(Ok(audio)) if audio.data.is_empty() => Err(ApplicationError::SynthesisFailed(
                "empty audio payload".to_string(),
            )),
            Ok(result) => result,
            Err(_) => Err(ApplicationError::SynthesisFailed(format!(
                "timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }
}

/// Strip markup and control characters and collapse whitespace
pub fn normalize_for_speech(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

const fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split text into sentences ending in `.`, `!` or `?`
///
/// A terminator only ends a sentence when followed by whitespace or the end
/// of the text, so `3.14` and `...` stay intact. A trailing fragment without
/// terminator counts as a sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Largest prefix window of whole sentences that fits `ceiling`
///
/// Tries `max_sentences` down to `min_sentences`; when even the smallest
/// window is too long it is cut back to the last word boundary.
pub fn sentence_window(
    text: &str,
    ceiling: usize,
    min_sentences: usize,
    max_sentences: usize,
) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return String::new();
    }

    let upper = max_sentences.min(sentences.len()).max(1);
    let lower = min_sentences.clamp(1, upper);

    for n in (lower..=upper).rev() {
        let window = sentences[..n].join(" ");
        if window.chars().count() <= ceiling {
            return window;
        }
    }

    truncate_at_word_boundary(&sentences[..lower].join(" "), ceiling)
}

/// Cut `text` to at most `max_chars` characters, ending on a word boundary
///
/// A single word longer than `max_chars` is cut hard.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let Some((byte_idx, next)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..byte_idx];
    if next.is_whitespace() {
        return head.trim_end().to_string();
    }

    head.rfind(char::is_whitespace)
        .map_or(head, |pos| &head[..pos])
        .trim_end()
        .to_string()
}

/// First `max_chars` characters of `text`, trimmed to a clean end
///
/// Prefers the last sentence terminator at or past `min_offset`, then the
/// last whitespace.
pub fn excerpt(text: &str, max_chars: usize, min_offset: usize) -> String {
    let text = text.trim();
    let Some((byte_limit, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let head = &text[..byte_limit];

    let mut last_terminator = None;
    let mut last_space = None;
    for (pos, (byte, c)) in head.char_indices().enumerate() {
        if is_terminator(c) && pos >= min_offset {
            last_terminator = Some(byte + c.len_utf8());
        } else if c.is_whitespace() {
            last_space = Some(byte);
        }
    }

    let end = last_terminator.or(last_space).unwrap_or(head.len());
    head[..end].trim_end().to_string()
}
