//! OpenAI-compatible speech provider
//!
//! Talks to `POST {base}/audio/speech`. Self-hosted servers that mirror the
//! endpoint (openedai-speech, Kokoro-FastAPI) work the same way.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use domain::AudioFormat;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::SpeechProvider;
use crate::types::SpeechAudio;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct OpenAISpeechProvider {
    client: Client,
    config: SpeechConfig,
    api_key: String,
}

impl fmt::Debug for OpenAISpeechProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAISpeechProvider")
            .field("base_url", &self.config.openai_base_url)
            .field("model", &self.config.tts_model)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /audio/speech`
#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: AudioFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
}

/// Error envelope used by OpenAI-style APIs
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl OpenAISpeechProvider {
    /// Build a provider; fails on invalid settings or a missing API key
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate()?;
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| SpeechError::InvalidConfig("openai_api_key is required".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SpeechError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.openai_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Reject input the backend would refuse anyway
    fn check_input(&self, text: &str) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyInput);
        }
        let chars = text.chars().count();
        if chars > self.config.max_input_chars {
            return Err(SpeechError::InputTooLong {
                chars,
                max_chars: self.config.max_input_chars,
            });
        }
        Ok(())
    }

    fn body<'a>(&'a self, text: &'a str, voice: &'a str) -> SpeechBody<'a> {
        SpeechBody {
            model: &self.config.tts_model,
            input: text,
            voice,
            response_format: self.config.output_format,
            speed: ((self.config.speed - 1.0).abs() > f32::EPSILON).then_some(self.config.speed),
        }
    }

    /// Classify a non-success reply
    fn failure(&self, status: StatusCode, body: &str, voice: &str) -> SpeechError {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            match envelope.error.code.as_deref() {
                Some("rate_limit_exceeded") => return SpeechError::RateLimited,
                Some("model_not_found") => {
                    return SpeechError::UnknownModel(self.config.tts_model.clone());
                },
                Some("invalid_voice") => return SpeechError::UnknownVoice(voice.to_string()),
                _ if status.is_client_error() => {
                    return SpeechError::Rejected {
                        status: status.as_u16(),
                        message: envelope.error.message,
                    };
                },
                _ => {},
            }
        }

        match status {
            StatusCode::TOO_MANY_REQUESTS => SpeechError::RateLimited,
            s if s.is_server_error() => SpeechError::Unavailable(format!("{s}: {body}")),
            s => SpeechError::Rejected {
                status: s.as_u16(),
                message: body.to_string(),
            },
        }
    }
}

#[async_trait]
impl SpeechProvider for OpenAISpeechProvider {
    #[instrument(skip(self, text), fields(chars = text.chars().count(), format = %self.config.output_format))]
    async fn synthesize(&self, text: &str, voice: &str) -> Result<SpeechAudio, SpeechError> {
        self.check_input(text)?;

        let response = self
            .client
            .post(self.endpoint("audio/speech"))
            .bearer_auth(&self.api_key)
            .json(&self.body(text, voice))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Speech request failed");
            return Err(self.failure(status, &body, voice));
        }

        let data = response.bytes().await?;
        if data.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        debug!(bytes = data.len(), "Speech received");
        Ok(SpeechAudio::new(data, self.config.output_format))
    }

    async fn is_available(&self) -> bool {
        let check = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match check {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "Speech backend health check failed");
                false
            },
            Err(e) => {
                warn!(error = %e, "Speech backend unreachable");
                false
            },
        }
    }

    fn model(&self) -> &str {
        &self.config.tts_model
    }

    fn max_input_chars(&self) -> usize {
        self.config.max_input_chars
    }
}
