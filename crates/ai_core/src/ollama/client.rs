//! HTTP client for the Ollama chat API

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::ports::{ChatMessage, InferenceEngine, InferenceRequest, InferenceResponse, StopReason};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Inference engine backed by an Ollama-compatible server
pub struct OllamaInferenceEngine {
    client: Client,
    config: InferenceConfig,
}

impl fmt::Debug for OllamaInferenceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaInferenceEngine")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.default_model)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    keep_alive: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
}

/// Non-streaming reply of `POST /api/chat`
#[derive(Debug, Deserialize)]
struct ChatReply {
    model: String,
    message: ReplyMessage,
    #[serde(default)]
    done: bool,
    done_reason: Option<String>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

impl From<ChatReply> for InferenceResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            stop: StopReason::from_reported(reply.done_reason.as_deref(), reply.done),
            content: reply.message.content,
            model: reply.model,
            prompt_tokens: reply.prompt_eval_count,
            completion_tokens: reply.eval_count,
        }
    }
}

impl OllamaInferenceEngine {
    /// Build an engine; the configuration is validated first
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| InferenceError::InvalidConfig(e.to_string()))?;

        info!(
            base_url = %config.base_url,
            model = %config.default_model,
            "Ollama inference engine ready"
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn chat_body<'a>(&'a self, request: &'a InferenceRequest) -> ChatBody<'a> {
        ChatBody {
            model: &self.config.default_model,
            messages: request.messages(),
            stream: false,
            options: ChatOptions {
                num_predict: request.max_tokens.unwrap_or(self.config.max_tokens),
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
            keep_alive: self.config.keep_alive.as_deref(),
        }
    }
}

/// Classify a failed chat call
fn status_error(status: StatusCode, body: String, model: &str) -> InferenceError {
    match status {
        StatusCode::NOT_FOUND => InferenceError::UnknownModel(model.to_string()),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => InferenceError::Busy,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => InferenceError::Timeout,
        _ => InferenceError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait]
impl InferenceEngine for OllamaInferenceEngine {
    #[instrument(skip(self, request), fields(model))]
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError> {
        let body = self.chat_body(&request);
        tracing::Span::current().record("model", body.model);

        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, body = %text, "Chat request rejected");
            return Err(status_error(status, text, body.model));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| InferenceError::Malformed(e.to_string()))?;
        let response = InferenceResponse::from(reply);

        debug!(
            chars = response.content.chars().count(),
            completion_tokens = ?response.completion_tokens,
            stop = ?response.stop,
            "Chat completed"
        );
        Ok(response)
    }

    async fn is_reachable(&self) -> bool {
        let check = self
            .client
            .get(self.endpoint("version"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match check {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "Inference server health check failed");
                false
            },
            Err(e) => {
                warn!(error = %e, "Inference server unreachable");
                false
            },
        }
    }

    fn model(&self) -> &str {
        &self.config.default_model
    }
}
