//! Inference engine port
//!
//! A request is a single prompt with an optional system instruction; the
//! engine turns it into whatever wire format its server speaks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// One message of a chat exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A one-shot generation request
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    /// Instruction sent ahead of the prompt
    pub system: Option<String>,
    /// The prompt itself
    pub prompt: String,
    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Chat messages for this request, system instruction first
    pub fn messages(&self) -> Vec<ChatMessage> {
        let system = self.system.iter().map(|content| ChatMessage {
            role: ChatRole::System,
            content: content.clone(),
        });
        let user = std::iter::once(ChatMessage {
            role: ChatRole::User,
            content: self.prompt.clone(),
        });
        system.chain(user).collect()
    }
}

/// Why the model stopped producing tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model finished on its own
    Completed,
    /// The token budget ran out mid-text
    TokenLimit,
    /// The server did not say
    Unknown,
}

impl StopReason {
    /// Interpret a server-reported reason (`stop`, `length`, ...)
    pub fn from_reported(reason: Option<&str>, done: bool) -> Self {
        match reason {
            Some("length") => Self::TokenLimit,
            Some(_) => Self::Completed,
            None if done => Self::Completed,
            None => Self::Unknown,
        }
    }
}

/// Text returned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResponse {
    pub content: String,
    /// Model that actually answered
    pub model: String,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub stop: StopReason,
}

impl InferenceResponse {
    /// Prompt plus completion tokens, when the server reported both
    pub fn total_tokens(&self) -> Option<u32> {
        Some(self.prompt_tokens? + self.completion_tokens?)
    }

    /// The text was cut off by the token budget
    pub fn is_truncated(&self) -> bool {
        self.stop == StopReason::TokenLimit
    }
}

/// Text generation backend
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Run a request to completion
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError>;

    /// Whether the server answers at all
    async fn is_reachable(&self) -> bool;

    /// Model every request is sent to
    fn model(&self) -> &str;
}
