//! Script generator port - Interface for long-form text generation

use async_trait::async_trait;
use domain::{TopicKey, VerbosityProfile};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// A generated script with generation metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    /// Generated text
    pub text: String,
    /// Model used for generation
    pub model: String,
    /// Number of tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Latency in milliseconds
    pub latency_ms: u64,
}

impl GeneratedScript {
    /// Script with no metadata
    #[must_use]
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: String::new(),
            tokens_used: None,
            latency_ms: 0,
        }
    }
}

/// Port for script generation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScriptGeneratorPort: Send + Sync {
    /// Generate a script about a topic at the given verbosity
    ///
    /// Returns `GenerationFailed` on upstream errors or an empty payload.
    async fn generate(
        &self,
        key: &TopicKey,
        profile: VerbosityProfile,
    ) -> Result<GeneratedScript, ApplicationError>;

    /// Check if the generation backend is reachable
    async fn is_healthy(&self) -> bool;
}
