//! The NLP capability handlers call.
//!
//! [`LiveBackend`] templates prompts and delegates to a [`TextProvider`];
//! [`MockBackend`] answers deterministically without any network access.
//! One of them is chosen at startup and shared read-only by all requests.
//!
//! [`TextProvider`]: crate::services::providers::TextProvider

pub mod live;
pub mod mock;

pub use live::LiveBackend;
pub use mock::MockBackend;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ModelDescriptor;
use crate::services::providers::{GenerationParams, ProviderError};
use crate::services::sentiment::SentimentAnalysis;

/// Capabilities advertised by the mock model.
pub const TEXT_CAPABILITIES: &[&str] = &[
    "text-generation",
    "summarization",
    "translation",
    "sentiment-analysis",
];

/// Capabilities advertised by a live Gemini model.
pub const LIVE_CAPABILITIES: &[&str] = &[
    "text-generation",
    "chat",
    "summarization",
    "translation",
    "sentiment-analysis",
];

/// Error surfaced to callers in the envelope's `error` field.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Text generation failed: {0}")]
    Generation(ProviderError),

    #[error("Sentiment analysis failed: {0}")]
    Sentiment(ProviderError),

    #[error("Summarization failed: {0}")]
    Summarization(ProviderError),

    #[error("Translation failed: {0}")]
    Translation(ProviderError),

    #[error("Backend unavailable: {0}")]
    Unavailable(ProviderError),

    #[error("Failed to encode response payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl BackendError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::Generation(e)
            | BackendError::Sentiment(e)
            | BackendError::Summarization(e)
            | BackendError::Translation(e)
            | BackendError::Unavailable(e) => e.kind(),
            BackendError::Payload(_) => "payload",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Live,
    Mock,
}

#[async_trait]
pub trait NlpBackend: Send + Sync {
    /// Identifier reported as `model_used`.
    fn model_id(&self) -> &str;

    fn mode(&self) -> BackendMode;

    /// Descriptors for `/ai/models` and `/health`.
    fn models(&self) -> Vec<ModelDescriptor>;

    async fn generate_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError>;

    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentAnalysis, BackendError>;

    async fn summarize_text(&self, text: &str, max_length: u32) -> Result<String, BackendError>;

    async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, BackendError>;

    /// Readiness probe.
    async fn health_check(&self) -> Result<(), BackendError>;
}
