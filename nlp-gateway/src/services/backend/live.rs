//! Backend that templates prompts and delegates them to a text provider.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use super::{BackendError, BackendMode, NlpBackend, LIVE_CAPABILITIES};
use crate::models::requests::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::models::{ModelDescriptor, ModelStatus};
use crate::services::metrics;
use crate::services::prompts;
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use crate::services::sentiment::{self, SentimentAnalysis};

/// Characters per output token assumed when budgeting summaries.
const CHARS_PER_TOKEN: u32 = 4;

/// Live backend.
#[derive(Clone)]
pub struct LiveBackend {
    provider: Arc<dyn TextProvider>,
}

impl LiveBackend {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    fn default_params() -> GenerationParams {
        GenerationParams {
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS as i32),
        }
    }

    /// Send one prompt to the provider and return its text.
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let provider = self.provider.name();
        let model = self.provider.model();
        let started = Instant::now();

        let result = self.provider.generate(prompt, params).await;
        metrics::record_provider_latency(provider, model, started.elapsed().as_secs_f64());

        let response = result.map_err(|e| {
            metrics::record_provider_error(provider, e.kind());
            tracing::error!(provider, model, error = %e, "Provider call failed");
            e
        })?;

        metrics::record_tokens(model, response.input_tokens, response.output_tokens);
        tracing::debug!(
            provider,
            model,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Provider call completed"
        );

        response.text.ok_or_else(|| {
            metrics::record_provider_error(provider, ProviderError::EmptyResponse.kind());
            ProviderError::EmptyResponse
        })
    }
}

/// Output token budget for a summary of `max_length` characters.
pub fn summary_token_budget(max_length: u32) -> i32 {
    (max_length / CHARS_PER_TOKEN).max(1) as i32
}

#[async_trait]
impl NlpBackend for LiveBackend {
    fn model_id(&self) -> &str {
        self.provider.model()
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Live
    }

    fn models(&self) -> Vec<ModelDescriptor> {
        vec![ModelDescriptor::new(
            self.provider.model(),
            "Gemini",
            "Google",
            LIVE_CAPABILITIES,
            ModelStatus::Available,
        )]
    }

    async fn generate_text(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        self.complete(prompt, params)
            .await
            .map_err(BackendError::Generation)
    }

    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentAnalysis, BackendError> {
        let raw = self
            .complete(&prompts::sentiment(text), &Self::default_params())
            .await
            .map_err(BackendError::Sentiment)?;

        Ok(sentiment::interpret(raw))
    }

    async fn summarize_text(&self, text: &str, max_length: u32) -> Result<String, BackendError> {
        let params = GenerationParams {
            max_tokens: Some(summary_token_budget(max_length)),
            ..Self::default_params()
        };

        self.complete(&prompts::summary(text, max_length), &params)
            .await
            .map_err(BackendError::Summarization)
    }

    async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
        source_language: &str,
    ) -> Result<String, BackendError> {
        self.complete(
            &prompts::translation(text, source_language, target_language),
            &Self::default_params(),
        )
        .await
        .map_err(BackendError::Translation)
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        self.provider
            .health_check()
            .await
            .map_err(BackendError::Unavailable)
    }
}
