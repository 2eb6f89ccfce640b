//! Deterministic backend used when no provider credential is configured.

use async_trait::async_trait;

use super::{BackendError, BackendMode, NlpBackend, TEXT_CAPABILITIES};
use crate::models::{ModelDescriptor, ModelStatus};
use crate::services::providers::GenerationParams;
use crate::services::sentiment::{SentimentAnalysis, SentimentLabel};

pub const MOCK_MODEL_ID: &str = "mock-gemini";

/// Words that make the mock classify a text as positive.
const POSITIVE_KEYWORDS: &[&str] = &["good", "great", "excellent", "love", "amazing"];

const MOCK_CONFIDENCE: f64 = 0.85;
const PROMPT_ECHO_CHARS: usize = 50;

/// Mock backend.
#[derive(Debug, Default, Clone)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }
}

fn classify(text: &str) -> SentimentLabel {
    let lowered = text.to_lowercase();
    if POSITIVE_KEYWORDS.iter().any(|word| lowered.contains(word)) {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Negative
    }
}

#[async_trait]
impl NlpBackend for MockBackend {
    fn model_id(&self) -> &str {
        MOCK_MODEL_ID
    }

    fn mode(&self) -> BackendMode {
        BackendMode::Mock
    }

    fn models(&self) -> Vec<ModelDescriptor> {
        vec![ModelDescriptor::new(
            MOCK_MODEL_ID,
            "Mock Gemini",
            "Mock",
            TEXT_CAPABILITIES,
            ModelStatus::Mock,
        )]
    }

    async fn generate_text(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, BackendError> {
        let head: String = prompt.chars().take(PROMPT_ECHO_CHARS).collect();
        Ok(format!("Mock response for prompt: {}...", head))
    }

    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentAnalysis, BackendError> {
        let sentiment = classify(text);
        let emotion = match sentiment {
            SentimentLabel::Positive => "joy",
            _ => "sadness",
        };

        Ok(SentimentAnalysis {
            sentiment,
            confidence: MOCK_CONFIDENCE,
            emotions: vec![emotion.to_string()],
            raw_response: None,
            fallback: false,
            mock: true,
        })
    }

    async fn summarize_text(&self, text: &str, _max_length: u32) -> Result<String, BackendError> {
        Ok(format!(
            "Mock summary of {} character text",
            text.chars().count()
        ))
    }

    async fn translate_text(
        &self,
        text: &str,
        target_language: &str,
        _source_language: &str,
    ) -> Result<String, BackendError> {
        Ok(format!("[MOCK TRANSLATION to {}]: {}", target_language, text))
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
