//! Request bodies, one per operation.
//!
//! Optional fields deserialize `null` and absence alike; the accessors apply
//! the documented defaults.

use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Largest output budget Gemini text models accept.
pub const MAX_OUTPUT_TOKENS: u32 = 8192;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_SUMMARY_LENGTH: u32 = 200;
pub const AUTO_DETECT_LANGUAGE: &str = "auto";

#[derive(Debug, Deserialize, Validate)]
pub struct TextGenerationRequest {
    pub prompt: String,
    #[validate(range(min = 1, max = 8192, message = "max_tokens must be between 1 and 8192"))]
    pub max_tokens: Option<u32>,
    #[validate(range(min = 0.0, max = 2.0, message = "temperature must be between 0 and 2"))]
    pub temperature: Option<f32>,
}

impl TextGenerationRequest {
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// `max_tokens` as the provider's signed field, never above [`MAX_OUTPUT_TOKENS`].
    pub fn output_token_limit(&self) -> i32 {
        i32::try_from(self.max_tokens().min(MAX_OUTPUT_TOKENS)).unwrap_or(i32::MAX)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SentimentAnalysisRequest {
    pub text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SummarizationRequest {
    pub text: String,
    #[validate(range(min = 1, message = "max_length must be at least 1"))]
    pub max_length: Option<u32>,
}

impl SummarizationRequest {
    pub fn max_length(&self) -> u32 {
        self.max_length.unwrap_or(DEFAULT_SUMMARY_LENGTH)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
    pub source_language: Option<String>,
}

impl TranslationRequest {
    pub fn source_language(&self) -> &str {
        self.source_language
            .as_deref()
            .unwrap_or(AUTO_DETECT_LANGUAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_defaults_apply_to_missing_and_null() {
        let omitted: TextGenerationRequest = serde_json::from_str(r#"{"prompt": "hi"}"#).unwrap();
        let nulls: TextGenerationRequest =
            serde_json::from_str(r#"{"prompt": "hi", "max_tokens": null, "temperature": null}"#)
                .unwrap();

        for request in [omitted, nulls] {
            assert_eq!(request.max_tokens(), 1000);
            assert_eq!(request.output_token_limit(), 1000);
            assert!((request.temperature() - 0.7).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn generation_rejects_out_of_range_values() {
        let request: TextGenerationRequest =
            serde_json::from_str(r#"{"prompt": "hi", "temperature": 3.5}"#).unwrap();
        assert!(request.validate().is_err());

        let request: TextGenerationRequest =
            serde_json::from_str(r#"{"prompt": "hi", "max_tokens": 0}"#).unwrap();
        assert!(request.validate().is_err());

        let request: TextGenerationRequest =
            serde_json::from_str(r#"{"prompt": "hi", "max_tokens": 4294967295}"#).unwrap();
        assert!(request.validate().is_err());
        assert_eq!(request.output_token_limit(), 8192);
    }

    #[test]
    fn generation_accepts_full_output_budget() {
        let request: TextGenerationRequest =
            serde_json::from_str(r#"{"prompt": "hi", "max_tokens": 8192}"#).unwrap();
        assert!(request.validate().is_ok());

        let request: TextGenerationRequest =
            serde_json::from_str(r#"{"prompt": "hi", "max_tokens": 8193}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn summary_length_defaults_to_200() {
        let request: SummarizationRequest = serde_json::from_str(r#"{"text": "abc"}"#).unwrap();
        assert_eq!(request.max_length(), 200);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn translation_source_defaults_to_auto() {
        let request: TranslationRequest =
            serde_json::from_str(r#"{"text": "hola", "target_language": "en"}"#).unwrap();
        assert_eq!(request.source_language(), "auto");

        let request: TranslationRequest = serde_json::from_str(
            r#"{"text": "hola", "target_language": "en", "source_language": "es"}"#,
        )
        .unwrap();
        assert_eq!(request.source_language(), "es");
    }

    #[test]
    fn translation_requires_target_language() {
        let result = serde_json::from_str::<TranslationRequest>(r#"{"text": "hola"}"#);
        assert!(result.is_err());
    }
}
