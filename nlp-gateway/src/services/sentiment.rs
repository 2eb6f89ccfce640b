//! Sentiment verdicts and decoding of the provider's JSON answer.
//!
//! The provider is asked for JSON but answers in free text, so decoding is
//! strict: the outermost `{...}` span must deserialize into the expected
//! fields with a known label. Anything else becomes an explicit neutral,
//! zero-confidence fallback that is logged and counted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

/// Payload of the sentiment operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub emotions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Set when the provider answer could not be decoded.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum SentimentParseError {
    #[error("no JSON object in provider answer")]
    NoJsonObject,

    #[error("malformed verdict: {0}")]
    Malformed(String),

    #[error("unknown sentiment label '{0}'")]
    UnknownLabel(String),

    #[error("confidence is not a finite number")]
    InvalidConfidence,
}

impl SentimentParseError {
    fn reason(&self) -> &'static str {
        match self {
            SentimentParseError::NoJsonObject => "no_json",
            SentimentParseError::Malformed(_) => "malformed",
            SentimentParseError::UnknownLabel(_) => "unknown_label",
            SentimentParseError::InvalidConfidence => "invalid_confidence",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderVerdict {
    sentiment: String,
    confidence: f64,
    #[serde(default)]
    emotions: Vec<String>,
}

/// Decode a provider answer into a verdict.
pub fn parse_verdict(raw: &str) -> Result<SentimentAnalysis, SentimentParseError> {
    let object = extract_json_object(raw).ok_or(SentimentParseError::NoJsonObject)?;

    let verdict: ProviderVerdict = serde_json::from_str(object)
        .map_err(|e| SentimentParseError::Malformed(e.to_string()))?;

    let sentiment = SentimentLabel::parse(&verdict.sentiment)
        .ok_or_else(|| SentimentParseError::UnknownLabel(verdict.sentiment.clone()))?;

    if !verdict.confidence.is_finite() {
        return Err(SentimentParseError::InvalidConfidence);
    }

    Ok(SentimentAnalysis {
        sentiment,
        confidence: verdict.confidence.clamp(0.0, 1.0),
        emotions: verdict.emotions,
        raw_response: Some(raw.to_string()),
        fallback: false,
        mock: false,
    })
}

/// Decode a provider answer, degrading to a neutral verdict on failure.
pub fn interpret(raw: String) -> SentimentAnalysis {
    match parse_verdict(&raw) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(
                reason = e.reason(),
                error = %e,
                raw_len = raw.len(),
                "Sentiment answer not decodable, using neutral fallback"
            );
            metrics::record_sentiment_fallback(e.reason());

            SentimentAnalysis {
                sentiment: SentimentLabel::Neutral,
                confidence: 0.0,
                emotions: Vec::new(),
                raw_response: Some(raw),
                fallback: true,
                mock: false,
            }
        }
    }
}

/// The outermost `{...}` span, which also strips Markdown code fences.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}
