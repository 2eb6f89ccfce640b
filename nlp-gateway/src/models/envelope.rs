//! The uniform response record returned by every operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Response envelope.
///
/// `data` and `error` are always serialized (as `null` when unset) so every
/// response carries the same six keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub model_used: String,
    pub processing_time_ms: f64,
}

impl AiResponse {
    pub fn success(data: Value, model_used: impl Into<String>, started: Instant) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            model_used: model_used.into(),
            processing_time_ms: elapsed_ms(started),
        }
    }

    pub fn failure(error: impl Into<String>, model_used: impl Into<String>, started: Instant) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
            model_used: model_used.into(),
            processing_time_ms: elapsed_ms(started),
        }
    }
}

/// Wall-clock milliseconds since `started`.
pub fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
