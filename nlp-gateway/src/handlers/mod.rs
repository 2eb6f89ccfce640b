//! HTTP handlers for the gateway.
//!
//! Operation handlers never fail at the HTTP level once the body is valid:
//! backend errors come back in-band as `success = false` envelopes.

pub mod generation;
pub mod health;
pub mod models;
pub mod sentiment;
pub mod summarize;
pub mod translate;

pub use generation::generate_text;
pub use health::{health_check, metrics, readiness_check, root};
pub use models::list_models;
pub use sentiment::analyze_sentiment;
pub use summarize::summarize_text;
pub use translate::translate_text;

use axum::Json;
use serde_json::Value;
use std::time::Instant;

use crate::models::AiResponse;
use crate::services::{metrics as gateway_metrics, BackendError};

/// Wrap an operation result in the envelope, logging and counting failures.
pub(crate) fn respond(
    operation: &'static str,
    model_used: &str,
    started: Instant,
    result: Result<Value, BackendError>,
) -> Json<AiResponse> {
    let response = match result {
        Ok(data) => AiResponse::success(data, model_used, started),
        Err(e) => {
            tracing::error!(
                operation,
                kind = e.kind(),
                error = %e,
                "Operation failed"
            );
            AiResponse::failure(e.to_string(), model_used, started)
        }
    };

    let outcome = if response.success { "success" } else { "error" };
    gateway_metrics::record_request(operation, outcome, response.processing_time_ms / 1000.0);

    Json(response)
}
