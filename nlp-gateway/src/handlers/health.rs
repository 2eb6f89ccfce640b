use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::models::{AiResponse, HealthStatus};
use crate::services::{metrics as gateway_metrics, BackendMode};
use crate::startup::AppState;

const SERVICE_NAME: &str = "nlp-gateway";

/// Service info.
pub async fn root(State(state): State<AppState>) -> Json<AiResponse> {
    let started = Instant::now();
    let data = json!({
        "message": "NLP gateway: text generation, sentiment analysis, summarization and translation",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    });

    Json(AiResponse::success(data, state.backend.model_id(), started))
}

/// Liveness and sub-service status.
///
/// A missing provider credential is reported here as `mock`; it never makes
/// the gateway itself unhealthy.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    let provider_status = match state.backend.mode() {
        BackendMode::Live => "healthy",
        BackendMode::Mock => "mock",
    };

    let services = BTreeMap::from([
        ("gemini_api".to_string(), provider_status.to_string()),
        ("http_server".to_string(), "healthy".to_string()),
    ]);

    let models_available = state
        .backend
        .models()
        .into_iter()
        .map(|model| model.id)
        .collect();

    Json(HealthStatus {
        status: "healthy".to_string(),
        services,
        models_available,
        timestamp: Utc::now(),
    })
}

/// Readiness check: the backend must answer its own health probe.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.backend.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(StatusCode::OK)
}

/// Prometheus exposition.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gateway_metrics::get_metrics(),
    )
}
