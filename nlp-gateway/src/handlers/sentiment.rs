use axum::{extract::State, Json};
use service_core::utils::ValidatedJson;
use std::time::Instant;

use crate::models::{AiResponse, SentimentAnalysisRequest};
use crate::services::BackendError;
use crate::startup::AppState;

#[tracing::instrument(skip(state, request))]
pub async fn analyze_sentiment(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SentimentAnalysisRequest>,
) -> Json<AiResponse> {
    let started = Instant::now();

    let result = match state.backend.analyze_sentiment(&request.text).await {
        Ok(analysis) => serde_json::to_value(analysis).map_err(BackendError::from),
        Err(e) => Err(e),
    };

    super::respond("sentiment", state.backend.model_id(), started, result)
}
