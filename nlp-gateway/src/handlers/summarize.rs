use axum::{extract::State, Json};
use serde_json::json;
use service_core::utils::ValidatedJson;
use std::time::Instant;

use crate::models::{AiResponse, SummarizationRequest};
use crate::startup::AppState;

#[tracing::instrument(skip(state, request))]
pub async fn summarize_text(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SummarizationRequest>,
) -> Json<AiResponse> {
    let started = Instant::now();

    let result = state
        .backend
        .summarize_text(&request.text, request.max_length())
        .await
        .map(|summary| {
            json!({
                "summary": summary,
                "original_length": request.text.chars().count(),
            })
        });

    super::respond("summarize", state.backend.model_id(), started, result)
}
