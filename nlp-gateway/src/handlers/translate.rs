use axum::{extract::State, Json};
use serde_json::json;
use service_core::utils::ValidatedJson;
use std::time::Instant;

use crate::models::{AiResponse, TranslationRequest};
use crate::startup::AppState;

#[tracing::instrument(skip(state, request))]
pub async fn translate_text(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TranslationRequest>,
) -> Json<AiResponse> {
    let started = Instant::now();
    let source_language = request.source_language();

    let result = state
        .backend
        .translate_text(&request.text, &request.target_language, source_language)
        .await
        .map(|translated| {
            json!({
                "translated_text": translated,
                "source_language": source_language,
                "target_language": request.target_language,
            })
        });

    super::respond("translate", state.backend.model_id(), started, result)
}
