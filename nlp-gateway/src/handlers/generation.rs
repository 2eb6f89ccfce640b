use axum::{extract::State, Json};
use serde_json::json;
use service_core::utils::ValidatedJson;
use std::time::Instant;

use crate::models::{AiResponse, TextGenerationRequest};
use crate::services::providers::GenerationParams;
use crate::startup::AppState;

#[tracing::instrument(skip(state, request))]
pub async fn generate_text(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TextGenerationRequest>,
) -> Json<AiResponse> {
    let started = Instant::now();
    let params = GenerationParams {
        temperature: Some(request.temperature()),
        max_tokens: Some(request.output_token_limit()),
    };

    let result = state
        .backend
        .generate_text(&request.prompt, &params)
        .await
        .map(|generated| {
            json!({
                "generated_text": generated,
                "prompt": request.prompt,
            })
        });

    super::respond("generate", state.backend.model_id(), started, result)
}
