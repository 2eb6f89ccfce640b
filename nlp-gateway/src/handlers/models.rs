use axum::{extract::State, Json};
use serde_json::json;
use std::time::Instant;

use crate::models::AiResponse;
use crate::startup::AppState;

/// `model_used` reported by the catalog endpoint, which calls no model.
const SYSTEM_MODEL: &str = "system";

pub async fn list_models(State(state): State<AppState>) -> Json<AiResponse> {
    let started = Instant::now();
    let models = state.backend.models();

    let data = json!({
        "total": models.len(),
        "models": models,
    });

    Json(AiResponse::success(data, SYSTEM_MODEL, started))
}
