use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `GET /health`, rebuilt on every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub services: BTreeMap<String, String>,
    pub models_available: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
