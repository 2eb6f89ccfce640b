#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use nlp_gateway::config::{
    BackendSelection, CorsConfig, GatewayConfig, GoogleConfig, ModelConfig,
    DEFAULT_GEMINI_API_BASE,
};
use nlp_gateway::startup::Application;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const TEST_MODEL: &str = "gemini-test";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the gateway in mock mode (no credential).
    pub async fn spawn_mock() -> Self {
        Self::spawn(config(None, DEFAULT_GEMINI_API_BASE)).await
    }

    /// Spawn the gateway in live mode against the given Gemini base URL.
    pub async fn spawn_live(api_base: &str) -> Self {
        Self::spawn(config(Some("test-api-key"), api_base)).await
    }

    pub async fn spawn(config: GatewayConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// POST and decode the envelope, asserting the HTTP call itself succeeded.
    pub async fn envelope(&self, path: &str, body: Value) -> Value {
        let response = self.post_json(path, body).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("Failed to parse JSON")
    }
}

pub fn config(api_key: Option<&str>, api_base: &str) -> GatewayConfig {
    GatewayConfig {
        common: CoreConfig { port: 0 },
        backend: BackendSelection::Auto,
        models: ModelConfig {
            text_model: TEST_MODEL.to_string(),
        },
        google: GoogleConfig {
            api_key: api_key.map(str::to_string),
            api_base: api_base.to_string(),
            request_timeout_secs: 5,
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

/// Assert the invariant shape shared by every envelope.
pub fn assert_envelope_shape(body: &Value) {
    let object = body.as_object().expect("envelope must be an object");
    for key in [
        "success",
        "data",
        "error",
        "timestamp",
        "model_used",
        "processing_time_ms",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert!(body["success"].is_boolean());
    assert!(body["timestamp"].is_string());
    assert!(body["model_used"].is_string());
    assert!(body["processing_time_ms"].as_f64().unwrap() >= 0.0);

    if body["success"] == true {
        assert!(body["data"].is_object());
        assert!(body["error"].is_null());
    } else {
        assert!(body["data"].is_null());
        assert!(body["error"].is_string());
    }
}

/// What the fake Gemini endpoint answers with.
#[derive(Clone)]
pub enum GeminiReply {
    Text(String),
    Status(u16, String),
}

#[derive(Clone)]
struct FakeGeminiState {
    reply: GeminiReply,
    received: Arc<Mutex<Vec<(String, Value)>>>,
}

/// A local stand-in for the Gemini REST API.
pub struct FakeGemini {
    pub api_base: String,
    received: Arc<Mutex<Vec<(String, Value)>>>,
}

impl FakeGemini {
    pub async fn spawn(reply: GeminiReply) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = FakeGeminiState {
            reply,
            received: received.clone(),
        };

        let app = Router::new()
            .route("/v1beta/models", get(list_models))
            .route("/v1beta/models/:call", post(generate_content))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Gemini");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        FakeGemini {
            api_base: format!("http://{}/v1beta", addr),
            received,
        }
    }

    /// `(path segment, request body)` of every generateContent call so far.
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.received.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> (String, Value) {
        self.requests()
            .pop()
            .expect("fake Gemini received no request")
    }

    pub fn last_prompt(&self) -> String {
        let (_, body) = self.last_request();
        body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

async fn list_models() -> Json<Value> {
    Json(json!({"models": [{"name": format!("models/{}", TEST_MODEL)}]}))
}

async fn generate_content(
    State(state): State<FakeGeminiState>,
    Path(call): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.received.lock().unwrap().push((call, body));

    match state.reply {
        GeminiReply::Text(text) => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
        }))
        .into_response(),
        GeminiReply::Status(code, message) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message,
        )
            .into_response(),
    }
}
