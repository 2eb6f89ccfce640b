//! Application startup and lifecycle management.
//!
//! Builds the backend once from configuration, wires the HTTP router around
//! it, and serves until a shutdown signal arrives.

use crate::config::{BackendSelection, CorsConfig, GatewayConfig};
use crate::handlers;
use crate::services::metrics;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::{LiveBackend, MockBackend, NlpBackend};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, REQUEST_ID_HEADER};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn NlpBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn NlpBackend>) -> Self {
        Self { backend }
    }
}

/// Choose the backend for this process.
///
/// Never fails: anything short of a usable credential degrades to the mock.
pub fn build_backend(config: &GatewayConfig) -> Arc<dyn NlpBackend> {
    if config.backend == BackendSelection::Mock {
        tracing::info!("Mock backend selected by configuration");
        return Arc::new(MockBackend::new());
    }

    let Some(api_key) = config.google.credential() else {
        if config.backend == BackendSelection::Live {
            tracing::warn!("Live backend requested but GEMINI_API_KEY is not set - using mock responses");
        } else {
            tracing::warn!("GEMINI_API_KEY not set - using mock responses");
        }
        return Arc::new(MockBackend::new());
    };

    let gemini_config = GeminiConfig {
        api_key: api_key.to_string(),
        model: config.models.text_model.clone(),
        api_base: config.google.api_base.clone(),
        request_timeout: Duration::from_secs(config.google.request_timeout_secs),
    };

    match GeminiTextProvider::new(gemini_config) {
        Ok(provider) => {
            tracing::info!(
                model = %config.models.text_model,
                "Initialized Gemini text provider"
            );
            Arc::new(LiveBackend::new(Arc::new(provider)))
        }
        Err(e) => {
            tracing::error!("Failed to initialize Gemini provider: {}. Using mock.", e);
            Arc::new(MockBackend::new())
        }
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, request_id.clone()])
        .expose_headers([request_id]);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

/// Build the HTTP router around an already-chosen backend.
pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .route("/ai/text/generate", post(handlers::generate_text))
        .route("/ai/sentiment", post(handlers::analyze_sentiment))
        .route("/ai/summarize", post(handlers::summarize_text))
        .route("/ai/translate", post(handlers::translate_text))
        .route("/ai/models", get(handlers::list_models))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(cors_layer(cors))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: GatewayConfig) -> Result<Self, AppError> {
        metrics::init_metrics().map_err(|e| {
            tracing::error!("Failed to initialize metrics: {}", e);
            AppError::InternalError(anyhow::anyhow!("Metrics registry: {}", e))
        })?;

        let state = AppState::new(build_backend(&config));
        let http_router = router(state.clone(), &config.cors);

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            model = %state.backend.model_id(),
            mode = ?state.backend.mode(),
            "NLP gateway listening"
        );

        Ok(Self {
            port,
            listener,
            router: http_router,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the backend requests are served by.
    pub fn backend(&self) -> &Arc<dyn NlpBackend> {
        &self.state.backend
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GoogleConfig, ModelConfig, DEFAULT_GEMINI_API_BASE};
    use crate::services::BackendMode;

    fn config(backend: BackendSelection, api_key: Option<&str>) -> GatewayConfig {
        GatewayConfig {
            common: service_core::config::Config { port: 0 },
            backend,
            models: ModelConfig {
                text_model: "gemini-2.0-flash".to_string(),
            },
            google: GoogleConfig {
                api_key: api_key.map(str::to_string),
                api_base: DEFAULT_GEMINI_API_BASE.to_string(),
                request_timeout_secs: 5,
            },
            cors: CorsConfig {
                allowed_origins: vec!["*".to_string()],
            },
        }
    }

    #[test]
    fn auto_without_credential_is_mock() {
        let backend = build_backend(&config(BackendSelection::Auto, None));
        assert_eq!(backend.mode(), BackendMode::Mock);
        assert_eq!(backend.model_id(), "mock-gemini");
    }

    #[test]
    fn auto_with_credential_is_live() {
        let backend = build_backend(&config(BackendSelection::Auto, Some("key")));
        assert_eq!(backend.mode(), BackendMode::Live);
        assert_eq!(backend.model_id(), "gemini-2.0-flash");
    }

    #[test]
    fn live_without_credential_degrades_to_mock() {
        let backend = build_backend(&config(BackendSelection::Live, Some("")));
        assert_eq!(backend.mode(), BackendMode::Mock);
    }

    #[test]
    fn mock_selection_ignores_credential() {
        let backend = build_backend(&config(BackendSelection::Mock, Some("key")));
        assert_eq!(backend.mode(), BackendMode::Mock);
    }

    mod routes {
        use super::*;
        use crate::services::providers::{
            GenerationParams, ProviderError, ProviderResponse, TextProvider,
        };
        use crate::services::LiveBackend;
        use async_trait::async_trait;
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use http_body_util::BodyExt;
        use serde_json::Value;
        use tower::util::ServiceExt;

        struct DownProvider;

        #[async_trait]
        impl TextProvider for DownProvider {
            fn name(&self) -> &str {
                "down"
            }

            fn model(&self) -> &str {
                "down-model"
            }

            async fn generate(
                &self,
                _prompt: &str,
                _params: &GenerationParams,
            ) -> Result<ProviderResponse, ProviderError> {
                Err(ProviderError::NetworkError("connection refused".to_string()))
            }

            async fn health_check(&self) -> Result<(), ProviderError> {
                Err(ProviderError::NetworkError("connection refused".to_string()))
            }
        }

        fn app(backend: Arc<dyn NlpBackend>, origins: &[&str]) -> Router {
            let cors = CorsConfig {
                allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            };
            router(AppState::new(backend), &cors)
        }

        fn json_post(uri: &str, body: &str) -> Request<Body> {
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        }

        async fn body_json(response: axum::response::Response) -> Value {
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            serde_json::from_slice(&bytes).unwrap()
        }

        #[tokio::test]
        async fn provider_outage_is_in_band() {
            let backend = Arc::new(LiveBackend::new(Arc::new(DownProvider)));
            let response = app(backend, &["*"])
                .oneshot(json_post("/ai/sentiment", r#"{"text": "hello"}"#))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["success"], false);
            assert_eq!(body["data"], Value::Null);
            assert_eq!(body["model_used"], "down-model");
            assert_eq!(
                body["error"],
                "Sentiment analysis failed: Network error: connection refused"
            );
        }

        #[tokio::test]
        async fn readiness_fails_when_provider_is_down() {
            let backend = Arc::new(LiveBackend::new(Arc::new(DownProvider)));
            let response = app(backend, &["*"])
                .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
            let body = body_json(response).await;
            assert_eq!(body["error"], "Service unavailable");
        }

        #[tokio::test]
        async fn readiness_passes_in_mock_mode() {
            let response = app(Arc::new(MockBackend::new()), &["*"])
                .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn preflight_allows_configured_origin() {
            let request = Request::builder()
                .method("OPTIONS")
                .uri("/ai/translate")
                .header("origin", "https://app.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap();

            let response = app(Arc::new(MockBackend::new()), &["https://app.example.com"])
                .oneshot(request)
                .await
                .unwrap();

            assert_eq!(
                response.headers()["access-control-allow-origin"],
                "https://app.example.com"
            );
        }

        #[tokio::test]
        async fn unknown_route_is_not_found() {
            let response = app(Arc::new(MockBackend::new()), &["*"])
                .oneshot(Request::get("/ai/unknown").body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }
}
