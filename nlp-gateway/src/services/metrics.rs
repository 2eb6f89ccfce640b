//! Prometheus metrics for nlp-gateway.
//!
//! Provides per-operation request metrics and provider-level metrics.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Gateway operation metrics
pub static NLP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static NLP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

// Provider metrics
pub static NLP_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static NLP_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static NLP_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

// Sentiment decoding
pub static NLP_SENTIMENT_PARSE_FALLBACKS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics.
///
/// Safe to call more than once; only the first call registers anything.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    // Operation counter (outcome: success, error)
    let requests_total = IntCounterVec::new(
        Opts::new("nlp_requests_total", "Total number of NLP operation requests"),
        &["operation", "outcome"],
    )?;

    let request_duration = HistogramVec::new(
        HistogramOpts::new(
            "nlp_request_duration_seconds",
            "NLP operation duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )?;

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "nlp_provider_latency_seconds",
            "AI provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )?;

    let provider_errors = IntCounterVec::new(
        Opts::new("nlp_provider_errors_total", "Total AI provider errors"),
        &["provider", "error_type"],
    )?;

    // Token counter (type: input, output)
    let tokens = IntCounterVec::new(
        Opts::new("nlp_tokens_total", "Total tokens processed"),
        &["model", "type"],
    )?;

    let sentiment_fallbacks = IntCounterVec::new(
        Opts::new(
            "nlp_sentiment_parse_fallbacks_total",
            "Sentiment answers that could not be decoded and fell back to neutral",
        ),
        &["reason"],
    )?;

    // Register all metrics
    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(request_duration.clone()))?;
    registry.register(Box::new(provider_latency.clone()))?;
    registry.register(Box::new(provider_errors.clone()))?;
    registry.register(Box::new(tokens.clone()))?;
    registry.register(Box::new(sentiment_fallbacks.clone()))?;

    // Initialize globals
    if REGISTRY.set(registry).is_err() {
        // Lost a race with a concurrent initializer
        return Ok(());
    }
    let _ = NLP_REQUESTS_TOTAL.set(requests_total);
    let _ = NLP_REQUEST_DURATION_SECONDS.set(request_duration);
    let _ = NLP_PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = NLP_PROVIDER_ERRORS_TOTAL.set(provider_errors);
    let _ = NLP_TOKENS_TOTAL.set(tokens);
    let _ = NLP_SENTIMENT_PARSE_FALLBACKS_TOTAL.set(sentiment_fallbacks);

    tracing::info!("Prometheus metrics initialized");
    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

// Helper functions for recording metrics

/// Record a completed operation.
pub fn record_request(operation: &str, outcome: &str, duration_secs: f64) {
    if let Some(counter) = NLP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
    if let Some(histogram) = NLP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[operation])
            .observe(duration_secs);
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(histogram) = NLP_PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = NLP_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}

/// Record token usage.
pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    if let Some(counter) = NLP_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(input_tokens.max(0) as u64);
        counter
            .with_label_values(&[model, "output"])
            .inc_by(output_tokens.max(0) as u64);
    }
}

/// Record a sentiment answer that fell back to neutral.
pub fn record_sentiment_fallback(reason: &str) {
    if let Some(counter) = NLP_SENTIMENT_PARSE_FALLBACKS_TOTAL.get() {
        counter.with_label_values(&[reason]).inc();
    }
}
