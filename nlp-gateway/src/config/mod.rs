use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Gemini REST API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub backend: BackendSelection,
    pub models: ModelConfig,
    pub google: GoogleConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model used for every text operation (e.g., gemini-2.0-flash)
    pub text_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Absent credential puts the gateway in mock mode.
    pub api_key: Option<String>,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Which backend the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSelection {
    /// Live when a credential is present, mock otherwise.
    Auto,
    Live,
    Mock,
}

impl FromStr for BackendSelection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendSelection::Auto),
            "live" => Ok(BackendSelection::Live),
            "mock" => Ok(BackendSelection::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "GATEWAY_BACKEND must be one of auto, live, mock (got '{}')",
                other
            ))),
        }
    }
}

impl GoogleConfig {
    /// The credential, if one is set and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl GatewayConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        if let Ok(port) = env::var("AI_SERVICE_PORT") {
            common_config.port = port.parse().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("AI_SERVICE_PORT is not a port: {}", e))
            })?;
        }

        Ok(GatewayConfig {
            common: common_config,
            backend: get_env("GATEWAY_BACKEND", Some("auto"), is_prod)?.parse()?,
            models: ModelConfig {
                text_model: get_env("GENAI_TEXT_MODEL", Some(DEFAULT_TEXT_MODEL), is_prod)?,
            },
            google: GoogleConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .or_else(|_| env::var("GOOGLE_API_KEY"))
                    .ok(),
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                request_timeout_secs: parse_timeout_secs(&get_env(
                    "GEMINI_REQUEST_TIMEOUT_SECS",
                    Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?)?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "CORS_ALLOWED_ORIGINS",
                    Some("*"),
                    is_prod,
                )?),
            },
        })
    }
}

/// Outbound timeout in whole seconds; zero would fail every provider call.
fn parse_timeout_secs(raw: &str) -> Result<u64, AppError> {
    let secs: u64 = raw.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "GEMINI_REQUEST_TIMEOUT_SECS is not a number of seconds: {}",
            e
        ))
    })?;

    if secs == 0 {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "GEMINI_REQUEST_TIMEOUT_SECS must be greater than zero"
        )));
    }

    Ok(secs)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
