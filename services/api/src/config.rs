//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    pub environment: String,
    pub cors_origins: Vec<String>,

    // Taste-graph API
    pub qloo_api_key: Option<String>,
    pub qloo_api_url: String,

    // LLM provider
    pub openai_api_key: Option<String>,
    pub llm_model: String,

    // Weather API
    pub openweather_api_key: Option<String>,
    pub openweather_api_url: String,

    // Auth provider
    pub clerk_secret_key: Option<String>,
    pub clerk_api_url: String,
    pub clerk_webhook_secret: Option<String>,

    /// Per-call budget for every outbound adapter request.
    pub upstream_timeout: Duration,
    /// End-to-end budget for the heaviest vertical (travel planning).
    pub travel_plan_budget: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server and database settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        // --- External API credentials (optional; adapters fail as upstream
        // errors at call time when a key is absent) ---
        let qloo_api_key = std::env::var("QLOO_API_KEY").ok();
        let qloo_api_url =
            std::env::var("QLOO_API_URL").unwrap_or_else(|_| "https://api.qloo.com/v2".to_string());

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let llm_model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let openweather_api_key = std::env::var("OPENWEATHER_API_KEY").ok();
        let openweather_api_url = std::env::var("OPENWEATHER_API_URL")
            .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".to_string());

        let clerk_secret_key = std::env::var("CLERK_SECRET_KEY").ok();
        let clerk_api_url = std::env::var("CLERK_API_URL")
            .unwrap_or_else(|_| "https://api.clerk.com/v1".to_string());
        let clerk_webhook_secret = std::env::var("CLERK_WEBHOOK_SECRET").ok();

        // --- Timeouts ---
        let upstream_timeout = parse_seconds("UPSTREAM_TIMEOUT_SECS", 30)?;
        let travel_plan_budget = parse_seconds("TRAVEL_PLAN_BUDGET_SECS", 75)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            environment,
            cors_origins,
            qloo_api_key,
            qloo_api_url,
            openai_api_key,
            llm_model,
            openweather_api_key,
            openweather_api_url,
            clerk_secret_key,
            clerk_api_url,
            clerk_webhook_secret,
            upstream_timeout,
            travel_plan_budget,
        })
    }
}

fn parse_seconds(var: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}
