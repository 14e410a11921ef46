//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        clerk::ClerkAdapter, db::DbAdapter, llm::OpenAiLlmAdapter, taste_graph::QlooAdapter,
        weather::OpenWeatherAdapter,
    },
    config::Config,
    error::ApiError,
    web::{build_router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use culturo_core::ports::WeatherService;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let taste_adapter = Arc::new(QlooAdapter::new(
        config.qloo_api_url.clone(),
        config.qloo_api_key.clone(),
        config.upstream_timeout,
    )?);

    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let llm_adapter = Arc::new(OpenAiLlmAdapter::new(
        Client::with_config(openai_config),
        config.llm_model.clone(),
        config.upstream_timeout,
    ));

    // Weather is an optional integration; without a key, travel plans are
    // produced without an outlook.
    let weather_adapter: Option<Arc<dyn WeatherService>> = match &config.openweather_api_key {
        Some(_) => Some(Arc::new(OpenWeatherAdapter::new(
            config.openweather_api_url.clone(),
            config.openweather_api_key.clone(),
            config.upstream_timeout,
        )?)),
        None => {
            warn!("OPENWEATHER_API_KEY not set; travel plans will omit weather");
            None
        }
    };

    let auth_adapter = Arc::new(ClerkAdapter::new(
        config.clerk_api_url.clone(),
        config.clerk_secret_key.clone(),
        config.upstream_timeout,
    )?);

    // --- 4. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState::new(
        config.clone(),
        db_adapter,
        taste_adapter,
        llm_adapter,
        weather_adapter,
        auth_adapter,
    ));
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
