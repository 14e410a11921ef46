//! services/api/src/web/mod.rs
//!
//! Router assembly, the OpenAPI master definition, and the liveness probe.

pub mod analytics;
pub mod auth;
pub mod food;
pub mod middleware;
pub mod recommendations;
pub mod state;
pub mod stories;
pub mod travel;

use axum::{
    extract::State,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::web::middleware::{optional_auth, require_auth};
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        stories::generate,
        stories::analyze,
        stories::surprise,
        food::analyze,
        food::recommendations,
        travel::plan,
        travel::destinations,
        travel::insights,
        recommendations::personalized,
        recommendations::cultural,
        recommendations::trending,
        analytics::track_event,
        analytics::summary,
        auth::profile,
        auth::update_preferences,
        auth::artifacts,
        auth::verify,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "stories", description = "Culturally-aware story generation and analysis."),
        (name = "food", description = "Cultural food analysis and recommendations."),
        (name = "travel", description = "Itinerary planning and destination insights."),
        (name = "recommendations", description = "Personalized and trending recommendations."),
        (name = "analytics", description = "Event tracking and usage summaries."),
        (name = "auth", description = "Profile, preferences, and token verification.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Liveness
//=========================================================================================

/// Liveness probe with database connectivity status.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let db_ok = state.db.ping().await;
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": if db_ok { "connected" } else { "unavailable" },
        "environment": state.config.environment,
    }))
}

//=========================================================================================
// Router Assembly
//=========================================================================================

/// Builds the full application router. Kept separate from `main` so the
/// integration tests can drive the exact production routing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // No credentials needed; invalid ones are still rejected at the door.
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/v1/auth/verify", post(auth::verify))
        .route("/api/v1/auth/webhook", post(auth::webhook));

    // Anonymous traffic allowed; an offered token must verify.
    let content_routes = Router::new()
        .route("/api/v1/stories/generate", post(stories::generate))
        .route("/api/v1/stories/analyze", post(stories::analyze))
        .route("/api/v1/stories/surprise", post(stories::surprise))
        .route("/api/v1/food/analyze", post(food::analyze))
        .route("/api/v1/food/recommendations", post(food::recommendations))
        .route("/api/v1/travel/plan", post(travel::plan))
        .route("/api/v1/travel/destinations", post(travel::destinations))
        .route("/api/v1/travel/insights", post(travel::insights))
        .route(
            "/api/v1/recommendations/personalized",
            post(recommendations::personalized),
        )
        .route(
            "/api/v1/recommendations/cultural",
            post(recommendations::cultural),
        )
        .route(
            "/api/v1/recommendations/trending",
            get(recommendations::trending),
        )
        .route("/api/v1/analytics/events", post(analytics::track_event))
        .route("/api/v1/analytics/summary", get(analytics::summary))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            optional_auth,
        ));

    let protected_routes = Router::new()
        .route("/api/v1/auth/profile", get(auth::profile))
        .route("/api/v1/auth/preferences", put(auth::update_preferences))
        .route("/api/v1/auth/artifacts", get(auth::artifacts))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(content_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(state)
}
