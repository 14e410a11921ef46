//! Handlers for the travel vertical.

use axum::{extract::State, response::Json, Extension};
use std::sync::Arc;

use crate::error::ApiError;
use crate::schemas::travel::{
    CulturalInsightsRequest, CulturalInsightsResponse, DestinationRequest, DestinationResponse,
    TravelPlanRequest, TravelPlanResponse,
};
use crate::web::middleware::MaybeUser;
use crate::web::state::AppState;

/// Plan a culturally-aware itinerary for a destination.
#[utoipa::path(
    post,
    path = "/api/v1/travel/plan",
    request_body = TravelPlanRequest,
    responses(
        (status = 200, description = "Itinerary planned", body = TravelPlanResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure"),
        (status = 503, description = "Planning exceeded its time budget")
    ),
    tag = "travel"
)]
pub async fn plan(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<TravelPlanRequest>,
) -> Result<Json<TravelPlanResponse>, ApiError> {
    request.validate()?;
    let response = state
        .travel
        .plan_trip(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}

/// Recommend destinations matching a set of interests.
#[utoipa::path(
    post,
    path = "/api/v1/travel/destinations",
    request_body = DestinationRequest,
    responses(
        (status = 200, description = "Destinations ready", body = DestinationResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "travel"
)]
pub async fn destinations(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<DestinationRequest>,
) -> Result<Json<DestinationResponse>, ApiError> {
    request.validate()?;
    let response = state
        .travel
        .recommend_destinations(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}

/// Cultural briefing for a destination.
#[utoipa::path(
    post,
    path = "/api/v1/travel/insights",
    request_body = CulturalInsightsRequest,
    responses(
        (status = 200, description = "Insights ready", body = CulturalInsightsResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "travel"
)]
pub async fn insights(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<CulturalInsightsRequest>,
) -> Result<Json<CulturalInsightsResponse>, ApiError> {
    request.validate()?;
    let response = state
        .travel
        .cultural_insights(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}
