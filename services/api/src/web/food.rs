//! Handlers for the food vertical.

use axum::{extract::State, response::Json, Extension};
use std::sync::Arc;

use crate::error::ApiError;
use crate::schemas::food::{
    FoodAnalysisRequest, FoodAnalysisResponse, FoodRecommendationRequest,
    FoodRecommendationResponse,
};
use crate::web::middleware::MaybeUser;
use crate::web::state::AppState;

/// Analyze a dish: nutrition, cultural context, and related dishes.
#[utoipa::path(
    post,
    path = "/api/v1/food/analyze",
    request_body = FoodAnalysisRequest,
    responses(
        (status = 200, description = "Analysis complete", body = FoodAnalysisResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "food"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<FoodAnalysisRequest>,
) -> Result<Json<FoodAnalysisResponse>, ApiError> {
    request.validate()?;
    let response = state
        .food
        .analyze_food(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}

/// Recommend dishes from free-text preferences.
#[utoipa::path(
    post,
    path = "/api/v1/food/recommendations",
    request_body = FoodRecommendationRequest,
    responses(
        (status = 200, description = "Recommendations ready", body = FoodRecommendationResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "food"
)]
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<FoodRecommendationRequest>,
) -> Result<Json<FoodRecommendationResponse>, ApiError> {
    request.validate()?;
    let response = state
        .food
        .food_recommendations(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}
