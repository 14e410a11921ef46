//! Handlers for the recommendations vertical.

use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::schemas::recommendations::{
    CulturalRequest, CulturalResponse, PersonalizedRequest, PersonalizedResponse, TrendingQuery,
    TrendingResponse,
};
use crate::web::middleware::MaybeUser;
use crate::web::state::AppState;

/// Personalized recommendations; stored preferences bias the result when
/// the caller is authenticated.
#[utoipa::path(
    post,
    path = "/api/v1/recommendations/personalized",
    request_body = PersonalizedRequest,
    responses(
        (status = 200, description = "Recommendations ready", body = PersonalizedResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "recommendations"
)]
pub async fn personalized(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<PersonalizedRequest>,
) -> Result<Json<PersonalizedResponse>, ApiError> {
    request.validate()?;
    let response = state
        .recommendations
        .personalized(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}

/// Recommendations built around explicit cultural interests.
#[utoipa::path(
    post,
    path = "/api/v1/recommendations/cultural",
    request_body = CulturalRequest,
    responses(
        (status = 200, description = "Recommendations ready", body = CulturalResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "recommendations"
)]
pub async fn cultural(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<CulturalRequest>,
) -> Result<Json<CulturalResponse>, ApiError> {
    request.validate()?;
    let response = state
        .recommendations
        .cultural(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}

/// Currently trending cultural entities.
#[utoipa::path(
    get,
    path = "/api/v1/recommendations/trending",
    params(
        ("category" = Option<String>, Query, description = "Restrict to one category")
    ),
    responses(
        (status = 200, description = "Trending entities", body = TrendingResponse),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "recommendations"
)]
pub async fn trending(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let response = state
        .recommendations
        .trending(query.category.as_deref(), user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}
