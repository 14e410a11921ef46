//! Handlers for the analytics vertical.

use axum::{extract::State, http::StatusCode, response::Json, Extension};
use std::sync::Arc;

use crate::error::ApiError;
use crate::schemas::analytics::{AnalyticsSummaryResponse, TrackEventRequest, TrackEventResponse};
use crate::web::middleware::MaybeUser;
use crate::web::state::AppState;

/// Accept a client-side analytics event. The write is fire-and-forget.
#[utoipa::path(
    post,
    path = "/api/v1/analytics/events",
    request_body = TrackEventRequest,
    responses(
        (status = 202, description = "Event accepted", body = TrackEventResponse),
        (status = 400, description = "Invalid request field")
    ),
    tag = "analytics"
)]
pub async fn track_event(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<TrackEventRequest>,
) -> Result<(StatusCode, Json<TrackEventResponse>), ApiError> {
    request.validate()?;
    let response = state.analytics.track_event(request, user.as_ref());
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Usage summary. Anonymous callers receive the fixed demo payload.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/summary",
    responses(
        (status = 200, description = "Usage summary", body = AnalyticsSummaryResponse)
    ),
    tag = "analytics"
)]
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
) -> Result<Json<AnalyticsSummaryResponse>, ApiError> {
    let response = match &user {
        Some(user) => state.analytics.user_summary(user).await?,
        None => state.analytics.demo_summary(),
    };
    Ok(Json(response))
}
