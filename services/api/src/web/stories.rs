//! Handlers for the stories vertical.

use axum::{extract::State, response::Json, Extension};
use std::sync::Arc;

use crate::error::ApiError;
use crate::schemas::stories::{
    StoryAnalysisRequest, StoryAnalysisResponse, StoryGenerationRequest, StoryGenerationResponse,
    StoryPromptResponse,
};
use crate::web::middleware::MaybeUser;
use crate::web::state::AppState;

/// Generate a culturally-aware story outline.
#[utoipa::path(
    post,
    path = "/api/v1/stories/generate",
    request_body = StoryGenerationRequest,
    responses(
        (status = 200, description = "Story generated", body = StoryGenerationResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "stories"
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<StoryGenerationRequest>,
) -> Result<Json<StoryGenerationResponse>, ApiError> {
    request.validate()?;
    let response = state
        .stories
        .generate_story(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}

/// Score a story premise on plot, character, originality, and cultural
/// relevance.
#[utoipa::path(
    post,
    path = "/api/v1/stories/analyze",
    request_body = StoryAnalysisRequest,
    responses(
        (status = 200, description = "Analysis complete", body = StoryAnalysisResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Upstream service failure")
    ),
    tag = "stories"
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(request): Json<StoryAnalysisRequest>,
) -> Result<Json<StoryAnalysisResponse>, ApiError> {
    request.validate()?;
    let response = state
        .stories
        .analyze_story(&request, user.map(|u| u.id))
        .await?;
    Ok(Json(response))
}

/// Pick a random story prompt from the curated pool.
#[utoipa::path(
    post,
    path = "/api/v1/stories/surprise",
    responses(
        (status = 200, description = "A prompt from the pool", body = StoryPromptResponse)
    ),
    tag = "stories"
)]
pub async fn surprise(State(state): State<Arc<AppState>>) -> Json<StoryPromptResponse> {
    Json(state.stories.random_prompt())
}
