//! services/api/src/web/middleware.rs
//!
//! Authentication middleware. Token verification is delegated to the auth
//! provider; on success the mirrored user row is refreshed and attached to
//! the request extensions.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use culturo_core::domain::User;
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;

/// The authenticated caller, present on protected routes.
#[derive(Clone)]
pub struct CurrentUser(pub User);

/// The caller on routes that serve anonymous traffic too. Always present
/// behind `optional_auth`; `None` means no credentials were offered.
#[derive(Clone)]
pub struct MaybeUser(pub Option<User>);

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn resolve_user(state: &AppState, token: &str) -> Result<User, ApiError> {
    let claims = state.auth.verify_token(token).await?;
    Ok(state.db.upsert_user(&claims).await?)
}

/// Rejects the request with 401 unless a valid bearer token is presented.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Auth("missing bearer token".to_string()))?;
    let user = resolve_user(&state, &token).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Attaches the caller when credentials are offered, and lets anonymous
/// requests through. A token that is present but invalid is still a 401;
/// only the absence of credentials means anonymous.
pub async fn optional_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match bearer_token(&req).map(str::to_owned) {
        Some(token) => Some(resolve_user(&state, &token).await?),
        None => None,
    };
    req.extensions_mut().insert(MaybeUser(user));
    Ok(next.run(req).await)
}
