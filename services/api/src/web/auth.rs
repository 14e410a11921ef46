//! services/api/src/web/auth.rs
//!
//! The auth surface: profile, preference updates, token verification, and
//! the auth provider's webhook. The backend never issues tokens itself;
//! verification is delegated to the provider and the local user table is
//! only a mirror.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Json,
    Extension,
};
use culturo_core::domain::{ArtifactKind, AuthClaims};
use culturo_core::ports::PortError;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::schemas::auth::{
    ArtifactHistoryQuery, ArtifactHistoryResponse, ArtifactView, PreferencesResponse,
    PreferencesUpdateRequest, ProfileResponse, VerifyTokenRequest, VerifyTokenResponse,
    WebhookEvent,
};
use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;

/// The caller's mirrored profile plus stored preferences.
#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let preferences = state.db.get_preferences(user.id).await?;
    Ok(Json(ProfileResponse {
        user_id: user.id,
        subject: user.subject,
        email: user.email,
        display_name: user.display_name,
        created_at: user.created_at,
        preferences: preferences.domains,
    }))
}

/// Replace the caller's preference set. Last write wins.
#[utoipa::path(
    put,
    path = "/api/v1/auth/preferences",
    request_body = PreferencesUpdateRequest,
    responses(
        (status = 200, description = "Preferences stored", body = PreferencesResponse),
        (status = 400, description = "Invalid request field"),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<PreferencesUpdateRequest>,
) -> Result<Json<PreferencesResponse>, ApiError> {
    request.validate()?;
    let stored = state.db.update_preferences(user.id, request.domains).await?;
    Ok(Json(PreferencesResponse {
        user_id: stored.user_id,
        domains: stored.domains,
        updated_at: stored.updated_at,
    }))
}

/// The caller's saved artifacts (stories, analyses, itineraries), newest
/// first.
#[utoipa::path(
    get,
    path = "/api/v1/auth/artifacts",
    params(
        ("kind" = Option<String>, Query, description = "Restrict to one artifact kind"),
        ("limit" = Option<i64>, Query, description = "Maximum rows returned (1-50, default 20)")
    ),
    responses(
        (status = 200, description = "Saved artifacts", body = ArtifactHistoryResponse),
        (status = 400, description = "Unknown artifact kind"),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn artifacts(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ArtifactHistoryQuery>,
) -> Result<Json<ArtifactHistoryResponse>, ApiError> {
    let kind = match query.kind.as_deref() {
        Some(raw) => Some(
            ArtifactKind::parse(raw)
                .ok_or_else(|| ApiError::validation("kind", "unknown artifact kind"))?,
        ),
        None => None,
    };
    let limit = query.limit.unwrap_or(20).clamp(1, 50);

    let entries = state.db.list_artifacts(user.id, kind, limit).await?;
    Ok(Json(ArtifactHistoryResponse {
        artifacts: entries
            .into_iter()
            .map(|entry| ArtifactView {
                artifact_id: entry.id,
                kind: entry.kind.as_str().to_string(),
                payload: entry.payload,
                created_at: entry.created_at,
            })
            .collect(),
    }))
}

/// Check a token against the auth provider. An invalid token is a normal
/// `valid: false` answer, not an error; only provider outages fail.
#[utoipa::path(
    post,
    path = "/api/v1/auth/verify",
    request_body = VerifyTokenRequest,
    responses(
        (status = 200, description = "Verification result", body = VerifyTokenResponse),
        (status = 400, description = "Invalid request field"),
        (status = 502, description = "Auth provider unavailable")
    ),
    tag = "auth"
)]
pub async fn verify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyTokenRequest>,
) -> Result<Json<VerifyTokenResponse>, ApiError> {
    request.validate()?;
    match state.auth.verify_token(&request.token).await {
        Ok(claims) => Ok(Json(VerifyTokenResponse {
            valid: true,
            subject: Some(claims.subject),
            email: claims.email,
        })),
        Err(PortError::Unauthorized) => Ok(Json(VerifyTokenResponse {
            valid: false,
            subject: None,
            email: None,
        })),
        Err(other) => Err(other.into()),
    }
}

/// Async user lifecycle events pushed by the auth provider. The body is
/// authenticated with an HMAC signature before anything is parsed out of it.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, ApiError> {
    let secret = state
        .config
        .clerk_webhook_secret
        .as_deref()
        .ok_or_else(|| ApiError::Internal("webhook secret is not configured".to_string()))?;

    let id = header_str(&headers, "svix-id")?;
    let timestamp = header_str(&headers, "svix-timestamp")?;
    let signature = header_str(&headers, "svix-signature")?;
    if !signature_matches(secret, id, timestamp, &body, signature) {
        return Err(ApiError::Auth("invalid webhook signature".to_string()));
    }

    let event: WebhookEvent = serde_json::from_str(&body)
        .map_err(|e| ApiError::validation("body", format!("malformed webhook payload: {}", e)))?;

    match event.event_type.as_str() {
        "user.created" | "user.updated" => {
            if let Some(claims) = claims_from_event(&event.data) {
                state.db.upsert_user(&claims).await?;
            }
        }
        // User rows are a mirror and never hard-deleted; a deletion event
        // is only recorded in the logs.
        other => info!(event_type = other, "ignoring webhook event"),
    }

    Ok(Json(json!({ "received": true })))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, ApiError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Auth(format!("missing {} header", name)))
}

/// Checks `v1=<hex>` entries in the signature header against an
/// HMAC-SHA256 over `{id}.{timestamp}.{body}`.
fn signature_matches(secret: &str, id: &str, timestamp: &str, body: &str, header: &str) -> bool {
    let Ok(mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    let mut mac = mac;
    mac.update(format!("{}.{}.{}", id, timestamp, body).as_bytes());

    header
        .split_whitespace()
        .filter_map(|part| part.strip_prefix("v1="))
        .any(|candidate| match hex::decode(candidate) {
            Ok(sig) => mac.clone().verify_slice(&sig).is_ok(),
            Err(_) => false,
        })
}

fn claims_from_event(data: &Value) -> Option<AuthClaims> {
    let subject = data.get("id")?.as_str()?.to_string();
    let email = data
        .get("email_addresses")
        .and_then(|addrs| addrs.get(0))
        .and_then(|addr| addr.get("email_address"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let display_name = match (
        data.get("first_name").and_then(Value::as_str),
        data.get("last_name").and_then(Value::as_str),
    ) {
        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
        (Some(first), None) => Some(first.to_string()),
        (None, Some(last)) => Some(last.to_string()),
        (None, None) => None,
    };
    Some(AuthClaims {
        subject,
        email,
        display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, id: &str, timestamp: &str, body: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}.{}", id, timestamp, body).as_bytes());
        format!("v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn valid_signature_is_accepted() {
        let header = sign("whsec_test", "msg_1", "1700000000", r#"{"type":"user.created"}"#);
        assert!(signature_matches(
            "whsec_test",
            "msg_1",
            "1700000000",
            r#"{"type":"user.created"}"#,
            &header
        ));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let header = sign("whsec_test", "msg_1", "1700000000", r#"{"type":"user.created"}"#);
        assert!(!signature_matches(
            "whsec_test",
            "msg_1",
            "1700000000",
            r#"{"type":"user.deleted"}"#,
            &header
        ));
    }

    #[test]
    fn any_listed_signature_may_match() {
        let good = sign("whsec_test", "msg_1", "1700000000", "{}");
        let header = format!("v1=deadbeef {}", good);
        assert!(signature_matches("whsec_test", "msg_1", "1700000000", "{}", &header));
    }

    #[test]
    fn claims_extract_email_and_name() {
        let data = json!({
            "id": "user_2abc",
            "email_addresses": [{"email_address": "ada@example.com"}],
            "first_name": "Ada",
            "last_name": "Lovelace"
        });
        let claims = claims_from_event(&data).unwrap();
        assert_eq!(claims.subject, "user_2abc");
        assert_eq!(claims.email.as_deref(), Some("ada@example.com"));
        assert_eq!(claims.display_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn claims_require_a_subject() {
        assert!(claims_from_event(&json!({"email_addresses": []})).is_none());
    }
}
