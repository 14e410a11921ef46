//! Wire types for the auth surface: profile, token verification, preference
//! updates, and the auth provider's webhook payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use super::require_text;
use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub preferences: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyTokenRequest {
    #[serde(default)]
    pub token: String,
}

impl VerifyTokenRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("token", &self.token, 1, 4096)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub subject: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PreferencesUpdateRequest {
    #[serde(default)]
    pub domains: HashMap<String, Vec<String>>,
}

impl PreferencesUpdateRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.domains.is_empty() {
            return Err(ApiError::validation("domains", "field is required"));
        }
        if self.domains.keys().any(|domain| domain.trim().is_empty()) {
            return Err(ApiError::validation(
                "domains",
                "domain names must not be empty",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PreferencesResponse {
    pub user_id: Uuid,
    pub domains: HashMap<String, Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ArtifactHistoryQuery {
    pub kind: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtifactView {
    pub artifact_id: Uuid,
    pub kind: String,
    #[schema(value_type = Object)]
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ArtifactHistoryResponse {
    pub artifacts: Vec<ArtifactView>,
}

/// The async event envelope posted by the auth provider.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Value,
}
