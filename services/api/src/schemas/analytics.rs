//! Wire types for the analytics vertical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::require_text;
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TrackEventRequest {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub event_name: String,
    #[schema(value_type = Object)]
    pub event_data: Option<Value>,
}

impl TrackEventRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("event_type", &self.event_type, 1, 100)?;
        require_text("event_name", &self.event_name, 1, 200)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackEventResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileSummary {
    pub total_sessions: i64,
    pub total_requests: i64,
    pub engagement_score: f64,
    pub last_active: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureUsage {
    pub feature_name: String,
    pub usage_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsSummaryResponse {
    pub user_id: Option<String>,
    /// True when the payload is the fixed demo-mode response served to
    /// anonymous callers.
    pub demo: bool,
    pub user_profile: UserProfileSummary,
    pub feature_usage: Vec<FeatureUsage>,
    pub response_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_and_name_are_required() {
        let req: TrackEventRequest =
            serde_json::from_str(r#"{"event_name": "story_generate"}"#).unwrap();
        match req.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "event_type"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
