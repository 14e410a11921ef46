//! Wire types for the recommendations vertical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::require_text;
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PersonalizedRequest {
    #[serde(default)]
    pub preferences: String,
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl PersonalizedRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("preferences", &self.preferences, 10, 2000)?;
        validate_limit(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationItem {
    pub name: String,
    pub category: String,
    pub rating: f64,
    pub description: String,
    pub cultural_context: String,
    pub personalization_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonalizedResponse {
    pub set_id: Uuid,
    pub items: Vec<RecommendationItem>,
    pub cultural_insights: Vec<String>,
    pub reasoning: Vec<String>,
    pub recommendation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CulturalRequest {
    #[serde(default)]
    pub cultural_interests: Vec<String>,
    #[serde(default)]
    pub preferred_cultures: Vec<String>,
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl CulturalRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_limit(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CulturalResponse {
    pub recommendations: Vec<RecommendationItem>,
    pub cultural_connections: Vec<String>,
    pub recommendation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TrendingQuery {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendingItem {
    pub name: String,
    pub category: String,
    pub trend_score: f64,
    pub momentum: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendingResponse {
    pub category: String,
    pub items: Vec<TrendingItem>,
    pub insights: Vec<String>,
    pub response_date: DateTime<Utc>,
}

fn default_limit() -> u32 {
    10
}

fn validate_limit(limit: u32) -> Result<(), ApiError> {
    if limit < 1 || limit > 50 {
        return Err(ApiError::validation("limit", "must be between 1 and 50"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_preferences_is_rejected_by_name() {
        let req: PersonalizedRequest = serde_json::from_str("{}").unwrap();
        match req.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "preferences"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn limit_bounds() {
        let req: PersonalizedRequest = serde_json::from_str(
            r#"{"preferences": "jazz, noir fiction, street food", "limit": 99}"#,
        )
        .unwrap();
        match req.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "limit"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
