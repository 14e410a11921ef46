//! Wire types for the travel vertical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::require_text;
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TravelPlanRequest {
    #[serde(default)]
    pub destination: String,
    pub travel_style: Option<String>,
    pub duration: Option<String>,
    pub budget_level: Option<String>,
    #[serde(default = "default_group_size")]
    pub group_size: u32,
    #[serde(default)]
    pub cultural_interests: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl TravelPlanRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("destination", &self.destination, 2, 100)?;
        if self.group_size < 1 || self.group_size > 20 {
            return Err(ApiError::validation(
                "group_size",
                "must be between 1 and 20",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayPlan {
    pub day: u32,
    pub activity: String,
    pub cultural_context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceHighlight {
    pub name: String,
    pub category: String,
    pub affinity: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherOutlook {
    pub summary: String,
    pub high_celsius: f64,
    pub low_celsius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TravelPlanResponse {
    pub itinerary_id: Uuid,
    pub destination: String,
    pub duration: String,
    pub travel_style: String,
    pub budget_estimate: String,
    pub cultural_insights: String,
    pub itinerary: Vec<DayPlan>,
    pub places: Vec<PlaceHighlight>,
    pub weather: Option<WeatherOutlook>,
    pub narrative_summary: String,
    pub cultural_etiquette: Vec<String>,
    pub planning_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DestinationRequest {
    #[serde(default)]
    pub interests: Vec<String>,
    pub travel_style: Option<String>,
    pub budget_level: Option<String>,
    #[serde(default = "default_duration_range")]
    pub duration_range: String,
}

impl DestinationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.interests.iter().any(|tag| tag.trim().is_empty()) {
            return Err(ApiError::validation(
                "interests",
                "tags must not be empty strings",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DestinationRecommendation {
    pub destination: String,
    pub country: String,
    pub match_score: f64,
    pub reasons: Vec<String>,
    pub best_time_to_visit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DestinationResponse {
    pub recommendations: Vec<DestinationRecommendation>,
    pub insights: Vec<String>,
    pub recommendation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CulturalInsightsRequest {
    #[serde(default)]
    pub destination: String,
}

impl CulturalInsightsRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("destination", &self.destination, 2, 100)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CulturalInsight {
    pub aspect: String,
    pub description: String,
    #[serde(default)]
    pub practical_tips: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CulturalInsightsResponse {
    pub destination: String,
    pub insights: Vec<CulturalInsight>,
    pub etiquette: Vec<String>,
    pub response_date: DateTime<Utc>,
}

fn default_group_size() -> u32 {
    1
}

fn default_duration_range() -> String {
    "1-2 weeks".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_destination_is_rejected_by_name() {
        let req: TravelPlanRequest = serde_json::from_str("{}").unwrap();
        match req.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "destination"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn group_size_bounds() {
        let req: TravelPlanRequest =
            serde_json::from_str(r#"{"destination": "Kyoto", "group_size": 40}"#).unwrap();
        match req.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "group_size"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn optional_fields_take_defaults() {
        let req: TravelPlanRequest =
            serde_json::from_str(r#"{"destination": "Lisbon"}"#).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.group_size, 1);
        assert!(req.cultural_interests.is_empty());
    }
}
