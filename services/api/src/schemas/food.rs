//! Wire types for the food vertical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::require_text;
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FoodAnalysisRequest {
    #[serde(default)]
    pub food_name: String,
    pub cuisine_type: Option<String>,
    #[serde(default = "default_true")]
    pub include_nutrition: bool,
    #[serde(default = "default_true")]
    pub include_cultural_context: bool,
    #[serde(default = "default_true")]
    pub include_recommendations: bool,
}

impl FoodAnalysisRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("food_name", &self.food_name, 1, 100)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CulturalFoodContext {
    pub origin_country: String,
    pub origin_region: Option<String>,
    pub historical_significance: Option<String>,
    #[serde(default)]
    pub traditional_occasions: Vec<String>,
    #[serde(default)]
    pub preparation_methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodRecommendation {
    pub food_name: String,
    pub reason: String,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodAnalysisResponse {
    pub analysis_id: Uuid,
    pub food_name: String,
    pub confidence_score: f64,
    pub category: String,
    pub cuisine_type: String,
    pub nutrition: Option<NutritionInfo>,
    pub cultural_context: Option<CulturalFoodContext>,
    pub ingredients: Vec<String>,
    pub health_benefits: Vec<String>,
    pub allergens: Vec<String>,
    pub recommendations: Vec<FoodRecommendation>,
    pub analysis_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FoodRecommendationRequest {
    #[serde(default)]
    pub preferences: String,
    pub cuisine_preference: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default = "default_skill_level")]
    pub skill_level: String,
}

impl FoodRecommendationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("preferences", &self.preferences, 10, 1000)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FoodRecommendationResponse {
    pub recommendations: Vec<FoodRecommendation>,
    pub cultural_insights: Vec<String>,
    pub cooking_tips: Vec<String>,
    pub recommendation_date: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

fn default_skill_level() -> String {
    "beginner".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_food_name_is_rejected_by_name() {
        let req: FoodAnalysisRequest = serde_json::from_str("{}").unwrap();
        match req.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "food_name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn pizza_request_is_valid() {
        let req: FoodAnalysisRequest =
            serde_json::from_str(r#"{"food_name": "pizza", "include_nutrition": true}"#).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.include_nutrition);
    }
}
