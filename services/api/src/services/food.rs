//! The food vertical: cultural food analysis and recommendations.

use chrono::Utc;
use culturo_core::domain::{AnalyticsEvent, ArtifactKind, LlmRequest, NewArtifact};
use culturo_core::ports::{DatabaseService, LanguageModelService, TasteGraphService};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::spawn_post_commit;
use crate::error::ApiError;
use crate::schemas::food::{
    CulturalFoodContext, FoodAnalysisRequest, FoodAnalysisResponse, FoodRecommendation,
    FoodRecommendationRequest, FoodRecommendationResponse, NutritionInfo,
};

const FOOD_SYSTEM: &str = "You are a culinary and cultural analyst. \
Respond with a single JSON object and nothing else.";

#[derive(Deserialize)]
struct FoodPayload {
    #[serde(default = "default_confidence")]
    confidence_score: f64,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_category")]
    cuisine_type: String,
    nutrition: Option<NutritionInfo>,
    cultural_context: Option<CulturalFoodContext>,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    health_benefits: Vec<String>,
    #[serde(default)]
    allergens: Vec<String>,
}

#[derive(Deserialize)]
struct FoodRecsPayload {
    #[serde(default)]
    recommendations: Vec<FoodRecommendation>,
    #[serde(default)]
    cultural_insights: Vec<String>,
    #[serde(default)]
    cooking_tips: Vec<String>,
}

fn default_confidence() -> f64 {
    0.8
}

fn default_category() -> String {
    "unknown".to_string()
}

pub struct FoodService {
    db: Arc<dyn DatabaseService>,
    taste: Arc<dyn TasteGraphService>,
    llm: Arc<dyn LanguageModelService>,
}

impl FoodService {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        taste: Arc<dyn TasteGraphService>,
        llm: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self { db, taste, llm }
    }

    pub async fn analyze_food(
        &self,
        request: &FoodAnalysisRequest,
        user_id: Option<Uuid>,
    ) -> Result<FoodAnalysisResponse, ApiError> {
        let prompt = format!(
            "Analyze the dish \"{name}\"{cuisine}. Include nutrition: {nutrition}. \
             Include cultural context: {cultural}.\n\
             Return JSON with keys: confidence_score (0-1), category, cuisine_type, \
             nutrition ({{calories, protein, carbohydrates, fat, fiber, sugar, sodium}} \
             as numbers, or null), cultural_context ({{origin_country, origin_region, \
             historical_significance, traditional_occasions, preparation_methods}}, or null), \
             ingredients (array of strings), health_benefits (array), allergens (array).",
            name = request.food_name,
            cuisine = request
                .cuisine_type
                .as_deref()
                .map(|c| format!(" ({} cuisine)", c))
                .unwrap_or_default(),
            nutrition = request.include_nutrition,
            cultural = request.include_cultural_context,
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(FOOD_SYSTEM))
            .await?;
        let payload: FoodPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("food payload malformed: {}", e)))?;

        // Related dishes come from the taste graph, not the LLM.
        let recommendations = if request.include_recommendations {
            let insights = self.taste.taste_insights(&request.food_name).await?;
            insights
                .entities
                .into_iter()
                .map(|entity| FoodRecommendation {
                    food_name: entity.name,
                    reason: entity
                        .description
                        .unwrap_or_else(|| "shares a cultural affinity".to_string()),
                    similarity_score: entity.affinity,
                })
                .collect()
        } else {
            Vec::new()
        };

        let response = FoodAnalysisResponse {
            analysis_id: Uuid::new_v4(),
            food_name: request.food_name.clone(),
            confidence_score: payload.confidence_score,
            category: payload.category,
            cuisine_type: payload.cuisine_type,
            nutrition: if request.include_nutrition {
                payload.nutrition
            } else {
                None
            },
            cultural_context: if request.include_cultural_context {
                payload.cultural_context
            } else {
                None
            },
            ingredients: payload.ingredients,
            health_benefits: payload.health_benefits,
            allergens: payload.allergens,
            recommendations,
            analysis_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            Some(NewArtifact {
                kind: ArtifactKind::FoodAnalysis,
                user_id,
                payload: serde_json::to_value(&response).unwrap_or_default(),
            }),
            AnalyticsEvent::feature(
                "food_analyze",
                user_id,
                Some(json!({ "food_name": request.food_name })),
            ),
        );

        Ok(response)
    }

    pub async fn food_recommendations(
        &self,
        request: &FoodRecommendationRequest,
        user_id: Option<Uuid>,
    ) -> Result<FoodRecommendationResponse, ApiError> {
        let insights = self.taste.taste_insights(&request.preferences).await?;

        let prompt = format!(
            "Recommend dishes for someone who says: \"{prefs}\". \
             Cuisine preference: {cuisine}. Dietary restrictions: {diet}. \
             Cooking skill: {skill}. Culturally related topics: {related}.\n\
             Return JSON with keys: recommendations (array of \
             {{food_name, reason, similarity_score}}), cultural_insights (array of strings), \
             cooking_tips (array of strings).",
            prefs = request.preferences,
            cuisine = request.cuisine_preference.as_deref().unwrap_or("any"),
            diet = if request.dietary_restrictions.is_empty() {
                "none".to_string()
            } else {
                request.dietary_restrictions.join(", ")
            },
            skill = request.skill_level,
            related = insights.related_topics.join(", "),
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(FOOD_SYSTEM))
            .await?;
        let payload: FoodRecsPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("recommendation payload malformed: {}", e)))?;

        let response = FoodRecommendationResponse {
            recommendations: payload.recommendations,
            cultural_insights: payload.cultural_insights,
            cooking_tips: payload.cooking_tips,
            recommendation_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            None,
            AnalyticsEvent::feature("food_recommendations", user_id, None),
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{MockDb, MockLlm, MockTaste};

    fn analysis_value() -> serde_json::Value {
        json!({
            "confidence_score": 0.93,
            "category": "main_dish",
            "cuisine_type": "italian",
            "nutrition": {"calories": 285.0, "protein": 12.0, "carbohydrates": 36.0, "fat": 10.0,
                          "fiber": 2.5, "sugar": 3.6, "sodium": 640.0},
            "cultural_context": {
                "origin_country": "Italy",
                "origin_region": "Naples",
                "historical_significance": "Working-class staple since the 18th century",
                "traditional_occasions": ["family dinners"],
                "preparation_methods": ["wood-fired oven"]
            },
            "ingredients": ["dough", "tomato", "mozzarella"],
            "health_benefits": ["lycopene from tomatoes"],
            "allergens": ["gluten", "dairy"]
        })
    }

    #[tokio::test]
    async fn pizza_analysis_carries_nutrition_and_origin() {
        let service = FoodService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(analysis_value())),
        );
        let request: FoodAnalysisRequest =
            serde_json::from_str(r#"{"food_name": "pizza", "include_nutrition": true}"#).unwrap();

        let response = service.analyze_food(&request, None).await.unwrap();
        assert_eq!(response.food_name, "pizza");
        let nutrition = response.nutrition.expect("nutrition requested");
        assert!(nutrition.calories > 0.0);
        let context = response.cultural_context.expect("cultural context requested");
        assert!(!context.origin_country.is_empty());
        assert!(!response.recommendations.is_empty());
    }

    #[tokio::test]
    async fn nutrition_is_withheld_when_not_requested() {
        let service = FoodService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(analysis_value())),
        );
        let request: FoodAnalysisRequest =
            serde_json::from_str(r#"{"food_name": "pizza", "include_nutrition": false}"#).unwrap();

        let response = service.analyze_food(&request, None).await.unwrap();
        assert!(response.nutrition.is_none());
    }

    #[tokio::test]
    async fn llm_outage_surfaces_as_upstream() {
        let service = FoodService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::failing()),
        );
        let request: FoodAnalysisRequest =
            serde_json::from_str(r#"{"food_name": "pizza"}"#).unwrap();

        let err = service.analyze_food(&request, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
