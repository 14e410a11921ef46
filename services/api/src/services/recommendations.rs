//! The recommendations vertical: personalized, cultural, and trending.

use chrono::Utc;
use culturo_core::domain::{AnalyticsEvent, ArtifactKind, LlmRequest, NewArtifact};
use culturo_core::ports::{DatabaseService, LanguageModelService, TasteGraphService};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::spawn_post_commit;
use crate::error::ApiError;
use crate::schemas::recommendations::{
    CulturalRequest, CulturalResponse, PersonalizedRequest, PersonalizedResponse,
    RecommendationItem, TrendingItem, TrendingResponse,
};

const RECS_SYSTEM: &str = "You are a cultural recommendation engine. \
Respond with a single JSON object and nothing else.";

#[derive(Deserialize)]
struct PersonalizedPayload {
    #[serde(default)]
    items: Vec<RecommendationItem>,
    #[serde(default)]
    cultural_insights: Vec<String>,
    #[serde(default)]
    reasoning: Vec<String>,
}

#[derive(Deserialize)]
struct CulturalPayload {
    #[serde(default)]
    recommendations: Vec<RecommendationItem>,
    #[serde(default)]
    cultural_connections: Vec<String>,
}

pub struct RecommendationService {
    db: Arc<dyn DatabaseService>,
    taste: Arc<dyn TasteGraphService>,
    llm: Arc<dyn LanguageModelService>,
}

impl RecommendationService {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        taste: Arc<dyn TasteGraphService>,
        llm: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self { db, taste, llm }
    }

    /// Personalized recommendations. When the caller is authenticated, the
    /// stored preference set biases the prompt alongside the free-text
    /// preferences in the request.
    pub async fn personalized(
        &self,
        request: &PersonalizedRequest,
        user_id: Option<Uuid>,
    ) -> Result<PersonalizedResponse, ApiError> {
        let stored_note = match user_id {
            Some(id) => {
                let stored = self.db.get_preferences(id).await?;
                if stored.domains.is_empty() {
                    String::new()
                } else {
                    let lines = stored
                        .domains
                        .iter()
                        .map(|(domain, values)| format!("{}: {}", domain, values.join(", ")))
                        .collect::<Vec<_>>()
                        .join("; ");
                    format!("Saved preferences on file: {}.", lines)
                }
            }
            None => String::new(),
        };

        let insights = self.taste.taste_insights(&request.preferences).await?;

        let prompt = format!(
            "Recommend up to {limit} cultural experiences for someone who says: \
             \"{prefs}\".{category} {stored}\n\
             Culturally related signals (affinity {affinity:.2}): {related}.\n\
             Return JSON with keys: items (array of {{name, category, rating, description, \
             cultural_context, personalization_score}}), cultural_insights (array of strings), \
             reasoning (array of strings).",
            limit = request.limit,
            prefs = request.preferences,
            category = request
                .category
                .as_deref()
                .map(|c| format!(" Focus on the {} category.", c))
                .unwrap_or_default(),
            stored = stored_note,
            affinity = insights.affinity_score,
            related = insights.related_topics.join(", "),
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(RECS_SYSTEM))
            .await?;
        let payload: PersonalizedPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("recommendation payload malformed: {}", e)))?;

        let mut items = payload.items;
        items.truncate(request.limit as usize);

        let response = PersonalizedResponse {
            set_id: Uuid::new_v4(),
            items,
            cultural_insights: payload.cultural_insights,
            reasoning: payload.reasoning,
            recommendation_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            Some(NewArtifact {
                kind: ArtifactKind::RecommendationSet,
                user_id,
                payload: serde_json::to_value(&response).unwrap_or_default(),
            }),
            AnalyticsEvent::feature(
                "recommendations_personalized",
                user_id,
                Some(json!({ "set_id": response.set_id })),
            ),
        );

        Ok(response)
    }

    pub async fn cultural(
        &self,
        request: &CulturalRequest,
        user_id: Option<Uuid>,
    ) -> Result<CulturalResponse, ApiError> {
        let topic = if request.cultural_interests.is_empty() {
            "global culture".to_string()
        } else {
            request.cultural_interests.join(", ")
        };
        let insights = self.taste.taste_insights(&topic).await?;

        let prompt = format!(
            "Recommend up to {limit} culturally significant experiences around: {topic}.\n\
             Preferred cultures: {cultures}.{category}\n\
             Related signals: {related}.\n\
             Return JSON with keys: recommendations (array of {{name, category, rating, \
             description, cultural_context, personalization_score}}), \
             cultural_connections (array of strings).",
            limit = request.limit,
            topic = topic,
            cultures = if request.preferred_cultures.is_empty() {
                "any".to_string()
            } else {
                request.preferred_cultures.join(", ")
            },
            category = request
                .category
                .as_deref()
                .map(|c| format!(" Focus on the {} category.", c))
                .unwrap_or_default(),
            related = insights.related_topics.join(", "),
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(RECS_SYSTEM))
            .await?;
        let payload: CulturalPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("cultural payload malformed: {}", e)))?;

        let mut recommendations = payload.recommendations;
        recommendations.truncate(request.limit as usize);

        let response = CulturalResponse {
            recommendations,
            cultural_connections: payload.cultural_connections,
            recommendation_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            None,
            AnalyticsEvent::feature("recommendations_cultural", user_id, None),
        );

        Ok(response)
    }

    /// Trending entities come straight from the taste graph; the LLM is not
    /// involved here.
    pub async fn trending(
        &self,
        category: Option<&str>,
        user_id: Option<Uuid>,
    ) -> Result<TrendingResponse, ApiError> {
        let category = category.unwrap_or("all").to_string();
        let entities = self.taste.trending(&category).await?;

        let insights = entities
            .iter()
            .filter(|e| e.momentum == "rising")
            .map(|e| format!("{} is gaining momentum in {}", e.name, e.category))
            .collect();

        let response = TrendingResponse {
            category,
            items: entities
                .into_iter()
                .map(|entity| TrendingItem {
                    name: entity.name,
                    category: entity.category,
                    trend_score: entity.trend_score,
                    momentum: entity.momentum,
                })
                .collect(),
            insights,
            response_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            None,
            AnalyticsEvent::feature("recommendations_trending", user_id, None),
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{MockDb, MockLlm, MockTaste};
    use std::collections::HashMap;

    fn personalized_value() -> serde_json::Value {
        json!({
            "items": [
                {"name": "Fela Kuti discography", "category": "music", "rating": 4.8,
                 "description": "Afrobeat's founding catalogue",
                 "cultural_context": "1970s Lagos", "personalization_score": 0.92},
                {"name": "Nollywood retrospective", "category": "film", "rating": 4.2,
                 "description": "A survey of Nigerian cinema",
                 "cultural_context": "Contemporary Lagos", "personalization_score": 0.81}
            ],
            "cultural_insights": ["West African music shaped global funk"],
            "reasoning": ["Matched on rhythm-forward listening habits"]
        })
    }

    #[tokio::test]
    async fn limit_caps_the_item_list() {
        let service = RecommendationService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(personalized_value())),
        );
        let request: PersonalizedRequest = serde_json::from_str(
            r#"{"preferences": "afrobeat and west african film", "limit": 1}"#,
        )
        .unwrap();

        let response = service.personalized(&request, None).await.unwrap();
        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn stored_preferences_are_read_for_authenticated_callers() {
        let mut preferences = HashMap::new();
        preferences.insert("music".to_string(), vec!["jazz".to_string()]);
        let service = RecommendationService::new(
            Arc::new(MockDb { preferences }),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(personalized_value())),
        );
        let request: PersonalizedRequest =
            serde_json::from_str(r#"{"preferences": "afrobeat and west african film"}"#).unwrap();

        let response = service
            .personalized(&request, Some(Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(response.items.len(), 2);
    }

    #[tokio::test]
    async fn trending_defaults_to_all_categories() {
        let service = RecommendationService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(json!({}))),
        );

        let response = service.trending(None, None).await.unwrap();
        assert_eq!(response.category, "all");
        assert_eq!(response.items.len(), 1);
        assert!(!response.insights.is_empty());
    }

    #[tokio::test]
    async fn taste_outage_surfaces_as_upstream() {
        let service = RecommendationService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::failing()),
            Arc::new(MockLlm::json(json!({}))),
        );

        let err = service.trending(Some("music"), None).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
