//! The travel vertical: culturally-aware itinerary planning, destination
//! recommendations, and cultural insights.

use chrono::Utc;
use culturo_core::domain::{
    AnalyticsEvent, ArtifactKind, LlmRequest, NewArtifact, TasteEntity, WeatherSummary,
};
use culturo_core::ports::{
    DatabaseService, LanguageModelService, PortError, TasteGraphService, WeatherService,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::spawn_post_commit;
use crate::error::ApiError;
use crate::schemas::travel::{
    CulturalInsight, CulturalInsightsRequest, CulturalInsightsResponse, DayPlan,
    DestinationRecommendation, DestinationRequest, DestinationResponse, PlaceHighlight,
    TravelPlanRequest, TravelPlanResponse, WeatherOutlook,
};

const TRAVEL_SYSTEM: &str = "You are a culturally intelligent travel planner. \
Respond with a single JSON object and nothing else.";

#[derive(Deserialize)]
struct PlanPayload {
    #[serde(default)]
    itinerary: Vec<DayPlan>,
    #[serde(default)]
    cultural_insights: String,
    #[serde(default = "default_budget")]
    budget_estimate: String,
    #[serde(default)]
    cultural_etiquette: Vec<String>,
    #[serde(default)]
    narrative_summary: String,
}

#[derive(Deserialize)]
struct DestinationsPayload {
    #[serde(default)]
    recommendations: Vec<DestinationRecommendation>,
    #[serde(default)]
    insights: Vec<String>,
}

#[derive(Deserialize)]
struct InsightsPayload {
    #[serde(default)]
    insights: Vec<CulturalInsight>,
    #[serde(default)]
    etiquette: Vec<String>,
}

fn default_budget() -> String {
    "$1500-3000".to_string()
}

pub struct TravelService {
    db: Arc<dyn DatabaseService>,
    taste: Arc<dyn TasteGraphService>,
    llm: Arc<dyn LanguageModelService>,
    /// Wired only when a weather API key is configured; planned trips then
    /// include an outlook, fetched concurrently with the place list.
    weather: Option<Arc<dyn WeatherService>>,
    plan_budget: Duration,
}

impl TravelService {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        taste: Arc<dyn TasteGraphService>,
        llm: Arc<dyn LanguageModelService>,
        weather: Option<Arc<dyn WeatherService>>,
        plan_budget: Duration,
    ) -> Self {
        Self {
            db,
            taste,
            llm,
            weather,
            plan_budget,
        }
    }

    /// Plans one itinerary artifact. The whole operation is bounded by the
    /// travel budget; on timeout it fails as an upstream error, never a
    /// partial response.
    pub async fn plan_trip(
        &self,
        request: &TravelPlanRequest,
        user_id: Option<Uuid>,
    ) -> Result<TravelPlanResponse, ApiError> {
        let work = self.plan_trip_inner(request, user_id);
        tokio::time::timeout(self.plan_budget, work)
            .await
            .map_err(|_| {
                ApiError::from(PortError::Timeout(
                    "travel planning exceeded its budget".to_string(),
                ))
            })?
    }

    async fn plan_trip_inner(
        &self,
        request: &TravelPlanRequest,
        user_id: Option<Uuid>,
    ) -> Result<TravelPlanResponse, ApiError> {
        // Places and weather are independent: fetch them concurrently and
        // join before the narrative is built.
        let (places, weather): (Vec<TasteEntity>, Option<WeatherSummary>) = match &self.weather {
            Some(weather_port) => {
                let (places, outlook) = tokio::try_join!(
                    self.taste
                        .place_recommendations(&request.destination, &request.cultural_interests),
                    weather_port.forecast(&request.destination),
                )?;
                (places, Some(outlook))
            }
            None => (
                self.taste
                    .place_recommendations(&request.destination, &request.cultural_interests)
                    .await?,
                None,
            ),
        };

        let place_notes = places
            .iter()
            .map(|place| format!("- {} ({}, affinity {:.2})", place.name, place.category, place.affinity))
            .collect::<Vec<_>>()
            .join("\n");
        let weather_note = weather
            .as_ref()
            .map(|w| format!("Expected weather: {}, {:.0}-{:.0} C.", w.summary, w.low_celsius, w.high_celsius))
            .unwrap_or_default();

        let prompt = format!(
            "Create a {duration} itinerary for {group} traveler(s) visiting {destination}.\n\
             Travel style: {style}. Budget level: {budget}. Cultural interests: {interests}.\n\
             Dietary restrictions: {diet}.\n\
             Culturally relevant places from the taste graph:\n{places}\n{weather}\n\
             Return JSON with keys: itinerary (array of {{day, activity, cultural_context}}), \
             cultural_insights (string), budget_estimate (string), \
             cultural_etiquette (array of strings), narrative_summary (string).",
            duration = request.duration.as_deref().unwrap_or("1 week"),
            group = request.group_size,
            destination = request.destination,
            style = request.travel_style.as_deref().unwrap_or("cultural"),
            budget = request.budget_level.as_deref().unwrap_or("moderate"),
            interests = if request.cultural_interests.is_empty() {
                "cultural exploration".to_string()
            } else {
                request.cultural_interests.join(", ")
            },
            diet = if request.dietary_restrictions.is_empty() {
                "none".to_string()
            } else {
                request.dietary_restrictions.join(", ")
            },
            places = place_notes,
            weather = weather_note,
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(TRAVEL_SYSTEM).with_temperature(0.8))
            .await?;
        let payload: PlanPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("itinerary payload malformed: {}", e)))?;

        let response = TravelPlanResponse {
            itinerary_id: Uuid::new_v4(),
            destination: request.destination.clone(),
            duration: request.duration.clone().unwrap_or_else(|| "1 week".to_string()),
            travel_style: request
                .travel_style
                .clone()
                .unwrap_or_else(|| "cultural".to_string()),
            budget_estimate: payload.budget_estimate,
            cultural_insights: payload.cultural_insights,
            itinerary: payload.itinerary,
            places: places
                .into_iter()
                .map(|place| PlaceHighlight {
                    name: place.name,
                    category: place.category,
                    affinity: place.affinity,
                    description: place.description,
                })
                .collect(),
            weather: weather.map(|w| WeatherOutlook {
                summary: w.summary,
                high_celsius: w.high_celsius,
                low_celsius: w.low_celsius,
            }),
            narrative_summary: payload.narrative_summary,
            cultural_etiquette: payload.cultural_etiquette,
            planning_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            Some(NewArtifact {
                kind: ArtifactKind::Itinerary,
                user_id,
                payload: serde_json::to_value(&response).unwrap_or_default(),
            }),
            AnalyticsEvent::feature(
                "travel_plan",
                user_id,
                Some(json!({ "destination": request.destination })),
            ),
        );

        Ok(response)
    }

    pub async fn recommend_destinations(
        &self,
        request: &DestinationRequest,
        user_id: Option<Uuid>,
    ) -> Result<DestinationResponse, ApiError> {
        let topic = if request.interests.is_empty() {
            "cultural travel".to_string()
        } else {
            request.interests.join(", ")
        };
        let insights = self.taste.taste_insights(&topic).await?;

        let prompt = format!(
            "Recommend travel destinations for someone interested in: {topic}.\n\
             Travel style: {style}. Budget: {budget}. Trip length: {duration}.\n\
             Related cultural signals: {related}.\n\
             Return JSON with keys: recommendations (array of {{destination, country, \
             match_score, reasons, best_time_to_visit}}), insights (array of strings).",
            topic = topic,
            style = request.travel_style.as_deref().unwrap_or("cultural"),
            budget = request.budget_level.as_deref().unwrap_or("moderate"),
            duration = request.duration_range,
            related = insights.related_topics.join(", "),
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(TRAVEL_SYSTEM))
            .await?;
        let payload: DestinationsPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("destinations payload malformed: {}", e)))?;

        let response = DestinationResponse {
            recommendations: payload.recommendations,
            insights: payload.insights,
            recommendation_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            None,
            AnalyticsEvent::feature("travel_destinations", user_id, None),
        );

        Ok(response)
    }

    pub async fn cultural_insights(
        &self,
        request: &CulturalInsightsRequest,
        user_id: Option<Uuid>,
    ) -> Result<CulturalInsightsResponse, ApiError> {
        let insights = self.taste.taste_insights(&request.destination).await?;

        let prompt = format!(
            "Describe the cultural landscape of {destination} for a first-time visitor.\n\
             Locally relevant entities: {related}.\n\
             Return JSON with keys: insights (array of {{aspect, description, practical_tips}}), \
             etiquette (array of strings).",
            destination = request.destination,
            related = insights.related_topics.join(", "),
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(TRAVEL_SYSTEM))
            .await?;
        let payload: InsightsPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("insights payload malformed: {}", e)))?;

        let response = CulturalInsightsResponse {
            destination: request.destination.clone(),
            insights: payload.insights,
            etiquette: payload.etiquette,
            response_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            None,
            AnalyticsEvent::feature("travel_insights", user_id, None),
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{MockDb, MockLlm, MockTaste, MockWeather};
    use async_trait::async_trait;
    use culturo_core::domain::{TasteInsights, TrendingEntity};
    use culturo_core::ports::PortResult;

    /// A taste graph that never answers within any reasonable budget.
    struct StalledTaste;

    #[async_trait]
    impl TasteGraphService for StalledTaste {
        async fn taste_insights(&self, topic: &str) -> PortResult<TasteInsights> {
            MockTaste::default().taste_insights(topic).await
        }

        async fn place_recommendations(
            &self,
            _destination: &str,
            _interests: &[String],
        ) -> PortResult<Vec<TasteEntity>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }

        async fn trending(&self, category: &str) -> PortResult<Vec<TrendingEntity>> {
            MockTaste::default().trending(category).await
        }
    }

    fn plan_value() -> serde_json::Value {
        json!({
            "itinerary": [
                {"day": 1, "activity": "Fado evening in Alfama", "cultural_context": "Portugal's melancholic song tradition"}
            ],
            "cultural_insights": "Lisbon layers Moorish, maritime, and modern histories.",
            "budget_estimate": "$1200-2200",
            "cultural_etiquette": ["Greet shopkeepers when entering"],
            "narrative_summary": "A week of music, tiles, and seafood."
        })
    }

    fn request() -> TravelPlanRequest {
        serde_json::from_str(r#"{"destination": "Lisbon", "cultural_interests": ["fado", "food"]}"#)
            .unwrap()
    }

    #[tokio::test]
    async fn plan_joins_places_and_weather() {
        let service = TravelService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(plan_value())),
            Some(Arc::new(MockWeather)),
            Duration::from_secs(75),
        );

        let response = service.plan_trip(&request(), None).await.unwrap();
        assert_eq!(response.destination, "Lisbon");
        assert!(!response.places.is_empty());
        let weather = response.weather.expect("weather port wired");
        assert_eq!(weather.summary, "clear sky");
        assert_eq!(response.itinerary.len(), 1);
    }

    #[tokio::test]
    async fn plan_without_weather_port_omits_outlook() {
        let service = TravelService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(plan_value())),
            None,
            Duration::from_secs(75),
        );

        let response = service.plan_trip(&request(), None).await.unwrap();
        assert!(response.weather.is_none());
    }

    #[tokio::test]
    async fn exhausted_plan_budget_maps_to_a_timeout() {
        let service = TravelService::new(
            Arc::new(MockDb::default()),
            Arc::new(StalledTaste),
            Arc::new(MockLlm::json(plan_value())),
            None,
            Duration::from_millis(20),
        );

        let err = service.plan_trip(&request(), None).await.unwrap_err();
        assert!(matches!(err, ApiError::UpstreamTimeout(_)));
    }

    #[tokio::test]
    async fn taste_graph_outage_fails_the_whole_plan() {
        let service = TravelService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::failing()),
            Arc::new(MockLlm::json(plan_value())),
            Some(Arc::new(MockWeather)),
            Duration::from_secs(75),
        );

        let err = service.plan_trip(&request(), None).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
