//! The stories vertical: culturally-aware story generation and analysis.

use chrono::Utc;
use culturo_core::domain::{AnalyticsEvent, ArtifactKind, LlmRequest, NewArtifact};
use culturo_core::ports::{DatabaseService, LanguageModelService, TasteGraphService};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use super::spawn_post_commit;
use crate::error::ApiError;
use crate::schemas::stories::{
    Character, StoryAnalysisRequest, StoryAnalysisResponse, StoryGenerationRequest,
    StoryGenerationResponse, StoryPromptResponse, StoryScores,
};

const STORY_SYSTEM: &str = "You are a culturally intelligent storytelling assistant. \
Respond with a single JSON object and nothing else.";

/// Prompt pool for the surprise endpoint.
const SURPRISE_PROMPTS: &[(&str, &str)] = &[
    (
        "A street-food vendor in Bangkok discovers her grandmother's recipes carry hidden messages",
        "mystery",
    ),
    (
        "Two rival flamenco dancers are forced to perform together at Seville's spring fair",
        "drama",
    ),
    (
        "A Lagos DJ finds a vinyl record that plays music from ten years in the future",
        "sci-fi",
    ),
    (
        "An apprentice calligrapher in Kyoto must complete his master's final unfinished scroll",
        "historical",
    ),
    (
        "A Oaxacan family's Day of the Dead altar starts receiving letters from the departed",
        "fantasy",
    ),
];

//=========================================================================================
// LLM payload shapes (coerced at this boundary)
//=========================================================================================

#[derive(Deserialize)]
struct StoryPayload {
    title: String,
    summary: String,
    plot_outline: String,
    #[serde(default)]
    characters: Vec<Character>,
    #[serde(default)]
    themes: Vec<String>,
    #[serde(default)]
    cultural_context: String,
    #[serde(default = "default_word_count")]
    estimated_word_count: u32,
}

#[derive(Deserialize)]
struct AnalysisPayload {
    analysis: StoryScores,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    improvement_suggestions: Vec<String>,
}

fn default_word_count() -> u32 {
    2000
}

//=========================================================================================
// The Service
//=========================================================================================

pub struct StoryService {
    db: Arc<dyn DatabaseService>,
    taste: Arc<dyn TasteGraphService>,
    llm: Arc<dyn LanguageModelService>,
}

impl StoryService {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        taste: Arc<dyn TasteGraphService>,
        llm: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self { db, taste, llm }
    }

    /// Generates one immutable story artifact. Issuing the same request
    /// twice produces two artifacts with distinct ids and timestamps.
    pub async fn generate_story(
        &self,
        request: &StoryGenerationRequest,
        user_id: Option<Uuid>,
    ) -> Result<StoryGenerationResponse, ApiError> {
        let cultural_notes = if request.include_cultural_elements {
            let insights = self.taste.taste_insights(&request.story_prompt).await?;
            format!(
                "Related cultural touchstones (affinity {:.2}): {}",
                insights.affinity_score,
                insights.related_topics.join(", ")
            )
        } else {
            String::new()
        };

        let prompt = format!(
            "Write a story outline for this prompt: {prompt}\n\
             Genre: {genre}. Target audience: {audience}. Tone: {tone}.\n\
             {notes}\n\
             Return JSON with keys: title, summary, plot_outline, \
             characters (array of {{name, role, description}}), themes (array of strings), \
             cultural_context (string), estimated_word_count (integer).",
            prompt = request.story_prompt,
            genre = request.genre.as_deref().unwrap_or("any"),
            audience = request.target_audience.as_deref().unwrap_or("adults"),
            tone = request.tone.as_deref().unwrap_or("engaging"),
            notes = cultural_notes,
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(STORY_SYSTEM).with_temperature(0.8))
            .await?;
        let payload: StoryPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("story payload malformed: {}", e)))?;

        let response = StoryGenerationResponse {
            story_id: Uuid::new_v4(),
            title: payload.title,
            summary: payload.summary,
            plot_outline: payload.plot_outline,
            characters: payload.characters,
            themes: payload.themes,
            cultural_context: payload.cultural_context,
            estimated_word_count: payload.estimated_word_count,
            generation_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            Some(NewArtifact {
                kind: ArtifactKind::Story,
                user_id,
                payload: serde_json::to_value(&response).unwrap_or_default(),
            }),
            AnalyticsEvent::feature(
                "story_generate",
                user_id,
                Some(json!({ "story_id": response.story_id })),
            ),
        );

        Ok(response)
    }

    pub async fn analyze_story(
        &self,
        request: &StoryAnalysisRequest,
        user_id: Option<Uuid>,
    ) -> Result<StoryAnalysisResponse, ApiError> {
        let prompt = format!(
            "Perform a {depth} analysis of this story premise: {prompt}\n\
             Return JSON with keys: analysis ({{plot_strength, character_development, \
             originality, cultural_relevance, overall_score}} as numbers 0-10), \
             recommendations (array of strings), improvement_suggestions (array of strings).",
            depth = request.analysis_type,
            prompt = request.story_prompt,
        );

        let value = self
            .llm
            .complete_json(&LlmRequest::new(prompt).with_system(STORY_SYSTEM))
            .await?;
        let payload: AnalysisPayload = serde_json::from_value(value)
            .map_err(|e| ApiError::Upstream(format!("analysis payload malformed: {}", e)))?;

        let response = StoryAnalysisResponse {
            analysis_id: Uuid::new_v4(),
            story_prompt: request.story_prompt.clone(),
            analysis: payload.analysis,
            recommendations: payload.recommendations,
            improvement_suggestions: payload.improvement_suggestions,
            analysis_date: Utc::now(),
        };

        spawn_post_commit(
            self.db.clone(),
            Some(NewArtifact {
                kind: ArtifactKind::StoryAnalysis,
                user_id,
                payload: serde_json::to_value(&response).unwrap_or_default(),
            }),
            AnalyticsEvent::feature("story_analyze", user_id, None),
        );

        Ok(response)
    }

    /// Picks a random prompt from the fixed pool.
    pub fn random_prompt(&self) -> StoryPromptResponse {
        let (prompt, genre) = SURPRISE_PROMPTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(SURPRISE_PROMPTS[0]);
        StoryPromptResponse {
            prompt: prompt.to_string(),
            genre: genre.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{FailingDb, MockDb, MockLlm, MockTaste};

    fn story_value() -> serde_json::Value {
        json!({
            "title": "The Listening Market",
            "summary": "A vendor hears the city's secrets.",
            "plot_outline": "Act one...",
            "characters": [{"name": "Nok", "role": "protagonist", "description": "A vendor"}],
            "themes": ["memory", "food"],
            "cultural_context": "Bangkok street markets",
            "estimated_word_count": 4000
        })
    }

    fn request() -> StoryGenerationRequest {
        serde_json::from_str(r#"{"story_prompt": "a market that listens at night"}"#).unwrap()
    }

    #[tokio::test]
    async fn same_request_twice_yields_distinct_artifacts() {
        let service = StoryService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(story_value())),
        );

        let first = service.generate_story(&request(), None).await.unwrap();
        let second = service.generate_story(&request(), None).await.unwrap();
        assert_ne!(first.story_id, second.story_id);
        assert!(second.generation_date >= first.generation_date);
        assert_eq!(first.title, second.title);
    }

    #[tokio::test]
    async fn analytics_failure_does_not_change_the_response() {
        let service = StoryService::new(
            Arc::new(FailingDb),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(story_value())),
        );

        let response = service.generate_story(&request(), None).await.unwrap();
        assert_eq!(response.title, "The Listening Market");
    }

    #[tokio::test]
    async fn upstream_failure_is_uniform() {
        let service = StoryService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::failing()),
            Arc::new(MockLlm::json(story_value())),
        );

        let err = service.generate_story(&request(), None).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[tokio::test]
    async fn malformed_llm_payload_is_an_upstream_error() {
        let service = StoryService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(json!({"unexpected": true}))),
        );

        let err = service.generate_story(&request(), None).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[test]
    fn random_prompt_comes_from_the_pool() {
        let service = StoryService::new(
            Arc::new(MockDb::default()),
            Arc::new(MockTaste::default()),
            Arc::new(MockLlm::json(json!({}))),
        );
        let picked = service.random_prompt();
        assert!(SURPRISE_PROMPTS.iter().any(|(p, _)| *p == picked.prompt));
    }
}
