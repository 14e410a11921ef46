//! Wire types for the stories vertical.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::require_text;
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StoryGenerationRequest {
    #[serde(default)]
    pub story_prompt: String,
    pub genre: Option<String>,
    pub target_audience: Option<String>,
    pub tone: Option<String>,
    #[serde(default = "default_true")]
    pub include_cultural_elements: bool,
}

impl StoryGenerationRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("story_prompt", &self.story_prompt, 10, 2000)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Character {
    pub name: String,
    pub role: String,
    pub description: String,
}

/// A generated story artifact. Immutable; regenerating produces a new
/// artifact with a fresh id and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoryGenerationResponse {
    pub story_id: Uuid,
    pub title: String,
    pub summary: String,
    pub plot_outline: String,
    pub characters: Vec<Character>,
    pub themes: Vec<String>,
    pub cultural_context: String,
    pub estimated_word_count: u32,
    pub generation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StoryAnalysisRequest {
    #[serde(default)]
    pub story_prompt: String,
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
}

impl StoryAnalysisRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_text("story_prompt", &self.story_prompt, 10, 2000)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoryScores {
    pub plot_strength: f64,
    pub character_development: f64,
    pub originality: f64,
    pub cultural_relevance: f64,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoryAnalysisResponse {
    pub analysis_id: Uuid,
    pub story_prompt: String,
    pub analysis: StoryScores,
    pub recommendations: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub analysis_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoryPromptResponse {
    pub prompt: String,
    pub genre: String,
}

fn default_true() -> bool {
    true
}

fn default_analysis_type() -> String {
    "comprehensive".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_prompt_is_rejected_by_name() {
        let req: StoryGenerationRequest = serde_json::from_str("{}").unwrap();
        let err = req.validate().unwrap_err();
        match err {
            ApiError::Validation { field, .. } => assert_eq!(field, "story_prompt"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_apply() {
        let req: StoryGenerationRequest =
            serde_json::from_str(r#"{"story_prompt": "a tale of two cities"}"#).unwrap();
        assert!(req.include_cultural_elements);
        assert!(req.validate().is_ok());
    }
}
