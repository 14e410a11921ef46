//! Mock port implementations shared by the service unit tests.

use async_trait::async_trait;
use chrono::Utc;
use culturo_core::domain::{
    ActivitySummary, AnalyticsEvent, ArtifactEntry, ArtifactKind, AuthClaims, LlmRequest,
    NewArtifact, PreferenceSet, StoredArtifact, TasteEntity, TasteInsights, TrendingEntity, User,
    WeatherSummary,
};
use culturo_core::ports::{
    DatabaseService, LanguageModelService, PortError, PortResult, TasteGraphService,
    WeatherService,
};
use serde_json::json;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

//=========================================================================================
// Database mocks
//=========================================================================================

#[derive(Default)]
pub struct MockDb {
    pub preferences: HashMap<String, Vec<String>>,
}

#[async_trait]
impl DatabaseService for MockDb {
    async fn ping(&self) -> bool {
        true
    }

    async fn upsert_user(&self, claims: &AuthClaims) -> PortResult<User> {
        Ok(User {
            id: Uuid::new_v4(),
            subject: claims.subject.clone(),
            email: claims.email.clone(),
            display_name: claims.display_name.clone(),
            created_at: Utc::now(),
        })
    }

    async fn get_user_by_subject(&self, subject: &str) -> PortResult<User> {
        Ok(User {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            email: None,
            display_name: None,
            created_at: Utc::now(),
        })
    }

    async fn get_preferences(&self, user_id: Uuid) -> PortResult<PreferenceSet> {
        Ok(PreferenceSet {
            user_id,
            domains: self.preferences.clone(),
            updated_at: Utc::now(),
        })
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        domains: HashMap<String, Vec<String>>,
    ) -> PortResult<PreferenceSet> {
        Ok(PreferenceSet {
            user_id,
            domains,
            updated_at: Utc::now(),
        })
    }

    async fn save_artifact(&self, artifact: NewArtifact) -> PortResult<StoredArtifact> {
        Ok(StoredArtifact {
            id: Uuid::new_v4(),
            kind: artifact.kind,
            created_at: Utc::now(),
        })
    }

    async fn list_artifacts(
        &self,
        _user_id: Uuid,
        kind: Option<ArtifactKind>,
        _limit: i64,
    ) -> PortResult<Vec<ArtifactEntry>> {
        Ok(vec![ArtifactEntry {
            id: Uuid::new_v4(),
            kind: kind.unwrap_or(ArtifactKind::Story),
            payload: json!({"title": "A Night in Lisbon"}),
            created_at: Utc::now(),
        }])
    }

    async fn record_event(&self, _event: AnalyticsEvent) -> PortResult<()> {
        Ok(())
    }

    async fn activity_summary(&self, _user_id: Uuid) -> PortResult<ActivitySummary> {
        Ok(ActivitySummary {
            total_sessions: 3,
            total_requests: 17,
            feature_usage: vec![("story_generate".to_string(), 9)],
            last_active: Some(Utc::now()),
        })
    }
}

/// A database whose side-write paths always fail. Primary reads keep
/// working so the operation under test can complete.
pub struct FailingDb;

#[async_trait]
impl DatabaseService for FailingDb {
    async fn ping(&self) -> bool {
        true
    }

    async fn upsert_user(&self, claims: &AuthClaims) -> PortResult<User> {
        MockDb::default().upsert_user(claims).await
    }

    async fn get_user_by_subject(&self, subject: &str) -> PortResult<User> {
        MockDb::default().get_user_by_subject(subject).await
    }

    async fn get_preferences(&self, user_id: Uuid) -> PortResult<PreferenceSet> {
        MockDb::default().get_preferences(user_id).await
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        domains: HashMap<String, Vec<String>>,
    ) -> PortResult<PreferenceSet> {
        MockDb::default().update_preferences(user_id, domains).await
    }

    async fn save_artifact(&self, _artifact: NewArtifact) -> PortResult<StoredArtifact> {
        Err(PortError::Unexpected("artifact write refused".to_string()))
    }

    async fn list_artifacts(
        &self,
        user_id: Uuid,
        kind: Option<ArtifactKind>,
        limit: i64,
    ) -> PortResult<Vec<ArtifactEntry>> {
        MockDb::default().list_artifacts(user_id, kind, limit).await
    }

    async fn record_event(&self, _event: AnalyticsEvent) -> PortResult<()> {
        Err(PortError::Unexpected("event write refused".to_string()))
    }

    async fn activity_summary(&self, _user_id: Uuid) -> PortResult<ActivitySummary> {
        Err(PortError::Unexpected("summary read refused".to_string()))
    }
}

//=========================================================================================
// Taste-graph mock
//=========================================================================================

#[derive(Default)]
pub struct MockTaste {
    fail: bool,
}

impl MockTaste {
    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn check(&self) -> PortResult<()> {
        if self.fail {
            Err(PortError::Upstream("taste graph unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TasteGraphService for MockTaste {
    async fn taste_insights(&self, topic: &str) -> PortResult<TasteInsights> {
        self.check()?;
        Ok(TasteInsights {
            topic: topic.to_string(),
            affinity_score: 0.8,
            related_topics: vec!["street food".to_string(), "night markets".to_string()],
            entities: vec![TasteEntity {
                name: "Chatuchak Market".to_string(),
                category: "place".to_string(),
                affinity: 0.82,
                description: None,
            }],
        })
    }

    async fn place_recommendations(
        &self,
        _destination: &str,
        _interests: &[String],
    ) -> PortResult<Vec<TasteEntity>> {
        self.check()?;
        Ok(vec![
            TasteEntity {
                name: "Alfama district".to_string(),
                category: "neighbourhood".to_string(),
                affinity: 0.9,
                description: Some("Historic quarter with fado houses".to_string()),
            },
            TasteEntity {
                name: "Time Out Market".to_string(),
                category: "market".to_string(),
                affinity: 0.7,
                description: None,
            },
        ])
    }

    async fn trending(&self, category: &str) -> PortResult<Vec<TrendingEntity>> {
        self.check()?;
        Ok(vec![TrendingEntity {
            name: "Neo-soul revival".to_string(),
            category: category.to_string(),
            trend_score: 0.91,
            momentum: "rising".to_string(),
        }])
    }
}

//=========================================================================================
// LLM mock
//=========================================================================================

pub struct MockLlm {
    json: Value,
    text: String,
    fail: bool,
}

impl MockLlm {
    pub fn json(value: Value) -> Self {
        Self {
            json: value,
            text: "A culturally rich narrative.".to_string(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            json: Value::Null,
            text: String::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl LanguageModelService for MockLlm {
    async fn complete(&self, _request: &LlmRequest) -> PortResult<String> {
        if self.fail {
            return Err(PortError::Upstream("llm unavailable".to_string()));
        }
        Ok(self.text.clone())
    }

    async fn complete_json(&self, _request: &LlmRequest) -> PortResult<Value> {
        if self.fail {
            return Err(PortError::Upstream("llm unavailable".to_string()));
        }
        Ok(self.json.clone())
    }
}

//=========================================================================================
// Weather mock
//=========================================================================================

pub struct MockWeather;

#[async_trait]
impl WeatherService for MockWeather {
    async fn forecast(&self, destination: &str) -> PortResult<WeatherSummary> {
        Ok(WeatherSummary {
            destination: destination.to_string(),
            summary: "clear sky".to_string(),
            high_celsius: 24.0,
            low_celsius: 15.0,
        })
    }
}
