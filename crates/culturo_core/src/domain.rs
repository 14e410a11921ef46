//! crates/culturo_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or wire format.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// A mirrored identity record, keyed by the auth provider's subject id.
///
/// Created on first successful authentication, updated on profile edits,
/// never hard-deleted.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    /// The auth provider's stable subject id (e.g. `user_2abc...`).
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user's declared interests per domain (music, food, fashion, books,
/// travel). At most one active version per user; conflicting updates
/// resolve last-write-wins by server timestamp.
#[derive(Debug, Clone)]
pub struct PreferenceSet {
    pub user_id: Uuid,
    pub domains: HashMap<String, Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

/// The kind of generated artifact a vertical service produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Story,
    StoryAnalysis,
    FoodAnalysis,
    Itinerary,
    RecommendationSet,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Story => "story",
            ArtifactKind::StoryAnalysis => "story_analysis",
            ArtifactKind::FoodAnalysis => "food_analysis",
            ArtifactKind::Itinerary => "itinerary",
            ArtifactKind::RecommendationSet => "recommendation_set",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "story" => Some(ArtifactKind::Story),
            "story_analysis" => Some(ArtifactKind::StoryAnalysis),
            "food_analysis" => Some(ArtifactKind::FoodAnalysis),
            "itinerary" => Some(ArtifactKind::Itinerary),
            "recommendation_set" => Some(ArtifactKind::RecommendationSet),
            _ => None,
        }
    }
}

/// An artifact about to be persisted. Each artifact belongs to exactly one
/// originating request; artifacts are immutable once created.
#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub kind: ArtifactKind,
    pub user_id: Option<Uuid>,
    pub payload: Value,
}

/// A persisted artifact row.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub id: Uuid,
    pub kind: ArtifactKind,
    pub created_at: DateTime<Utc>,
}

/// A persisted artifact with its payload, as read back for history views.
#[derive(Debug, Clone)]
pub struct ArtifactEntry {
    pub id: Uuid,
    pub kind: ArtifactKind,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// An append-only analytics record. Never mutated after insert.
#[derive(Debug, Clone)]
pub struct AnalyticsEvent {
    pub event_type: String,
    pub event_name: String,
    pub event_data: Option<Value>,
    pub user_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    /// A feature-use event stamped with the current server time.
    pub fn feature(name: &str, user_id: Option<Uuid>, data: Option<Value>) -> Self {
        Self {
            event_type: "feature_use".to_string(),
            event_name: name.to_string(),
            event_data: data,
            user_id,
            occurred_at: Utc::now(),
        }
    }
}

/// Aggregated activity for one user, computed from analytics events.
#[derive(Debug, Clone, Default)]
pub struct ActivitySummary {
    pub total_sessions: i64,
    pub total_requests: i64,
    pub feature_usage: Vec<(String, i64)>,
    pub last_active: Option<DateTime<Utc>>,
}

/// One entity returned by the taste-graph API, coerced into a fixed shape
/// at the adapter boundary.
#[derive(Debug, Clone)]
pub struct TasteEntity {
    pub name: String,
    pub category: String,
    pub affinity: f64,
    pub description: Option<String>,
}

/// Cross-domain affinity signals for a topic.
#[derive(Debug, Clone)]
pub struct TasteInsights {
    pub topic: String,
    pub affinity_score: f64,
    pub related_topics: Vec<String>,
    pub entities: Vec<TasteEntity>,
}

/// A trending entity with its momentum.
#[derive(Debug, Clone)]
pub struct TrendingEntity {
    pub name: String,
    pub category: String,
    pub trend_score: f64,
    pub momentum: String,
}

/// A short weather outlook for a destination.
#[derive(Debug, Clone)]
pub struct WeatherSummary {
    pub destination: String,
    pub summary: String,
    pub high_celsius: f64,
    pub low_celsius: f64,
}

/// Verified claims for a bearer token, as reported by the auth provider.
#[derive(Debug, Clone)]
pub struct AuthClaims {
    pub subject: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// A single completion request sent to the language model.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: 0.7,
            max_tokens: 1500,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}
