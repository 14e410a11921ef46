//! crates/culturo_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the
//! database, the taste-graph API, or the LLM provider.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{
    ActivitySummary, AnalyticsEvent, ArtifactEntry, ArtifactKind, AuthClaims, LlmRequest,
    NewArtifact, PreferenceSet, StoredArtifact, TasteEntity, TasteInsights, TrendingEntity, User,
    WeatherSummary,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services, deliberately
/// hiding which adapter failed from everything above the port boundary.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Upstream service failure: {0}")]
    Upstream(String),
    #[error("Upstream call timed out: {0}")]
    Timeout(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    /// Cheap connectivity probe for the liveness endpoint.
    async fn ping(&self) -> bool;

    // --- User mirror rows ---

    /// Creates or refreshes the mirrored user row for a verified subject.
    async fn upsert_user(&self, claims: &AuthClaims) -> PortResult<User>;

    async fn get_user_by_subject(&self, subject: &str) -> PortResult<User>;

    // --- Preference sets ---

    async fn get_preferences(&self, user_id: Uuid) -> PortResult<PreferenceSet>;

    /// Replaces the user's preference set. Last-write-wins by server
    /// timestamp; no history is retained.
    async fn update_preferences(
        &self,
        user_id: Uuid,
        domains: HashMap<String, Vec<String>>,
    ) -> PortResult<PreferenceSet>;

    // --- Generated artifacts ---

    async fn save_artifact(&self, artifact: NewArtifact) -> PortResult<StoredArtifact>;

    /// Lists the user's saved artifacts, newest first, optionally narrowed
    /// to one kind.
    async fn list_artifacts(
        &self,
        user_id: Uuid,
        kind: Option<ArtifactKind>,
        limit: i64,
    ) -> PortResult<Vec<ArtifactEntry>>;

    // --- Analytics (append-only) ---

    async fn record_event(&self, event: AnalyticsEvent) -> PortResult<()>;

    async fn activity_summary(&self, user_id: Uuid) -> PortResult<ActivitySummary>;
}

#[async_trait]
pub trait TasteGraphService: Send + Sync {
    /// Fetches cross-domain affinity signals for a free-text topic.
    async fn taste_insights(&self, topic: &str) -> PortResult<TasteInsights>;

    /// Fetches culturally relevant places for a destination, biased by the
    /// caller's interest tags.
    async fn place_recommendations(
        &self,
        destination: &str,
        interests: &[String],
    ) -> PortResult<Vec<TasteEntity>>;

    /// Fetches currently trending entities for a category.
    async fn trending(&self, category: &str) -> PortResult<Vec<TrendingEntity>>;
}

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Produces a free-form completion.
    async fn complete(&self, request: &LlmRequest) -> PortResult<String>;

    /// Produces a completion that must parse as a JSON value. Unparseable
    /// model output is an upstream failure; untyped text never crosses
    /// this boundary.
    async fn complete_json(&self, request: &LlmRequest) -> PortResult<Value>;
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Fetches a short forecast summary for a destination.
    async fn forecast(&self, destination: &str) -> PortResult<WeatherSummary>;
}

#[async_trait]
pub trait AuthProviderService: Send + Sync {
    /// Verifies a bearer token with the auth provider and returns its
    /// claims. The backend never issues or rotates tokens itself.
    async fn verify_token(&self, token: &str) -> PortResult<AuthClaims>;
}
