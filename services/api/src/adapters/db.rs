//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete
//! implementation of the `DatabaseService` port from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use culturo_core::domain::{
    ActivitySummary, AnalyticsEvent, ArtifactEntry, ArtifactKind, AuthClaims, NewArtifact,
    PreferenceSet, StoredArtifact, User,
};
use culturo_core::ports::{DatabaseService, PortError, PortResult};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

}

fn map_sqlx(err: sqlx::Error, what: &str) -> PortError {
    match err {
        sqlx::Error::RowNotFound => PortError::NotFound(what.to_string()),
        other => PortError::Unexpected(other.to_string()),
    }
}

fn kind_from_str(raw: &str) -> ArtifactKind {
    ArtifactKind::parse(raw).unwrap_or(ArtifactKind::RecommendationSet)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    subject: String,
    email: Option<String>,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            subject: self.subject,
            email: self.email,
            display_name: self.display_name,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct PreferenceRecord {
    user_id: Uuid,
    domains: Json<HashMap<String, Vec<String>>>,
    updated_at: DateTime<Utc>,
}

impl PreferenceRecord {
    fn to_domain(self) -> PreferenceSet {
        PreferenceSet {
            user_id: self.user_id,
            domains: self.domains.0,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ArtifactRecord {
    id: Uuid,
    kind: String,
    created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    fn to_domain(self) -> StoredArtifact {
        StoredArtifact {
            id: self.id,
            kind: kind_from_str(&self.kind),
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ArtifactEntryRecord {
    id: Uuid,
    kind: String,
    payload: Json<Value>,
    created_at: DateTime<Utc>,
}

impl ArtifactEntryRecord {
    fn to_domain(self) -> ArtifactEntry {
        ArtifactEntry {
            id: self.id,
            kind: kind_from_str(&self.kind),
            payload: self.payload.0,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct SummaryRecord {
    total_sessions: i64,
    total_requests: i64,
    last_active: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct FeatureUsageRecord {
    event_name: String,
    usage_count: i64,
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn upsert_user(&self, claims: &AuthClaims) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (subject, email, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject) DO UPDATE
                SET email = COALESCE(EXCLUDED.email, users.email),
                    display_name = COALESCE(EXCLUDED.display_name, users.display_name)
            RETURNING id, subject, email, display_name, created_at
            "#,
        )
        .bind(&claims.subject)
        .bind(&claims.email)
        .bind(&claims.display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "user"))?;

        Ok(record.to_domain())
    }

    async fn get_user_by_subject(&self, subject: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, subject, email, display_name, created_at FROM users WHERE subject = $1",
        )
        .bind(subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "user"))?;

        Ok(record.to_domain())
    }

    async fn get_preferences(&self, user_id: Uuid) -> PortResult<PreferenceSet> {
        let record = sqlx::query_as::<_, PreferenceRecord>(
            "SELECT user_id, domains, updated_at FROM preference_sets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "preference set"))?;

        // A user with no stored row has an empty preference set, not a 404.
        Ok(record.map(PreferenceRecord::to_domain).unwrap_or(PreferenceSet {
            user_id,
            domains: HashMap::new(),
            updated_at: Utc::now(),
        }))
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        domains: HashMap<String, Vec<String>>,
    ) -> PortResult<PreferenceSet> {
        // Single-row upsert stamped with the server clock: concurrent
        // updates resolve last-write-wins.
        let record = sqlx::query_as::<_, PreferenceRecord>(
            r#"
            INSERT INTO preference_sets (user_id, domains, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id) DO UPDATE
                SET domains = EXCLUDED.domains, updated_at = now()
            RETURNING user_id, domains, updated_at
            "#,
        )
        .bind(user_id)
        .bind(Json(domains))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "preference set"))?;

        Ok(record.to_domain())
    }

    async fn save_artifact(&self, artifact: NewArtifact) -> PortResult<StoredArtifact> {
        let record = sqlx::query_as::<_, ArtifactRecord>(
            r#"
            INSERT INTO artifacts (kind, user_id, payload)
            VALUES ($1, $2, $3)
            RETURNING id, kind, created_at
            "#,
        )
        .bind(artifact.kind.as_str())
        .bind(artifact.user_id)
        .bind(Json(artifact.payload))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "artifact"))?;

        Ok(record.to_domain())
    }

    async fn list_artifacts(
        &self,
        user_id: Uuid,
        kind: Option<ArtifactKind>,
        limit: i64,
    ) -> PortResult<Vec<ArtifactEntry>> {
        let records = sqlx::query_as::<_, ArtifactEntryRecord>(
            r#"
            SELECT id, kind, payload, created_at
            FROM artifacts
            WHERE user_id = $1 AND ($2::text IS NULL OR kind = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(kind.map(|k| k.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "artifacts"))?;

        Ok(records.into_iter().map(ArtifactEntryRecord::to_domain).collect())
    }

    async fn record_event(&self, event: AnalyticsEvent) -> PortResult<()> {
        sqlx::query(
            r#"
            INSERT INTO analytics_events (event_type, event_name, event_data, user_id, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&event.event_type)
        .bind(&event.event_name)
        .bind(event.event_data.map(Json))
        .bind(event.user_id)
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "analytics event"))?;

        Ok(())
    }

    async fn activity_summary(&self, user_id: Uuid) -> PortResult<ActivitySummary> {
        let summary = sqlx::query_as::<_, SummaryRecord>(
            r#"
            SELECT
                COUNT(DISTINCT DATE(occurred_at)) AS total_sessions,
                COUNT(*) AS total_requests,
                MAX(occurred_at) AS last_active
            FROM analytics_events
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "activity summary"))?;

        let usage = sqlx::query_as::<_, FeatureUsageRecord>(
            r#"
            SELECT event_name, COUNT(*) AS usage_count
            FROM analytics_events
            WHERE user_id = $1
            GROUP BY event_name
            ORDER BY usage_count DESC
            LIMIT 10
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx(e, "activity summary"))?;

        Ok(ActivitySummary {
            total_sessions: summary.total_sessions,
            total_requests: summary.total_requests,
            feature_usage: usage
                .into_iter()
                .map(|row| (row.event_name, row.usage_count))
                .collect(),
            last_active: summary.last_active,
        })
    }
}
