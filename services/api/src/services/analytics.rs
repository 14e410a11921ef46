//! The analytics vertical: event tracking and usage summaries.

use chrono::Utc;
use culturo_core::domain::{AnalyticsEvent, User};
use culturo_core::ports::DatabaseService;
use std::sync::Arc;

use super::spawn_post_commit;
use crate::error::ApiError;
use crate::schemas::analytics::{
    AnalyticsSummaryResponse, FeatureUsage, TrackEventRequest, TrackEventResponse,
    UserProfileSummary,
};

pub struct AnalyticsService {
    db: Arc<dyn DatabaseService>,
}

impl AnalyticsService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }

    /// Accepts the event and returns immediately; the write happens in the
    /// background and a storage failure is visible only in the logs.
    pub fn track_event(&self, request: TrackEventRequest, user: Option<&User>) -> TrackEventResponse {
        let event = AnalyticsEvent {
            event_type: request.event_type,
            event_name: request.event_name,
            event_data: request.event_data,
            user_id: user.map(|u| u.id),
            occurred_at: Utc::now(),
        };
        spawn_post_commit(self.db.clone(), None, event);
        TrackEventResponse { status: "accepted" }
    }

    /// Summary for an authenticated caller, derived from stored events.
    pub async fn user_summary(&self, user: &User) -> Result<AnalyticsSummaryResponse, ApiError> {
        let summary = self.db.activity_summary(user.id).await?;

        Ok(AnalyticsSummaryResponse {
            user_id: Some(user.id.to_string()),
            demo: false,
            user_profile: UserProfileSummary {
                total_sessions: summary.total_sessions,
                total_requests: summary.total_requests,
                engagement_score: engagement_score(summary.total_sessions, summary.total_requests),
                last_active: summary.last_active,
            },
            feature_usage: summary
                .feature_usage
                .into_iter()
                .map(|(feature_name, usage_count)| FeatureUsage {
                    feature_name,
                    usage_count,
                })
                .collect(),
            response_date: Utc::now(),
        })
    }

    /// Fixed demo payload for anonymous callers. Never touches storage.
    pub fn demo_summary(&self) -> AnalyticsSummaryResponse {
        AnalyticsSummaryResponse {
            user_id: None,
            demo: true,
            user_profile: UserProfileSummary {
                total_sessions: 12,
                total_requests: 87,
                engagement_score: 7.4,
                last_active: Some(Utc::now()),
            },
            feature_usage: vec![
                FeatureUsage {
                    feature_name: "story_generate".to_string(),
                    usage_count: 34,
                },
                FeatureUsage {
                    feature_name: "food_analyze".to_string(),
                    usage_count: 28,
                },
                FeatureUsage {
                    feature_name: "travel_plan".to_string(),
                    usage_count: 25,
                },
            ],
            response_date: Utc::now(),
        }
    }
}

/// Requests-per-session weighted onto a 0-10 scale, capped at 10.
fn engagement_score(sessions: i64, requests: i64) -> f64 {
    if sessions <= 0 {
        return 0.0;
    }
    let per_session = requests as f64 / sessions as f64;
    (per_session * 1.5).min(10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{FailingDb, MockDb};

    #[tokio::test]
    async fn track_event_is_accepted_even_when_storage_fails() {
        let service = AnalyticsService::new(Arc::new(FailingDb));
        let request: TrackEventRequest = serde_json::from_str(
            r#"{"event_type": "feature_usage", "event_name": "story_generate"}"#,
        )
        .unwrap();

        let response = service.track_event(request, None);
        assert_eq!(response.status, "accepted");
    }

    #[tokio::test]
    async fn user_summary_carries_feature_usage() {
        let service = AnalyticsService::new(Arc::new(MockDb::default()));
        let user = User {
            id: uuid::Uuid::new_v4(),
            subject: "user_1".to_string(),
            email: None,
            display_name: None,
            created_at: Utc::now(),
        };

        let summary = service.user_summary(&user).await.unwrap();
        assert!(!summary.demo);
        assert_eq!(summary.feature_usage.len(), 1);
        assert!(summary.user_profile.engagement_score > 0.0);
    }

    #[tokio::test]
    async fn summary_read_failure_is_not_hidden() {
        let service = AnalyticsService::new(Arc::new(FailingDb));
        let user = User {
            id: uuid::Uuid::new_v4(),
            subject: "user_1".to_string(),
            email: None,
            display_name: None,
            created_at: Utc::now(),
        };

        assert!(service.user_summary(&user).await.is_err());
    }

    #[test]
    fn demo_summary_is_marked() {
        let service = AnalyticsService::new(Arc::new(MockDb::default()));
        let summary = service.demo_summary();
        assert!(summary.demo);
        assert!(summary.user_id.is_none());
    }

    #[test]
    fn engagement_score_is_capped() {
        assert_eq!(engagement_score(0, 50), 0.0);
        assert_eq!(engagement_score(1, 100), 10.0);
        assert!(engagement_score(10, 20) > 0.0);
    }
}
