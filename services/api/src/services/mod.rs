//! services/api/src/services/mod.rs
//!
//! The vertical services: one per content area. Each composes adapter calls
//! through the core ports, coerces the results into the typed wire response,
//! and records its artifact and analytics event as a best-effort post-commit
//! hook — the primary result is committed first, and a failed side write is
//! observable only in the logs, never in the operation's return value.

pub mod analytics;
pub mod food;
pub mod recommendations;
pub mod story;
pub mod travel;

#[cfg(test)]
pub(crate) mod test_support;

use culturo_core::domain::{AnalyticsEvent, NewArtifact};
use culturo_core::ports::DatabaseService;
use std::sync::Arc;
use tracing::warn;

/// Fires the post-commit side writes for a completed vertical operation.
/// Failures are logged and swallowed.
pub(crate) fn spawn_post_commit(
    db: Arc<dyn DatabaseService>,
    artifact: Option<NewArtifact>,
    event: AnalyticsEvent,
) {
    tokio::spawn(async move {
        if let Some(artifact) = artifact {
            if let Err(err) = db.save_artifact(artifact).await {
                warn!(error = %err, "failed to persist artifact");
            }
        }
        if let Err(err) = db.record_event(event).await {
            warn!(error = %err, "failed to record analytics event");
        }
    });
}
