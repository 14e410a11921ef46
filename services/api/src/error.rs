//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its
//! mapping to HTTP responses.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use culturo_core::ports::PortError;
use serde::Serialize;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A malformed or missing request field. Always caller-fixable.
    #[error("Invalid value for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Missing, invalid, or expired credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The requested resource does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// An upstream adapter call failed or returned unparseable data.
    /// Safe to retry later; never caller-fixable.
    #[error("Upstream service unavailable: {0}")]
    Upstream(String),

    /// An upstream adapter call exceeded its budget.
    #[error("Upstream service timed out: {0}")]
    UpstreamTimeout(String),

    /// An error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// A standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors. Always logged with
    /// full context before leaving the process.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// The stable machine-readable kind carried in every error response.
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::Auth(_) => "auth_error",
            ApiError::NotFound(_) => "not_found",
            ApiError::Upstream(_) | ApiError::UpstreamTimeout(_) => "upstream_error",
            _ => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::UpstreamTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => ApiError::NotFound(what),
            PortError::Unauthorized => ApiError::Auth("invalid credentials".to_string()),
            // A single uniform kind regardless of which adapter failed, so
            // the internal topology never leaks to the client.
            PortError::Upstream(msg) => ApiError::Upstream(msg),
            PortError::Timeout(msg) => ApiError::UpstreamTimeout(msg),
            PortError::Unexpected(msg) => ApiError::Internal(msg),
        }
    }
}

/// The wire format for every error response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
        }
        let field = match &self {
            ApiError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };
        // Internal and upstream details stay in the logs; the client only
        // ever sees fixed copy for 5xx faults, so no adapter identity leaks.
        let message = match &self {
            ApiError::Database(_) | ApiError::Io(_) | ApiError::Internal(_) | ApiError::Config(_) => {
                "internal server error".to_string()
            }
            ApiError::Upstream(detail) => {
                tracing::warn!(detail = %detail, "upstream failure");
                "upstream service unavailable".to_string()
            }
            ApiError::UpstreamTimeout(detail) => {
                tracing::warn!(detail = %detail, "upstream timeout");
                "upstream service timed out".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: self.kind(),
            message,
            field,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn response_body(err: ApiError) -> Value {
        let response = err.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn upstream_responses_never_name_the_adapter() {
        let err: ApiError =
            PortError::Upstream("taste-graph returned status 500 Internal Server Error".into())
                .into();
        let body = response_body(err).await;
        assert_eq!(body["error"], "upstream_error");
        assert_eq!(body["message"], "upstream service unavailable");

        let err: ApiError = PortError::Timeout("taste-graph call timed out".into()).into();
        let body = response_body(err).await;
        assert_eq!(body["message"], "upstream service timed out");
    }

    #[tokio::test]
    async fn internal_responses_carry_generic_copy() {
        let err = ApiError::Internal("pool exhausted on replica 3".into());
        let body = response_body(err).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "internal server error");
    }

    #[test]
    fn validation_maps_to_400_and_names_the_field() {
        let err = ApiError::validation("destination", "must not be empty");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn upstream_failures_are_uniform() {
        let from_taste: ApiError = PortError::Upstream("taste graph 500".into()).into();
        let from_llm: ApiError = PortError::Upstream("llm refused".into()).into();
        assert_eq!(from_taste.kind(), "upstream_error");
        assert_eq!(from_llm.kind(), "upstream_error");
        assert_eq!(from_taste.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn timeouts_map_to_503() {
        let err: ApiError = PortError::Timeout("weather".into()).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind(), "upstream_error");
    }

    #[test]
    fn auth_and_not_found_statuses() {
        assert_eq!(
            ApiError::Auth("bad token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("user".into()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
