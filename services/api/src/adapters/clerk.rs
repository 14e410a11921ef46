//! services/api/src/adapters/clerk.rs
//!
//! Adapter for the external auth provider. Implements the
//! `AuthProviderService` port: the backend's sole responsibility is
//! verifying the bearer token per request; issuing and rotating tokens
//! stays with the provider.

use async_trait::async_trait;
use culturo_core::domain::AuthClaims;
use culturo_core::ports::{AuthProviderService, PortError, PortResult};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct VerifiedTokenBody {
    #[serde(alias = "sub", alias = "user_id")]
    subject: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// An adapter that verifies bearer tokens with the Clerk API.
#[derive(Clone)]
pub struct ClerkAdapter {
    client: Client,
    base_url: String,
    secret_key: Option<String>,
}

impl ClerkAdapter {
    pub fn new(base_url: String, secret_key: Option<String>, timeout: Duration) -> PortResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            secret_key,
        })
    }
}

#[async_trait]
impl AuthProviderService for ClerkAdapter {
    async fn verify_token(&self, token: &str) -> PortResult<AuthClaims> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or_else(|| PortError::Upstream("auth provider key not configured".to_string()))?;

        let response = self
            .client
            .post(format!("{}/tokens/verify", self.base_url))
            .bearer_auth(secret_key)
            .json(&json!({ "token": token }))
            .send()
            .await
            .map_err(map_reqwest)?;

        match response.status() {
            status if status.is_success() => {}
            // The provider rejecting the token is a caller problem, not an
            // upstream outage.
            StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                return Err(PortError::Unauthorized)
            }
            status => {
                return Err(PortError::Upstream(format!(
                    "auth provider returned status {}",
                    status
                )))
            }
        }

        let body: VerifiedTokenBody = response.json().await.map_err(map_reqwest)?;
        Ok(AuthClaims {
            subject: body.subject,
            email: body.email,
            display_name: body.name,
        })
    }
}

fn map_reqwest(err: reqwest::Error) -> PortError {
    if err.is_timeout() {
        PortError::Timeout("auth provider call timed out".to_string())
    } else {
        PortError::Upstream(format!("auth provider request failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_token_body_accepts_sub_alias() {
        let body: VerifiedTokenBody =
            serde_json::from_str(r#"{"sub": "user_2abc", "email": "a@b.c"}"#).unwrap();
        assert_eq!(body.subject, "user_2abc");
        assert_eq!(body.email.as_deref(), Some("a@b.c"));
    }
}
