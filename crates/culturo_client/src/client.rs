//! The single point of HTTP egress for the frontend. Attaches the stored
//! bearer token, clears it on a 401, and turns every failure into
//! normalized UI copy.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::auth::TokenStore;
use crate::failure::{normalize_failure, ApiFailure, GENERIC_MESSAGE};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClientError {
    /// The server rejected the token; the stored token has already been
    /// cleared and the caller should redirect to sign-in.
    #[error("session expired")]
    SessionExpired,
    /// Any other failure, already normalized into UI copy.
    #[error("{0}")]
    Request(String),
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.http.get(self.url(path));
        self.execute(request).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(request).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let request = self.http.put(self.url(path)).json(body);
        self.execute(request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        if let Some(token) = self.tokens.load() {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                return Err(ClientError::Request(normalize_failure(&ApiFailure::Timeout)))
            }
            Err(err) => {
                return Err(ClientError::Request(normalize_failure(
                    &ApiFailure::Network(err.to_string()),
                )))
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.clear();
            return Err(ClientError::SessionExpired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let failure = ApiFailure::Status {
                code: status.as_u16(),
                server_message: extract_server_message(&body),
            };
            return Err(ClientError::Request(normalize_failure(&failure)));
        }

        response.json::<T>().await.map_err(|err| {
            warn!(error = %err, "response body did not match the expected shape");
            ClientError::Request(GENERIC_MESSAGE.to_string())
        })
    }
}

/// Pulls the human-readable `message` out of an error body, if the server
/// sent one.
fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
