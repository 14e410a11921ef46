//! services/api/src/adapters/llm.rs
//!
//! This module contains the adapter for the LLM provider. It implements the
//! `LanguageModelService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use culturo_core::domain::LlmRequest;
use culturo_core::ports::{LanguageModelService, PortError, PortResult};
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `LanguageModelService` using an
/// OpenAI-compatible chat-completions API.
#[derive(Clone)]
pub struct OpenAiLlmAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiLlmAdapter {
    /// Creates a new `OpenAiLlmAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }

    async fn run_completion(&self, request: &LlmRequest) -> PortResult<String> {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.clone())
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.clone())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );

        let completion_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // The chat handle must outlive the future it produces.
        let chat = self.client.chat();
        let response = tokio::time::timeout(self.timeout, chat.create(completion_request))
            .await
            .map_err(|_| PortError::Timeout("language model call exceeded its budget".to_string()))?
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PortError::Upstream("LLM returned no choices".to_string()))?;
        choice
            .message
            .content
            .ok_or_else(|| PortError::Upstream("LLM response contained no text".to_string()))
    }
}

/// Strips markdown code fences the model sometimes wraps JSON in.
pub(crate) fn extract_json_payload(raw: &str) -> PortResult<Value> {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap();
    let candidate = fence
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
        .trim();

    serde_json::from_str::<Value>(candidate)
        .map_err(|e| PortError::Upstream(format!("LLM returned unparseable JSON: {}", e)))
}

//=========================================================================================
// `LanguageModelService` Trait Implementation
//=========================================================================================

#[async_trait]
impl LanguageModelService for OpenAiLlmAdapter {
    async fn complete(&self, request: &LlmRequest) -> PortResult<String> {
        self.run_completion(request).await
    }

    /// Produces a completion coerced into a JSON value at this boundary.
    /// Model output that does not parse is an upstream failure.
    async fn complete_json(&self, request: &LlmRequest) -> PortResult<Value> {
        let raw = self.run_completion(request).await?;
        extract_json_payload(&raw)
    }
}
