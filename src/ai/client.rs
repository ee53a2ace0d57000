// ABOUTME: HTTP client for the OpenAI-compatible recipe generation endpoint
// ABOUTME: Holds the API key server-side and applies connect/request timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::ai::prompts;
use crate::config::AiConfig;
use crate::errors::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Connection timeout for the upstream endpoint
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Chat completion request structure
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Message structure for the chat API
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Chat completion response structure
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Error envelope returned by OpenAI-compatible endpoints
#[derive(Debug, Deserialize)]
struct ChatErrorResponse {
    error: ChatErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ChatErrorDetail {
    message: String,
}

/// Client for the configured recipe-generation endpoint
pub struct RecipeAiClient {
    client: Client,
    config: AiConfig,
}

impl RecipeAiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn new(config: AiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build AI HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Request recipe HTML for the given instructions and ingredient names
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceError` for network failures and timeouts,
    /// `ExternalAuthFailed` when the upstream rejects the key or quota,
    /// and `ExternalServiceError` for other upstream failures
    pub async fn generate_recipe_html(
        &self,
        instructions: &str,
        ingredients: &[String],
    ) -> Result<String, AppError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: prompts::SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompts::build_user_prompt(instructions, ingredients),
                },
            ],
            temperature: Some(0.7),
        };

        debug!(
            model = %self.config.model,
            ingredient_count = ingredients.len(),
            "Sending recipe generation request"
        );

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let mut http_request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(ref api_key) = self.config.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request.send().await.map_err(|e| {
            error!("AI request failed: {e}");
            if e.is_timeout() {
                AppError::external_service("AI", "Request timed out")
            } else {
                AppError::external_service("AI", format!("Failed to reach endpoint: {e}"))
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service("AI", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let chat_response: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            error!("Failed to parse AI response: {e} - body: {preview}");
            AppError::external_service("AI", format!("Failed to parse response: {e}"))
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::external_service("AI", "Endpoint returned no content"))
    }

    /// Map an upstream error status to a typed `AppError`
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<ChatErrorResponse>(body)
            .map_or_else(|_| body.chars().take(200).collect(), |r| r.error.message);

        match status.as_u16() {
            401 | 403 => AppError::external_auth_failed(format!(
                "AI endpoint rejected the configured key: {detail}"
            )),
            429 => AppError::external_auth_failed(format!("AI endpoint quota exceeded: {detail}")),
            _ => AppError::external_service("AI", format!("Upstream error ({status}): {detail}")),
        }
    }
}
