//! Generation Provider
//!
//! OpenAI-compatible Chat Completions transport with secure API key
//! handling. Every supported endpoint speaks this wire format, so one
//! provider covers all presets.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ApiConfig;
use crate::constants::network;
use crate::types::{DocweaveError, Result};

/// One fully resolved completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    /// Response token ceiling from the budget check
    pub max_tokens: usize,
    pub temperature: f32,
}

/// Transport seam for docstring generation.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Request one completion and return the raw message content.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    fn name(&self) -> &str;

    fn model(&self) -> &str;
}

pub type SharedProvider = Arc<dyn GenerationProvider>;

// =============================================================================
// OpenAI-compatible Provider
// =============================================================================

/// Chat Completions client for any OpenAI-compatible endpoint.
pub struct OpenAiCompatProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiCompatProvider {
    pub fn new(api: &ApiConfig, model: impl Into<String>) -> Result<Self> {
        let api_key = api.api_key.clone().ok_or_else(|| {
            DocweaveError::Config(
                "API key not found. Use --api-key, DOCWEAVE_API_KEY, or a config file".to_string(),
            )
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(network::DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| DocweaveError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        })
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: Some(request.max_tokens),
        }
    }
}

#[async_trait]
impl GenerationProvider for OpenAiCompatProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_request(request);

        debug!(
            "Requesting completion (model: {}, max_tokens: {})",
            self.model, request.max_tokens
        );

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DocweaveError::Provider(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocweaveError::Provider(format!(
                "API error ({}): {}",
                status, body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| DocweaveError::Provider(format!("Failed to parse response: {}", e)))?;

        let content = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| DocweaveError::Provider("No content in response".to_string()))?;

        Ok(content.clone())
    }

    fn name(&self) -> &str {
        "openai-compat"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
