// ABOUTME: OpenAI-compatible chat completion provider for Groq, OpenAI, and local servers
// ABOUTME: One non-streaming request per call with optional JSON response format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # `OpenAI`-Compatible Provider
//!
//! Groq, `OpenAI` and local servers (Ollama, vLLM) all expose the same
//! `chat/completions` endpoint, so one client covers them with per-backend presets.
//!
//! ## Configuration
//!
//! - Groq: `GROQ_API_KEY`
//! - `OpenAI`: `OPENAI_API_KEY`
//! - Local: `LOCAL_LLM_BASE_URL`, `LOCAL_LLM_API_KEY` (optional)
//! - Any backend: `SPOTTER_LLM_MODEL` overrides the default model

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::errors::AppError;

/// Environment variable overriding the model for any backend
const MODEL_ENV: &str = "SPOTTER_LLM_MODEL";

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const LOCAL_BASE_URL: &str = "http://localhost:11434/v1";
const LOCAL_DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// The orchestrator enforces the real deadline; this only bounds a hung socket
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for WireMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// Configuration for one `OpenAI`-compatible backend
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <https://api.groq.com/openai/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging
    pub provider_name: String,
    /// Provider display name
    pub display_name: String,
    /// Capabilities of this backend
    pub capabilities: LlmCapabilities,
}

fn model_override(default: &str) -> String {
    env::var(MODEL_ENV)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn required_key(var: &str) -> Result<String, AppError> {
    env::var(var)
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::config(format!("Missing {var} environment variable")))
}

impl OpenAiCompatibleConfig {
    /// Groq preset reading `GROQ_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns an error if `GROQ_API_KEY` is not set
    pub fn groq_from_env() -> Result<Self, AppError> {
        Ok(Self {
            base_url: GROQ_BASE_URL.to_owned(),
            api_key: Some(required_key("GROQ_API_KEY")?),
            default_model: model_override(GROQ_DEFAULT_MODEL),
            provider_name: "groq".to_owned(),
            display_name: "Groq".to_owned(),
            capabilities: LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
        })
    }

    /// `OpenAI` preset reading `OPENAI_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is not set
    pub fn openai_from_env() -> Result<Self, AppError> {
        Ok(Self {
            base_url: OPENAI_BASE_URL.to_owned(),
            api_key: Some(required_key("OPENAI_API_KEY")?),
            default_model: model_override(OPENAI_DEFAULT_MODEL),
            provider_name: "openai".to_owned(),
            display_name: "OpenAI".to_owned(),
            capabilities: LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::JSON_MODE,
        })
    }

    /// Local server preset reading `LOCAL_LLM_BASE_URL` and `LOCAL_LLM_API_KEY`
    #[must_use]
    pub fn local_from_env() -> Self {
        Self {
            base_url: env::var("LOCAL_LLM_BASE_URL").unwrap_or_else(|_| LOCAL_BASE_URL.to_owned()),
            api_key: env::var("LOCAL_LLM_API_KEY").ok().filter(|k| !k.is_empty()),
            default_model: model_override(LOCAL_DEFAULT_MODEL),
            provider_name: "local".to_owned(),
            display_name: "Local LLM".to_owned(),
            capabilities: LlmCapabilities::SYSTEM_MESSAGES,
        }
    }
}

/// Chat completion client for an `OpenAI`-compatible backend
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn parse_error_response(&self, status: StatusCode, body: &str) -> AppError {
        let service = self.config.display_name.as_str();
        serde_json::from_str::<ErrorResponse>(body).map_or_else(
            |_| {
                AppError::external_service(
                    service,
                    format!("API error ({status}): {}", body.chars().take(200).collect::<String>()),
                )
            },
            |parsed| {
                let kind = parsed.error.error_type.unwrap_or_else(|| "unknown".to_owned());
                match status.as_u16() {
                    401 | 403 => AppError::config(format!(
                        "{service} rejected the API key: {}",
                        parsed.error.message
                    )),
                    429 => AppError::external_service(
                        service,
                        format!("Rate limit exceeded: {}", parsed.error.message),
                    ),
                    _ => AppError::external_service(service, format!("{kind} - {}", parsed.error.message)),
                }
            },
        )
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.config.provider_name
    }

    fn display_name(&self) -> &str {
        &self.config.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = %self.config.provider_name, model = %self.config.default_model))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = self.config.default_model.as_str();
        let json_mode = request.json_mode && self.config.capabilities.supports_json_mode();

        let body = CompletionRequest {
            model,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format: json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        debug!(messages = body.messages.len(), json_mode, "Sending chat completion request");

        let response = self
            .add_auth_header(self.client.post(self.api_url("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {e}", self.config.display_name);
                AppError::external_service(&self.config.display_name, format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::external_service(&self.config.display_name, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &text));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::external_service(&self.config.display_name, format!("Failed to parse response: {e}"))
        })?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(&self.config.display_name, "API returned no choices")
        })?;
        let content = choice.message.content.unwrap_or_default();

        debug!(
            chars = content.len(),
            finish_reason = ?choice.finish_reason,
            "Received chat completion"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model,
            usage: parsed.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self), fields(provider = %self.config.provider_name))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let response = self
            .add_auth_header(self.client.get(self.api_url("models")))
            .send()
            .await
            .map_err(|e| {
                AppError::external_service(&self.config.display_name, format!("Health check failed: {e}"))
            })?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!(status = %response.status(), "Generative provider health check failed");
        }
        Ok(healthy)
    }
}
