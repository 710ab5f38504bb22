//! Chat-completion client seam and its HTTP implementation.
//!
//! # Responsibility
//! - Define the `CompletionClient` contract used by quote generation.
//! - Provide the reqwest-backed OpenAI-compatible client.
//!
//! # Invariants
//! - One request per call: no retries, no backoff.
//! - Any non-200 status or missing `choices[0].message.content` fails the
//!   call.
//! - The API key and generated text are never logged.

use crate::completion::prompt::{ChatCompletionRequest, QuotePrompt};
use async_trait::async_trait;
use log::{error, info};
use reqwest::StatusCode;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 100;

pub type CompletionResult<T> = Result<T, CompletionError>;

/// Failure of a single completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// No usable API key is configured.
    MissingApiKey,
    /// Connection, TLS or body read failure.
    Transport(String),
    /// Server answered with a non-200 status.
    Status { status: u16, message: String },
    /// Body is not JSON or lacks `choices[0].message.content`.
    InvalidResponse(String),
}

impl CompletionError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }

    /// Stable short code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "missing_api_key",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "http_status",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl Display for CompletionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "completion API key is not configured"),
            Self::Transport(message) => write!(f, "completion request failed: {message}"),
            Self::Status { status, message } if message.is_empty() => {
                write!(f, "completion API returned HTTP {status}")
            }
            Self::Status { status, message } => {
                write!(f, "completion API returned HTTP {status}: {message}")
            }
            Self::InvalidResponse(message) => {
                write!(f, "invalid completion response: {message}")
            }
        }
    }
}

impl Error for CompletionError {}

/// Produces raw completion text for a quote prompt.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &QuotePrompt) -> CompletionResult<String>;
}

/// Endpoint and sampling parameters for the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `None` keeps the HTTP client default.
    pub timeout: Option<Duration>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// OpenAI-compatible chat-completion client over reqwest.
pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    api_key: String,
    config: CompletionConfig,
}

impl OpenAiCompletionClient {
    pub fn new(api_key: impl Into<String>, config: CompletionConfig) -> CompletionResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    async fn send(&self, api_key: &str, request: &ChatCompletionRequest) -> CompletionResult<String> {
        let response = self
            .client
            .post(self.config.base_url.as_str())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| CompletionError::Transport(format!("failed to read body: {err}")))?;

        if status != StatusCode::OK {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        parse_completion_body(&body)
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(&self, prompt: &QuotePrompt) -> CompletionResult<String> {
        let api_key = self.api_key.trim();
        if api_key.is_empty() {
            return Err(CompletionError::MissingApiKey);
        }

        let started_at = Instant::now();
        info!(
            "event=completion_request module=completion status=start model={}",
            self.config.model
        );

        let request = ChatCompletionRequest::for_prompt(
            prompt,
            self.config.model.as_str(),
            self.config.temperature,
            self.config.max_tokens,
        );

        let result = self.send(api_key, &request).await;
        match &result {
            Ok(_) => info!(
                "event=completion_request module=completion status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=completion_request module=completion status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            ),
        }
        result
    }
}

/// Extracts `choices[0].message.content` from a 200 response body.
pub fn parse_completion_body(body: &str) -> CompletionResult<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|err| CompletionError::InvalidResponse(err.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            CompletionError::InvalidResponse("missing choices[0].message.content".to_string())
        })
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .and_then(|detail| detail.message)
        .unwrap_or_default()
}
