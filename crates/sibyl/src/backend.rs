//! OpenAI-compatible completion backend.
//!
//! Works against any endpoint that speaks the `/chat/completions` protocol:
//! the OpenAI API itself, Azure deployments, vLLM, Ollama, LocalAI.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::InsightError;

/// Default request timeout. Completions are seconds-scale; anything past
/// this is treated as a network failure.
const REQUEST_TIMEOUT_SECS: u64 = 90;

/// How much of an error body to carry into error messages.
const ERROR_BODY_LIMIT: usize = 300;

/// A single-turn completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
  /// System framing (role, tone, constraints).
  pub system: Option<String>,
  /// The user prompt.
  pub prompt: String,
  pub max_tokens: Option<u32>,
  pub temperature: Option<f32>,
}

impl CompletionRequest {
  pub fn new(prompt: impl Into<String>) -> Self {
    Self { system: None, prompt: prompt.into(), max_tokens: None, temperature: None }
  }

  pub fn with_system(mut self, system: impl Into<String>) -> Self {
    self.system = Some(system.into());
    self
  }

  pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = Some(max_tokens);
    self
  }

  pub fn with_temperature(mut self, temperature: f32) -> Self {
    self.temperature = Some(temperature.clamp(0.0, 2.0));
    self
  }
}

/// A completed generation.
#[derive(Debug, Clone)]
pub struct Completion {
  pub text: String,
  pub model: String,
}

/// Seam between insight orchestration and the actual LLM service, so tests
/// can substitute a scripted implementation.
#[async_trait]
pub trait Backend: Send + Sync {
  /// The model this backend generates with.
  fn model(&self) -> &str;

  /// Generate a completion for the request.
  async fn complete(&self, request: &CompletionRequest) -> Result<Completion, InsightError>;
}

pub struct OpenAiBackend {
  client: Client,
  base_url: String,
  api_key: String,
  model: String,
}

impl OpenAiBackend {
  /// Create a backend against an OpenAI-compatible base URL
  /// (e.g. `https://api.openai.com/v1`).
  pub fn new(
    base_url: &str,
    model: impl Into<String>,
    api_key: impl Into<String>,
  ) -> Result<Self, InsightError> {
    let parsed = Url::parse(base_url)
      .map_err(|e| InsightError::Config(format!("invalid base URL {base_url}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(InsightError::Config(format!("unsupported URL scheme: {}", parsed.scheme())));
    }

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client = Client::builder()
      .default_headers(headers)
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
      .build()
      .map_err(|e| InsightError::Config(format!("could not build HTTP client: {e}")))?;

    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      api_key: api_key.into(),
      model: model.into(),
    })
  }

  fn chat_url(&self) -> String {
    format!("{}/chat/completions", self.base_url)
  }

  fn auth_value(&self) -> String {
    format!("Bearer {}", self.api_key)
  }

  /// Probe the service without spending tokens.
  pub async fn is_available(&self) -> bool {
    let url = format!("{}/models", self.base_url);
    self
      .client
      .get(&url)
      .header(AUTHORIZATION, self.auth_value())
      .send()
      .await
      .map(|r| r.status().is_success())
      .unwrap_or(false)
  }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<WireMessage<'a>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  max_tokens: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  temperature: Option<f32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
  role: &'static str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
  #[serde(default)]
  model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

fn truncate_body(body: &str) -> String {
  let trimmed = body.trim();
  match trimmed.char_indices().nth(ERROR_BODY_LIMIT) {
    Some((cut, _)) => format!("{}...", &trimmed[..cut]),
    None => trimmed.to_string(),
  }
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
  headers
    .get(RETRY_AFTER)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.parse::<u64>().ok())
    .map(Duration::from_secs)
}

#[async_trait]
impl Backend for OpenAiBackend {
  fn model(&self) -> &str {
    &self.model
  }

  async fn complete(&self, request: &CompletionRequest) -> Result<Completion, InsightError> {
    let mut messages = Vec::new();
    if let Some(system) = &request.system {
      messages.push(WireMessage { role: "system", content: system.as_str() });
    }
    messages.push(WireMessage { role: "user", content: request.prompt.as_str() });

    let body = ChatRequest {
      model: &self.model,
      messages,
      max_tokens: request.max_tokens,
      temperature: request.temperature,
    };

    let response = self
      .client
      .post(self.chat_url())
      .header(AUTHORIZATION, self.auth_value())
      .json(&body)
      .send()
      .await
      .map_err(|e| InsightError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      let after = retry_after(response.headers());
      let text = response.text().await.unwrap_or_default();

      return Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InsightError::Auth(truncate_body(&text)),
        StatusCode::TOO_MANY_REQUESTS => InsightError::RateLimited { retry_after: after },
        _ => InsightError::Api { status: status.as_u16(), message: truncate_body(&text) },
      });
    }

    let parsed: ChatResponse =
      response.json().await.map_err(|e| InsightError::Malformed(e.to_string()))?;

    let model = parsed.model.unwrap_or_else(|| self.model.clone());
    let content = parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .unwrap_or_default();

    if content.trim().is_empty() {
      return Err(InsightError::EmptyResponse);
    }

    Ok(Completion { text: content, model })
  }
}
