//! LLM backends that turn a rendered scenario prompt into advice text.
//!
//! [`AdviceBackend`] is the seam the dispatcher is generic over, so tests
//! can substitute a scripted backend. [`LlmBackend`] is the production
//! implementation; it speaks either the chat completions dialect or the
//! Messages dialect over one shared HTTP path.

use std::fmt::Display;
use std::future::Future;

use serde_json::Value;

use crate::config::{BackendType, LlmBackendConfig};
use crate::error::AdvisorError;
use crate::prompt::RenderedPrompt;

/// Upper bound on generated tokens; two sentences fit comfortably.
const MAX_TOKENS: u32 = 160;

/// Value of the `anthropic-version` header.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Something that can answer a rendered prompt with plain text.
pub trait AdviceBackend: Send + Sync + 'static {
    /// Send the prompt and return the model's reply.
    fn complete(
        &self,
        prompt: &RenderedPrompt,
    ) -> impl Future<Output = Result<String, AdvisorError>> + Send;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// The local-guide model, reached over HTTP.
pub enum LlmBackend {
    /// Chat completions dialect.
    OpenAi(OpenAiBackend),
    /// Messages dialect.
    Anthropic(AnthropicBackend),
}

impl AdviceBackend for LlmBackend {
    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AdvisorError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::OpenAi(_) => "openai-compatible",
            Self::Anthropic(_) => "anthropic",
        }
    }
}

/// Where to send requests and how to sign them.
struct Endpoint {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Endpoint {
    fn new(config: &LlmBackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}/{path}", self.api_url))
    }
}

/// Talks to `{api_url}/chat/completions` with a bearer token. Covers
/// `OpenAI`, `DeepSeek`, and Ollama.
pub struct OpenAiBackend(Endpoint);

impl OpenAiBackend {
    /// Build from resolved backend settings.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self(Endpoint::new(config))
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AdvisorError> {
        let body = serde_json::json!({
            "model": self.0.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ],
            "temperature": 0.7,
            "max_tokens": MAX_TOKENS
        });
        let request = self
            .0
            .post("chat/completions")
            .bearer_auth(&self.0.api_key)
            .json(&body);
        let reply = send_json("OpenAI", request).await?;
        extract_openai_content(&reply)
    }
}

/// Talks to `{api_url}/messages`, signing with the `x-api-key` header.
/// The system prompt travels as a top-level field.
pub struct AnthropicBackend(Endpoint);

impl AnthropicBackend {
    /// Build from resolved backend settings.
    pub fn new(config: &LlmBackendConfig) -> Self {
        Self(Endpoint::new(config))
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AdvisorError> {
        let body = serde_json::json!({
            "model": self.0.model,
            "max_tokens": MAX_TOKENS,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });
        let request = self
            .0
            .post("messages")
            .header("x-api-key", &self.0.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        let reply = send_json("Anthropic", request).await?;
        extract_anthropic_content(&reply)
    }
}

fn failure(dialect: &str, stage: &str, detail: impl Display) -> AdvisorError {
    AdvisorError::Backend(format!("{dialect} {stage}: {detail}"))
}

/// Send `request` and decode a successful reply as JSON. Any transport
/// error, non-2xx status, or undecodable body is an error.
async fn send_json(dialect: &str, request: reqwest::RequestBuilder) -> Result<Value, AdvisorError> {
    let response = request
        .send()
        .await
        .map_err(|e| failure(dialect, "request failed", e))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        let stage = format!("returned {status}");
        return Err(failure(dialect, &stage, detail));
    }

    response
        .json()
        .await
        .map_err(|e| failure(dialect, "reply unreadable", e))
}

/// Trimmed, non-empty reply text, or an error naming the missing field.
fn reply_text(text: Option<&str>, dialect: &str, field: &str) -> Result<String, AdvisorError> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .ok_or_else(|| failure(dialect, "reply has no text at", field))
}

fn extract_openai_content(json: &Value) -> Result<String, AdvisorError> {
    let text = json
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str);
    reply_text(text, "OpenAI", "choices[0].message.content")
}

fn extract_anthropic_content(json: &Value) -> Result<String, AdvisorError> {
    let text = json.pointer("/content/0/text").and_then(Value::as_str);
    reply_text(text, "Anthropic", "content[0].text")
}

/// Create an LLM backend from configuration.
pub fn create_backend(config: &LlmBackendConfig) -> LlmBackend {
    match config.backend_type {
        BackendType::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(config)),
        BackendType::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(config)),
    }
}
