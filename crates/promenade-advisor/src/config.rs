//! Configuration types for the insight advisor.
//!
//! Connection settings come from the engine's YAML configuration; the API
//! key comes only from the `ADVISOR_API_KEY` environment variable. A missing
//! key disables the advisor instead of failing startup.

use std::time::Duration;

use tracing::warn;

use crate::error::AdvisorError;

/// Environment variable holding the advisor API key.
pub const API_KEY_VAR: &str = "ADVISOR_API_KEY";

/// Settled advisor configuration.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Backend to call, or `None` when the advisor is disabled.
    pub backend: Option<LlmBackendConfig>,
    /// Settling delay after the last request before calling the backend.
    pub debounce: Duration,
}

/// Configuration for a single LLM backend.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// Wire protocol.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

/// Supported LLM backend protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions (`OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

impl BackendType {
    /// Parse a backend name as written in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Config`] for an unknown name.
    pub fn parse(name: &str) -> Result<Self, AdvisorError> {
        match name.to_lowercase().as_str() {
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(AdvisorError::Config(format!("unknown backend: {other}"))),
        }
    }
}

impl AdvisorConfig {
    /// A configuration that never calls a backend.
    pub const fn disabled(debounce: Duration) -> Self {
        Self {
            backend: None,
            debounce,
        }
    }

    /// Assemble the configuration from its sources.
    ///
    /// Returns a disabled configuration (logging one warning) when the
    /// advisor is switched off or `api_key` is absent or blank.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Config`] if the backend name is unknown.
    pub fn from_parts(
        enabled: bool,
        backend_name: &str,
        api_url: &str,
        model: &str,
        debounce_ms: u64,
        api_key: Option<String>,
    ) -> Result<Self, AdvisorError> {
        let debounce = Duration::from_millis(debounce_ms);
        if !enabled {
            warn!("insight advisor disabled by configuration");
            return Ok(Self::disabled(debounce));
        }

        let backend_type = BackendType::parse(backend_name)?;
        let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
            warn!(
                var = API_KEY_VAR,
                "no advisor API key set, insight advisor disabled"
            );
            return Ok(Self::disabled(debounce));
        };

        Ok(Self {
            backend: Some(LlmBackendConfig {
                backend_type,
                api_url: api_url.trim_end_matches('/').to_owned(),
                api_key,
                model: model.to_owned(),
            }),
            debounce,
        })
    }

    /// Whether requests will actually be sent.
    pub const fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }
}

/// Read the API key from the environment.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_VAR).ok()
}
