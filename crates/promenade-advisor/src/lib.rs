//! Insight advisor for the Promenade simulation.
//!
//! Turns the current month, hour, and crowd size into two sentences of
//! advice from an LLM. Requests are debounced and fire-and-forget; results
//! land in an [`AdvisorySlot`] that the observer reads and the tick loop
//! never touches. Every failure, including a missing API key, degrades to a
//! fixed fallback string or to no request at all.
//!
//! # Modules
//!
//! - [`config`] -- Backend selection and API key lookup
//! - [`llm`] -- `OpenAI`-compatible and Anthropic HTTP backends
//! - [`prompt`] -- `minijinja` prompt rendering
//! - [`slot`] -- Generation-guarded advisory state
//! - [`dispatcher`] -- Debounce loop and the [`AdvisorHandle`]
//! - [`error`] -- Advisor error type

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod slot;

pub use config::{AdvisorConfig, BackendType, LlmBackendConfig};
pub use dispatcher::{AdvisorHandle, AdvisoryRequest, spawn_advisor};
pub use error::AdvisorError;
pub use llm::{AdviceBackend, LlmBackend, create_backend};
pub use prompt::{PromptEngine, RenderedPrompt};
pub use slot::{Advisory, AdvisorySlot, AdvisorySnapshot, FALLBACK_ADVICE, PENDING_ADVICE};
