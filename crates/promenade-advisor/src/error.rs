//! Error types for the insight advisor.
//!
//! None of these ever reach a user. The dispatcher logs them and shows the
//! fallback advisory instead.

/// Errors that can occur while producing an advisory.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// An LLM backend returned an error or was unreachable.
    #[error("LLM backend error: {0}")]
    Backend(String),

    /// Failed to load or render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// Advisor configuration is invalid.
    #[error("config error: {0}")]
    Config(String),
}
