//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can stop startup or the frame
//! loop, so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: promenade_core::config::ConfigError,
    },

    /// The configured starting month or hour is out of range.
    #[error("initial parameters: {source}")]
    Params {
        /// The underlying parameter error.
        #[from]
        source: promenade_core::ParamsError,
    },

    /// Landmark network construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: promenade_world::WorldError,
    },

    /// The frame loop stopped on a tick error.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: promenade_core::runner::RunnerError,
    },

    /// Advisor setup failed.
    #[error("advisor error: {source}")]
    Advisor {
        /// The underlying advisor error.
        #[from]
        source: promenade_advisor::AdvisorError,
    },

    /// The observer server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying server error.
        #[from]
        source: promenade_observer::ServerError,
    },
}
