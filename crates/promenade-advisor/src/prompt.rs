//! Prompt template loading and rendering via `minijinja`.
//!
//! The default templates are compiled into the binary. Operators can tune the
//! wording without recompiling by pointing [`PromptEngine::from_dir`] at a
//! directory holding their own `system.j2` and `scenario.j2`.

use std::fmt::Display;
use std::path::Path;

use minijinja::{Environment, context};

use crate::dispatcher::AdvisoryRequest;
use crate::error::AdvisorError;

const SYSTEM_TEMPLATE: &str = include_str!("../templates/system.j2");
const SCENARIO_TEMPLATE: &str = include_str!("../templates/scenario.j2");

/// Renders an [`AdvisoryRequest`] into a chat prompt.
#[derive(Debug)]
pub struct PromptEngine {
    env: Environment<'static>,
}

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    /// System message establishing the guide persona.
    pub system: String,
    /// User message describing the scenario.
    pub user: String,
}

impl PromptEngine {
    /// Create a prompt engine with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Template`] if a built-in template fails to
    /// parse.
    pub fn new() -> Result<Self, AdvisorError> {
        Self::from_sources(SYSTEM_TEMPLATE.to_owned(), SCENARIO_TEMPLATE.to_owned())
    }

    /// Create a prompt engine from `system.j2` and `scenario.j2` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Template`] if a file is missing or does not
    /// parse.
    pub fn from_dir(dir: &Path) -> Result<Self, AdvisorError> {
        let system = load_template(dir, "system.j2")?;
        let scenario = load_template(dir, "scenario.j2")?;
        Self::from_sources(system, scenario)
    }

    fn from_sources(system: String, scenario: String) -> Result<Self, AdvisorError> {
        let mut env = Environment::new();
        env.add_template_owned("system", system)
            .map_err(|e| template_error("bad system template", e))?;
        env.add_template_owned("scenario", scenario)
            .map_err(|e| template_error("bad scenario template", e))?;
        Ok(Self { env })
    }

    /// Render the prompt for one scenario.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Template`] if rendering fails.
    pub fn render(&self, request: &AdvisoryRequest) -> Result<RenderedPrompt, AdvisorError> {
        let ctx = context! {
            season => request.season.name(),
            hour => format!("{:02}:00", request.hour),
            density => request.density,
        };

        let system = self
            .env
            .get_template("system")
            .map_err(|e| template_error("missing system template", e))?
            .render(&ctx)
            .map_err(|e| template_error("system render failed", e))?;

        let user = self
            .env
            .get_template("scenario")
            .map_err(|e| template_error("missing scenario template", e))?
            .render(&ctx)
            .map_err(|e| template_error("scenario render failed", e))?;

        Ok(RenderedPrompt {
            system: system.trim().to_owned(),
            user: user.trim().to_owned(),
        })
    }
}

fn template_error(stage: &str, detail: impl Display) -> AdvisorError {
    AdvisorError::Template(format!("{stage}: {detail}"))
}

fn load_template(dir: &Path, filename: &str) -> Result<String, AdvisorError> {
    let path = dir.join(filename);
    std::fs::read_to_string(&path).map_err(|e| template_error(&path.display().to_string(), e))
}
