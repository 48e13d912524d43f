//! Engine binary for the Promenade simulation.
//!
//! Wires the frame loop to the observer server and the insight advisor,
//! then runs until Ctrl-C or the configured tick limit.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `PROMENADE_CONFIG` or `promenade-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build and validate the landmark network
//! 4. Create the parameter control and simulation state
//! 5. Start the insight advisor (or a disabled handle)
//! 6. Start the observer server
//! 7. Install the Ctrl-C handler
//! 8. Run the frame loop
//! 9. Log the result

mod error;
mod frame_callback;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use promenade_advisor::config::api_key_from_env;
use promenade_advisor::{
    AdvisorConfig, AdvisorHandle, AdvisorySlot, PromptEngine, create_backend, spawn_advisor,
};
use promenade_core::config::{AdvisorSettings, LogFormat, LoggingConfig};
use promenade_core::{ParameterControl, SimulationConfig, SimulationParams, SimulationState, runner};
use promenade_observer::{AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::frame_callback::FrameCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "promenade-config.yaml";

/// Application entry point.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration. Logging is not up yet, so errors surface
    //    through `main`'s return value.
    let config_path = config_path();
    let config = SimulationConfig::load_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        path = %config_path.display(),
        world_name = config.world.name,
        seed = config.world.seed,
        frame_interval_ms = config.world.frame_interval_ms,
        max_ticks = config.world.max_ticks,
        "promenade-engine starting"
    );

    // 3. Build the landmark network.
    let world = promenade_world::create_landmark_network()?;
    info!(
        landmarks = world.landmark_count(),
        paths = world.paths().len(),
        sunset = %world.sunset_landmark().id,
        "Landmark network ready"
    );

    // 4. Parameter control and simulation state.
    let initial = SimulationParams::from_config(&config.params)?;
    let control = Arc::new(ParameterControl::new(initial));
    info!(
        season = initial.season.name(),
        hour = initial.hour(),
        display_mode = ?initial.display_mode,
        "Initial parameters"
    );

    // 5. Insight advisor.
    let slot = Arc::new(AdvisorySlot::new());
    let advisor = start_advisor(&config.advisor, Arc::clone(&slot))?;

    // 6. Observer server.
    let app_state = Arc::new(AppState::new(&world, Arc::clone(&control), slot));
    let server_config = ServerConfig {
        host: config.observer.host.clone(),
        port: config.observer.port,
    };
    let (addr, observer) =
        promenade_observer::spawn_observer(&server_config, Arc::clone(&app_state)).await?;
    info!(url = %format!("http://{addr}/"), "Observer ready");

    let mut sim_state = SimulationState::new(world, &config);
    let mut callback = FrameCallback::new(app_state, advisor);

    // 7. Ctrl-C requests a clean stop.
    let stop = Arc::clone(&control);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping");
                stop.request_stop();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });

    // 8. Run the frame loop.
    let result = runner::run_frames(
        &mut sim_state,
        &control,
        &mut callback,
        Duration::from_millis(config.world.frame_interval_ms),
        config.world.max_ticks,
    )
    .await?;

    // 9. Log results.
    runner::log_run_end(&result);
    observer.abort();
    info!("promenade-engine shutdown complete");

    Ok(())
}

/// `PROMENADE_CONFIG` if set, otherwise [`DEFAULT_CONFIG_PATH`].
fn config_path() -> PathBuf {
    std::env::var_os("PROMENADE_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let level = &logging.level;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Spawn the advisor task, or hand back a disabled handle when there is no
/// API key or the advisor is switched off.
fn start_advisor(
    settings: &AdvisorSettings,
    slot: Arc<AdvisorySlot>,
) -> Result<AdvisorHandle, EngineError> {
    let config = AdvisorConfig::from_parts(
        settings.enabled,
        &settings.backend,
        &settings.api_url,
        &settings.model,
        settings.debounce_ms,
        api_key_from_env(),
    )?;
    let Some(backend) = config.backend.as_ref() else {
        return Ok(AdvisorHandle::disabled(slot));
    };

    let prompts = match std::env::var_os("ADVISOR_TEMPLATES_DIR") {
        Some(dir) => {
            info!(dir = %Path::new(&dir).display(), "Loading advisor templates");
            PromptEngine::from_dir(Path::new(&dir))?
        }
        None => PromptEngine::new()?,
    };
    info!(
        model = backend.model,
        url = backend.api_url,
        "Advisor backend configured"
    );
    Ok(spawn_advisor(create_backend(backend), prompts, config.debounce, slot))
}
