//! REST endpoint handlers for the observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Canvas client |
//! | `GET` | `/api/world` | Landmarks and paths |
//! | `GET` | `/api/frame` | Latest frame |
//! | `GET` | `/api/params` | Current parameters |
//! | `POST` | `/api/params` | Change season, hour, or display mode |
//! | `GET` | `/api/advisory` | Latest advisory |
//! | `POST` | `/api/control/pause` | Pause the frame loop |
//! | `POST` | `/api/control/resume` | Resume the frame loop |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{Html, IntoResponse};
use promenade_core::{ParameterControl, ParamsUpdate, SimulationParams};
use promenade_types::DisplayMode;
use serde::Serialize;

use crate::error::ObserverError;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Parameters as reported to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ParamsView {
    /// Month index, 0 = January.
    pub season: u8,
    /// Month name.
    pub season_name: &'static str,
    /// Hour of day.
    pub hour: u8,
    /// Current display mode.
    pub display_mode: DisplayMode,
    /// Whether the hour falls in daylight.
    pub is_daytime: bool,
    /// Whether the hour is golden hour.
    pub is_golden_hour: bool,
    /// Number of accepted changes so far.
    pub revision: u64,
    /// Whether the frame loop is paused.
    pub paused: bool,
}

impl ParamsView {
    fn new(params: SimulationParams, control: &ParameterControl) -> Self {
        Self {
            season: params.season.index(),
            season_name: params.season.name(),
            hour: params.hour(),
            display_mode: params.display_mode,
            is_daytime: params.is_daytime(),
            is_golden_hour: params.is_golden_hour(),
            revision: control.revision(),
            paused: control.is_paused(),
        }
    }
}

/// Response body for the pause and resume endpoints.
#[derive(Debug, Serialize)]
struct ControlResponse {
    ok: bool,
    paused: bool,
    message: &'static str,
}

/// Serve the canvas client.
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// Landmarks, paths, and plane size.
pub async fn get_world(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.world.as_ref().clone())
}

/// The most recent frame.
///
/// Returns `404` until the first tick has run.
pub async fn get_frame(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let snapshot = state.snapshot.read().await;
    let frame = snapshot
        .latest_frame
        .as_ref()
        .ok_or_else(|| ObserverError::NotFound("no frame yet".to_owned()))?;
    Ok(Json(frame.as_ref().clone()))
}

/// Current parameters.
pub async fn get_params(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let params = state.control.params();
    Json(ParamsView::new(params, &state.control))
}

/// Apply a partial parameter change.
///
/// Out-of-range values and malformed bodies return `400` and leave the
/// parameters unchanged.
pub async fn post_params(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ParamsUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ObserverError> {
    let Json(update) = payload.map_err(|e| ObserverError::InvalidParams(e.body_text()))?;
    let params = state
        .control
        .update(&update)
        .map_err(|e| ObserverError::InvalidParams(e.to_string()))?;
    Ok(Json(ParamsView::new(params, &state.control)))
}

/// The advisory slot.
pub async fn get_advisory(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.advisory.current().await)
}

/// Pause the frame loop. Tourists freeze in place.
pub async fn pause(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.control.pause();
    Json(ControlResponse {
        ok: true,
        paused: true,
        message: "Simulation paused",
    })
}

/// Resume the frame loop.
pub async fn resume(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.control.resume();
    Json(ControlResponse {
        ok: true,
        paused: false,
        message: "Simulation resumed",
    })
}
