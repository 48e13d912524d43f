//! Observer server for the Promenade simulation.
//!
//! An Axum HTTP server that is the simulation's display surface and control
//! surface at once:
//!
//! - **`WebSocket` endpoint** (`/ws/frames`) streaming one frame per tick
//!   via [`tokio::sync::broadcast`]
//! - **REST endpoints** for the world, the latest frame, the parameters,
//!   the advisory, and pause/resume
//! - **Canvas client** (`GET /`) that draws dots or the heatmap and drives
//!   the parameter endpoint from its sliders
//!
//! The engine publishes frames from the tick loop with
//! [`AppState::publish`], which never blocks. Handlers only read snapshots,
//! except `POST /api/params` and the pause controls, which go through
//! [`ParameterControl`](promenade_core::ParameterControl).

pub mod error;
pub mod frame;
pub mod handlers;
pub mod heatmap;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use frame::{AgentDot, FrameBroadcast, FrameMetrics};
pub use heatmap::HeatmapGrid;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, spawn_observer};
pub use state::{AppState, ObserverSnapshot, WorldView};
