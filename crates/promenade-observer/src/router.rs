//! Axum router construction for the observer.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete router: canvas page, REST API, and frame socket.
///
/// CORS allows any origin so the canvas page can be served elsewhere
/// during development.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/frames", get(ws::ws_frames))
        .route("/api/world", get(handlers::get_world))
        .route("/api/frame", get(handlers::get_frame))
        .route(
            "/api/params",
            get(handlers::get_params).post(handlers::post_params),
        )
        .route("/api/advisory", get(handlers::get_advisory))
        .route("/api/control/pause", post(handlers::pause))
        .route("/api/control/resume", post(handlers::resume))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
