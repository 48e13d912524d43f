//! Observer HTTP server lifecycle.
//!
//! [`spawn_observer`] binds first and only then moves serving onto a
//! background task, so a port clash fails engine startup instead of
//! surfacing later in a log line.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::router::build_router;
use crate::state::AppState;

/// Where the observer listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind (e.g. `127.0.0.1`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Errors that can occur when starting the observer.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),
}

async fn bind(config: &ServerConfig) -> Result<(TcpListener, SocketAddr), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;
    let local = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;
    Ok((listener, local))
}

/// Bind the observer, then serve it on a background task.
///
/// Returns the bound address (useful with port `0`) and the task handle.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address is invalid or taken.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<(SocketAddr, JoinHandle<()>), ServerError> {
    let (listener, addr) = bind(config).await?;
    info!(%addr, "observer listening");
    let router = build_router(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!(error = %e, "observer server stopped");
        }
    });
    Ok((addr, handle))
}
