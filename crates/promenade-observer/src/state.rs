//! Shared application state for the observer server.
//!
//! [`AppState`] holds the frame broadcast channel, the latest frame for
//! REST polling, a read-only view of the world, and handles to the two
//! pieces of live state the observer may touch: the parameter control and
//! the advisory slot.

use std::sync::Arc;

use promenade_advisor::AdvisorySlot;
use promenade_core::ParameterControl;
use promenade_types::{Landmark, LandmarkId, Path};
use promenade_world::{PLANE_HEIGHT, PLANE_WIDTH, WorldMap};
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use crate::frame::FrameBroadcast;

/// Capacity of the frame broadcast channel.
///
/// A subscriber more than this many frames behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest frame.
const BROADCAST_CAPACITY: usize = 64;

/// Static description of the landmark network, served once per client.
#[derive(Debug, Clone, Serialize)]
pub struct WorldView {
    /// Plane width.
    pub width: f64,
    /// Plane height.
    pub height: f64,
    /// All landmarks.
    pub landmarks: Vec<Landmark>,
    /// All walking paths.
    pub paths: Vec<Path>,
    /// The golden-hour landmark.
    pub sunset_landmark: LandmarkId,
}

impl From<&WorldMap> for WorldView {
    fn from(world: &WorldMap) -> Self {
        Self {
            width: PLANE_WIDTH,
            height: PLANE_HEIGHT,
            landmarks: world.landmarks().to_vec(),
            paths: world.paths().to_vec(),
            sunset_landmark: world.sunset_landmark().id.clone(),
        }
    }
}

/// Latest state served by the REST endpoints.
#[derive(Debug, Clone, Default)]
pub struct ObserverSnapshot {
    /// Most recent frame, if any tick has run.
    pub latest_frame: Option<Arc<FrameBroadcast>>,
}

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for frames.
    pub tx: broadcast::Sender<Arc<FrameBroadcast>>,
    /// The latest frame (updated each tick).
    pub snapshot: Arc<RwLock<ObserverSnapshot>>,
    /// Landmarks and paths.
    pub world: Arc<WorldView>,
    /// Live simulation parameters and pause state.
    pub control: Arc<ParameterControl>,
    /// Latest advisory.
    pub advisory: Arc<AdvisorySlot>,
}

impl AppState {
    /// Create application state with no frame yet.
    pub fn new(
        world: &WorldMap,
        control: Arc<ParameterControl>,
        advisory: Arc<AdvisorySlot>,
    ) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(ObserverSnapshot::default())),
            world: Arc::new(WorldView::from(world)),
            control,
            advisory,
        }
    }

    /// Subscribe to the frame stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<FrameBroadcast>> {
        self.tx.subscribe()
    }

    /// Store `frame` as the latest and push it to every client.
    ///
    /// Never blocks. If a reader holds the snapshot lock the stored frame
    /// is left one tick behind. Returns the number of clients reached.
    pub fn publish(&self, frame: FrameBroadcast) -> usize {
        let frame = Arc::new(frame);
        if let Ok(mut snap) = self.snapshot.try_write() {
            snap.latest_frame = Some(Arc::clone(&frame));
        } else {
            debug!(tick = frame.tick, "snapshot busy, skipping store");
        }
        // Err only means nobody is subscribed.
        self.tx.send(frame).unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use promenade_core::{SimulationConfig, SimulationParams, SimulationState, run_tick};
    use promenade_world::create_landmark_network;

    use super::*;

    fn app_state(world: &WorldMap) -> AppState {
        AppState::new(
            world,
            Arc::new(ParameterControl::new(SimulationParams::default())),
            Arc::new(AdvisorySlot::new()),
        )
    }

    #[test]
    fn world_view_copies_the_network() {
        let world = create_landmark_network().unwrap();
        let view = WorldView::from(&world);
        assert_eq!(view.landmarks.len(), world.landmark_count());
        assert_eq!(view.paths.len(), world.paths().len());
        assert_eq!(view.sunset_landmark.as_str(), "sunset_point");
    }

    #[tokio::test]
    async fn publish_stores_and_broadcasts() {
        let world = create_landmark_network().unwrap();
        let app = app_state(&world);
        let mut rx = app.subscribe();

        let mut sim = SimulationState::new(world, &SimulationConfig::default());
        let summary = run_tick(&mut sim, &SimulationParams::default()).unwrap();
        let frame = FrameBroadcast::from_tick(&summary, sim.tourists());

        assert_eq!(app.publish(frame), 1);
        assert_eq!(rx.recv().await.unwrap().tick, 1);
        let snap = app.snapshot.read().await;
        assert_eq!(snap.latest_frame.as_ref().unwrap().tick, 1);
    }
}
