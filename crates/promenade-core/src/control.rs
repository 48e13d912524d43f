//! Shared control state between the control surface and the tick loop.
//!
//! The observer's REST handlers write parameter changes here; the frame
//! runner reads a snapshot once per tick. Parameters live in a
//! [`tokio::sync::watch`] cell so readers never block writers. Pause and
//! stop use atomics with a [`Notify`] to wake the runner.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::{Notify, watch};
use tracing::info;

use crate::params::{ParamsError, ParamsUpdate, SimulationParams};

/// Parameter cell plus run controls, shared behind an `Arc`.
#[derive(Debug)]
pub struct ParameterControl {
    /// Authoritative parameters.
    params: watch::Sender<SimulationParams>,

    /// Bumped on every accepted change.
    revision: AtomicU64,

    /// Whether the frame loop should hold.
    paused: AtomicBool,

    /// Wakes the frame loop on resume or stop.
    wake: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,
}

impl ParameterControl {
    /// Create a control cell holding `initial`.
    pub fn new(initial: SimulationParams) -> Self {
        let (params, _rx) = watch::channel(initial);
        Self {
            params,
            revision: AtomicU64::new(0),
            paused: AtomicBool::new(false),
            wake: Notify::new(),
            stop_requested: AtomicBool::new(false),
        }
    }

    // -----------------------------------------------------------------------
    // Parameters
    // -----------------------------------------------------------------------

    /// Snapshot of the current parameters.
    pub fn params(&self) -> SimulationParams {
        *self.params.borrow()
    }

    /// Number of accepted changes since startup.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Apply a partial update. Returns the parameters now in effect.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] and leaves the parameters untouched if any
    /// field is out of range.
    pub fn update(&self, update: &ParamsUpdate) -> Result<SimulationParams, ParamsError> {
        let current = self.params();
        let next = update.apply(&current)?;
        if next != current {
            self.params.send_replace(next);
            let rev = self.revision.fetch_add(1, Ordering::AcqRel).saturating_add(1);
            info!(
                season = next.season.name(),
                hour = next.hour(),
                display_mode = ?next.display_mode,
                revision = rev,
                "parameters updated"
            );
        }
        Ok(next)
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether the frame loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Hold the frame loop before its next tick.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
        info!("simulation paused");
    }

    /// Release a paused frame loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake.notify_waiters();
        info!("simulation resumed");
    }

    /// Wait while paused. Returns at once if not paused or if a stop has
    /// been requested.
    pub async fn wait_if_paused(&self) {
        loop {
            let notified = self.wake.notified();
            if !self.is_paused() || self.is_stop_requested() {
                return;
            }
            notified.await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop of the frame loop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_waiters();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use promenade_types::{DisplayMode, Season};

    use super::*;

    #[test]
    fn update_applies_and_bumps_revision() {
        let control = ParameterControl::new(SimulationParams::default());
        let update = ParamsUpdate {
            season: Some(7),
            hour: Some(19),
            display_mode: Some(DisplayMode::Heatmap),
        };
        let next = control.update(&update).unwrap();
        assert_eq!(next.season, Season::August);
        assert_eq!(control.params(), next);
        assert_eq!(control.revision(), 1);
    }

    #[test]
    fn no_op_update_keeps_revision() {
        let control = ParameterControl::new(SimulationParams::default());
        control.update(&ParamsUpdate::default()).unwrap();
        assert_eq!(control.revision(), 0);
    }

    #[test]
    fn rejected_update_leaves_params() {
        let control = ParameterControl::new(SimulationParams::default());
        let before = control.params();
        let err = control.update(&ParamsUpdate {
            hour: Some(24),
            ..ParamsUpdate::default()
        });
        assert!(err.is_err());
        assert_eq!(control.params(), before);
        assert_eq!(control.revision(), 0);
    }

    #[tokio::test]
    async fn resume_releases_waiter() {
        let control = Arc::new(ParameterControl::new(SimulationParams::default()));
        control.pause();
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { control.wait_if_paused().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());
        control.resume();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn stop_releases_paused_waiter() {
        let control = Arc::new(ParameterControl::new(SimulationParams::default()));
        control.pause();
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { control.wait_if_paused().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        control.request_stop();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(control.is_stop_requested());
    }
}
