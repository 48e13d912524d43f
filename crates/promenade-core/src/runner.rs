//! Frame-paced simulation loop.
//!
//! [`run_frames`] plays the role of a display refresh: it fires once per
//! frame interval, reads the current parameters from the shared
//! [`ParameterControl`], runs exactly one [`run_tick`], and hands the result
//! to a [`TickCallback`] for publishing. It honors pause, stop, and an
//! optional tick limit.
//!
//! [`run_ticks`] is the same loop without a clock, for headless runs.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::control::ParameterControl;
use crate::params::SimulationParams;
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// [`ParameterControl::request_stop`] was called.
    StopRequested,
    /// The configured tick limit was reached.
    MaxTicksReached,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunResult {
    /// The reason the loop ended.
    pub end_reason: RunEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Number of ticks executed by this run.
    pub total_ticks: u64,
}

/// Called after each tick completes.
///
/// The engine uses this to build and broadcast render frames.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A callback that does nothing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run one tick per frame until stopped or `max_ticks` (0 = unlimited)
/// ticks have run.
///
/// Late frames are skipped rather than bunched, so a slow tick never
/// causes a burst of catch-up ticks.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails. The failure is logged first.
pub async fn run_frames(
    state: &mut SimulationState,
    control: &Arc<ParameterControl>,
    callback: &mut dyn TickCallback,
    frame_interval: Duration,
    max_ticks: u64,
) -> Result<RunResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        frame_interval_ms = u64::try_from(frame_interval.as_millis()).unwrap_or(u64::MAX),
        max_ticks,
        "Frame loop starting"
    );

    loop {
        if control.is_paused() && !control.is_stop_requested() {
            info!("Frame loop paused, waiting for resume...");
            control.wait_if_paused().await;
            frames.reset();
        }

        if control.is_stop_requested() {
            info!(total_ticks, "Stop requested");
            return Ok(RunResult {
                end_reason: RunEndReason::StopRequested,
                final_summary: last_summary,
                total_ticks,
            });
        }

        frames.tick().await;

        let params = control.params();
        let summary = tick::run_tick(state, &params).inspect_err(|e| {
            error!(error = %e, tick = state.tick, "Tick failed, stopping frame loop");
        })?;
        total_ticks = total_ticks.saturating_add(1);

        callback.on_tick(&summary, state);

        if max_ticks > 0 && total_ticks >= max_ticks {
            info!(tick = summary.tick, max_ticks, "Tick limit reached");
            return Ok(RunResult {
                end_reason: RunEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);
    }
}

/// Run `ticks` ticks back to back under fixed parameters.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub fn run_ticks(
    state: &mut SimulationState,
    params: &SimulationParams,
    ticks: u64,
    callback: &mut dyn TickCallback,
) -> Result<RunResult, RunnerError> {
    let mut final_summary = None;
    let mut total_ticks: u64 = 0;
    while total_ticks < ticks {
        let summary = tick::run_tick(state, params)?;
        callback.on_tick(&summary, state);
        total_ticks = total_ticks.saturating_add(1);
        final_summary = Some(summary);
    }
    Ok(RunResult {
        end_reason: RunEndReason::MaxTicksReached,
        final_summary,
        total_ticks,
    })
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_agents_alive = result.final_summary.as_ref().map(|s| s.agents_alive),
        "Simulation ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use promenade_types::DisplayMode;
    use promenade_world::create_landmark_network;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::params::ParamsUpdate;

    #[derive(Default)]
    struct Recorder {
        targets: Vec<u32>,
    }

    impl TickCallback for Recorder {
        fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
            self.targets.push(summary.target_count);
        }
    }

    fn state() -> SimulationState {
        let world = create_landmark_network().unwrap();
        SimulationState::new(world, &SimulationConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_tick_limit() {
        let mut s = state();
        let control = Arc::new(ParameterControl::new(SimulationParams::default()));
        let mut cb = Recorder::default();
        let result = run_frames(&mut s, &control, &mut cb, Duration::from_millis(16), 5)
            .await
            .unwrap();
        assert_eq!(result.end_reason, RunEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(cb.targets.len(), 5);
        assert_eq!(result.final_summary.unwrap().tick, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_request_ends_loop() {
        let mut s = state();
        let control = Arc::new(ParameterControl::new(SimulationParams::default()));
        control.request_stop();
        let mut cb = NoOpCallback;
        let result = run_frames(&mut s, &control, &mut cb, Duration::from_millis(16), 0)
            .await
            .unwrap();
        assert_eq!(result.end_reason, RunEndReason::StopRequested);
        assert_eq!(result.total_ticks, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn parameter_changes_apply_on_next_tick() {
        struct ChangeAfterFirst {
            control: Arc<ParameterControl>,
            targets: Vec<u32>,
        }
        impl TickCallback for ChangeAfterFirst {
            fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
                self.targets.push(summary.target_count);
                if self.targets.len() == 1 {
                    let update = ParamsUpdate {
                        season: Some(0),
                        hour: Some(12),
                        display_mode: Some(DisplayMode::Heatmap),
                    };
                    self.control.update(&update).unwrap();
                }
            }
        }

        let mut s = state();
        let params = SimulationParams::new(7, 19, DisplayMode::Dots).unwrap();
        let control = Arc::new(ParameterControl::new(params));
        let mut cb = ChangeAfterFirst {
            control: Arc::clone(&control),
            targets: Vec::new(),
        };
        run_frames(&mut s, &control, &mut cb, Duration::from_millis(16), 3)
            .await
            .unwrap();
        assert_eq!(cb.targets, vec![720, 40, 40]);
        assert_eq!(s.population.len(), 40);
    }

    #[test]
    fn headless_run_counts_ticks() {
        let mut s = state();
        let params = SimulationParams::default();
        let result = run_ticks(&mut s, &params, 10, &mut NoOpCallback).unwrap();
        assert_eq!(result.total_ticks, 10);
        assert_eq!(s.tick, 10);
    }
}
