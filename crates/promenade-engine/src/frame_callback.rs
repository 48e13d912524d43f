//! Tick callback that feeds the observer and the advisor.
//!
//! After each tick the callback publishes a [`FrameBroadcast`] to the
//! observer and, when the month, hour, or target count has changed since
//! the last tick, queues an advisory request. Neither step can block the
//! frame loop.

use std::sync::Arc;

use promenade_advisor::{AdvisorHandle, AdvisoryRequest};
use promenade_core::runner::TickCallback;
use promenade_core::{SimulationState, TickSummary};
use promenade_observer::{AppState, FrameBroadcast};
use tracing::{debug, trace};

/// Bridges the frame loop to the observer and the advisor.
pub struct FrameCallback {
    state: Arc<AppState>,
    advisor: AdvisorHandle,
    last_scenario: Option<AdvisoryRequest>,
}

impl FrameCallback {
    /// Create a callback publishing to `state` and asking `advisor`.
    pub const fn new(state: Arc<AppState>, advisor: AdvisorHandle) -> Self {
        Self {
            state,
            advisor,
            last_scenario: None,
        }
    }

    /// The scenario to ask about, if it differs from the last one seen.
    fn scenario_change(&mut self, summary: &TickSummary) -> Option<AdvisoryRequest> {
        let scenario = AdvisoryRequest {
            season: summary.params.season,
            hour: summary.params.hour(),
            density: summary.target_count,
        };
        if self.last_scenario == Some(scenario) {
            return None;
        }
        self.last_scenario = Some(scenario);
        Some(scenario)
    }
}

impl TickCallback for FrameCallback {
    fn on_tick(&mut self, summary: &TickSummary, sim: &SimulationState) {
        let receivers = self
            .state
            .publish(FrameBroadcast::from_tick(summary, sim.tourists()));
        trace!(tick = summary.tick, receivers, "frame published");

        if let Some(request) = self.scenario_change(summary) {
            let queued = self.advisor.request(request);
            debug!(
                tick = summary.tick,
                season = %request.season,
                hour = request.hour,
                density = request.density,
                queued,
                "scenario changed"
            );
        }
    }
}
