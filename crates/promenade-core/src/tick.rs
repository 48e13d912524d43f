//! One simulation tick.
//!
//! [`run_tick`] is the whole engine step and nothing else. It does no
//! scheduling, no I/O and no waiting, so a test harness can drive it
//! directly. Each tick:
//!
//! 1. **Density** -- compute the target from the parameters in effect.
//! 2. **Reconcile** -- spawn or evict until the live count equals the target.
//! 3. **Motion** -- step every tourist, damped by the target count.
//! 4. **Metrics** -- derive the human-facing indicators from the target.
//!
//! Reconciliation always completes before motion starts, so freshly spawned
//! tourists take their first step in the tick they were born.

use promenade_types::Tourist;
use promenade_world::{WorldError, WorldMap};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::density::DensityPolicy;
use crate::metrics::CrowdMetrics;
use crate::motion::MotionRule;
use crate::params::SimulationParams;
use crate::population::{self, Population, PopulationError, SpawnRule};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Reconciliation failed.
    #[error("population error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: PopulationError,
    },

    /// A landmark lookup failed during motion.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Everything the tick loop mutates, plus the read-only world.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// The landmark network.
    pub world: WorldMap,
    /// Live tourists in creation order.
    pub population: Population,
    /// Month/hour to target count.
    pub density: DensityPolicy,
    /// Spawn placement and pacing.
    pub spawn: SpawnRule,
    /// Steering and damping.
    pub motion: MotionRule,
    /// Seeded source for every random choice.
    pub rng: StdRng,
    /// Last completed tick (0 before the first).
    pub tick: u64,
}

impl SimulationState {
    /// Fresh state with an empty population, seeded from configuration.
    pub fn new(world: WorldMap, config: &SimulationConfig) -> Self {
        Self {
            world,
            population: Population::new(),
            density: DensityPolicy::from_config(&config.density),
            spawn: SpawnRule::from_config(&config.motion),
            motion: MotionRule::from_config(&config.motion),
            rng: StdRng::seed_from_u64(config.world.seed),
            tick: 0,
        }
    }

    /// Live tourists, oldest first.
    pub fn tourists(&self) -> impl Iterator<Item = &Tourist> {
        self.population.iter()
    }
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed (first tick is 1).
    pub tick: u64,
    /// Parameters the tick ran with.
    pub params: SimulationParams,
    /// Density target for those parameters.
    pub target_count: u32,
    /// Live tourists at end of tick.
    pub agents_alive: u32,
    /// Tourists created during reconciliation.
    pub spawned: u32,
    /// Tourists evicted during reconciliation.
    pub removed: u32,
    /// Tourists that arrived and were retargeted.
    pub arrivals: u32,
    /// Tourists that stepped.
    pub moved: u32,
    /// Indicators for `target_count`.
    pub metrics: CrowdMetrics,
}

/// Advance the simulation by one tick under `params`.
///
/// # Errors
///
/// Returns [`TickError`] if the tick counter overflows or a landmark lookup
/// fails. The latter means the world and the population disagree, which a
/// validated [`WorldMap`] rules out.
pub fn run_tick(
    state: &mut SimulationState,
    params: &SimulationParams,
) -> Result<TickSummary, TickError> {
    let tick = state.tick.checked_add(1).ok_or(TickError::TickOverflow)?;

    // 1. Density
    let target_count = state.density.target_count(params);

    // 2. Reconcile
    let reconciled = population::reconcile(
        &mut state.population,
        target_count,
        &state.world,
        params,
        &state.spawn,
        &mut state.rng,
    )?;

    // 3. Motion
    let motion = state.motion.advance(
        &mut state.population,
        &state.world,
        params,
        target_count,
        &mut state.rng,
    )?;

    // 4. Metrics
    let metrics = CrowdMetrics::from_density(target_count);

    state.tick = tick;
    let summary = TickSummary {
        tick,
        params: *params,
        target_count,
        agents_alive: state.population.count(),
        spawned: reconciled.spawned,
        removed: reconciled.removed,
        arrivals: motion.arrivals,
        moved: motion.moved,
        metrics,
    };

    debug!(
        tick,
        season = params.season.name(),
        hour = params.hour(),
        target = target_count,
        alive = summary.agents_alive,
        spawned = summary.spawned,
        removed = summary.removed,
        arrivals = summary.arrivals,
        "tick complete"
    );

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use promenade_types::{DisplayMode, VibeLabel};
    use promenade_world::create_landmark_network;

    use super::*;

    fn state() -> SimulationState {
        let world = create_landmark_network().unwrap();
        SimulationState::new(world, &SimulationConfig::default())
    }

    #[test]
    fn first_tick_reaches_target() {
        let mut s = state();
        let params = SimulationParams::new(7, 19, DisplayMode::Dots).unwrap();
        let summary = run_tick(&mut s, &params).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.target_count, 720);
        assert_eq!(summary.agents_alive, 720);
        assert_eq!(summary.spawned, 720);
        assert_eq!(summary.metrics.vibe, VibeLabel::Overwhelming);
        assert_eq!(summary.arrivals.saturating_add(summary.moved), 720);
    }

    #[test]
    fn parameter_drop_evicts_in_one_tick() {
        let mut s = state();
        let busy = SimulationParams::new(7, 14, DisplayMode::Dots).unwrap();
        let quiet = SimulationParams::new(0, 14, DisplayMode::Dots).unwrap();
        run_tick(&mut s, &busy).unwrap();
        let summary = run_tick(&mut s, &quiet).unwrap();
        assert_eq!(summary.target_count, 40);
        assert_eq!(summary.agents_alive, 40);
        assert_eq!(summary.removed, 440);
        assert_eq!(summary.tick, 2);
    }

    #[test]
    fn tick_overflow_is_reported() {
        let mut s = state();
        s.tick = u64::MAX;
        let err = run_tick(&mut s, &SimulationParams::default()).unwrap_err();
        assert!(matches!(err, TickError::TickOverflow));
        assert!(s.population.is_empty());
    }

    #[test]
    fn same_seed_same_trajectory() {
        let mut a = state();
        let mut b = state();
        let params = SimulationParams::default();
        for _ in 0..25 {
            run_tick(&mut a, &params).unwrap();
            run_tick(&mut b, &params).unwrap();
        }
        let a: Vec<_> = a.tourists().cloned().collect();
        let b: Vec<_> = b.tourists().cloned().collect();
        assert_eq!(a, b);
    }
}
