//! Population controller: reconciles the live tourist count toward the
//! density target once per tick.
//!
//! The population is kept in creation order. Growth appends new tourists at
//! the back; shrinkage evicts from the front, so the oldest tourists always
//! leave first. Reconciliation lands exactly on the target in one pass.

use std::collections::VecDeque;

use promenade_types::{HslColor, LandmarkId, Tourist, TouristId};
use promenade_world::{WorldError, WorldMap};
use rand::Rng;
use tracing::debug;

use crate::config::MotionConfig;
use crate::params::SimulationParams;

/// Errors raised while reconciling the population.
#[derive(Debug, thiserror::Error)]
pub enum PopulationError {
    /// A landmark lookup failed while placing or targeting a tourist.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The tourist id sequence ran out.
    #[error("tourist id sequence exhausted")]
    IdsExhausted,
}

/// How new tourists are placed and paced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRule {
    /// Maximum per-axis offset from the entry landmark.
    pub jitter: f64,
    /// Slowest speed, units per tick.
    pub speed_min: f64,
    /// Fastest speed, units per tick.
    pub speed_max: f64,
}

impl Default for SpawnRule {
    fn default() -> Self {
        Self::from_config(&MotionConfig::default())
    }
}

impl SpawnRule {
    /// Take spawn constants from the motion configuration.
    pub const fn from_config(config: &MotionConfig) -> Self {
        Self {
            jitter: config.spawn_jitter,
            speed_min: config.speed_min,
            speed_max: config.speed_max,
        }
    }
}

/// What one reconciliation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Tourists created.
    pub spawned: u32,
    /// Tourists evicted.
    pub removed: u32,
}

/// Live tourists in creation order.
#[derive(Debug, Clone)]
pub struct Population {
    tourists: VecDeque<Tourist>,
    next_id: Option<TouristId>,
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

impl Population {
    /// An empty population.
    pub const fn new() -> Self {
        Self {
            tourists: VecDeque::new(),
            next_id: Some(TouristId::FIRST),
        }
    }

    /// Number of live tourists.
    pub fn len(&self) -> usize {
        self.tourists.len()
    }

    /// Whether nobody is on the streets.
    pub fn is_empty(&self) -> bool {
        self.tourists.is_empty()
    }

    /// Live tourists, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Tourist> {
        self.tourists.iter()
    }

    /// Mutable access for the motion rule.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tourist> {
        self.tourists.iter_mut()
    }

    /// Live count as `u32`, saturating.
    pub fn count(&self) -> u32 {
        u32::try_from(self.tourists.len()).unwrap_or(u32::MAX)
    }

    fn allocate_id(&mut self) -> Result<TouristId, PopulationError> {
        let id = self.next_id.ok_or(PopulationError::IdsExhausted)?;
        self.next_id = id.next();
        Ok(id)
    }
}

/// Pick a uniformly random landmark id.
pub fn random_landmark<R: Rng + ?Sized>(
    world: &WorldMap,
    rng: &mut R,
) -> Result<LandmarkId, WorldError> {
    let idx = rng.random_range(0..world.landmark_count());
    Ok(world.landmark_at(idx)?.id.clone())
}

/// Random display color: warm after 18:00, cool otherwise.
pub fn spawn_color<R: Rng + ?Sized>(params: SimulationParams, rng: &mut R) -> HslColor {
    if params.is_evening() {
        HslColor {
            hue: rng.random_range(0..40),
            saturation: rng.random_range(70..=90),
            lightness: rng.random_range(55..=65),
        }
    } else {
        HslColor {
            hue: rng.random_range(180..240),
            saturation: rng.random_range(55..=75),
            lightness: rng.random_range(50..=65),
        }
    }
}

fn spawn_one<R: Rng + ?Sized>(
    id: TouristId,
    world: &WorldMap,
    params: SimulationParams,
    rule: &SpawnRule,
    rng: &mut R,
) -> Result<Tourist, WorldError> {
    let entry_idx = rng.random_range(0..world.landmark_count());
    let entry = world.landmark_at(entry_idx)?.position;
    let dx = rng.random_range(-rule.jitter..=rule.jitter);
    let dy = rng.random_range(-rule.jitter..=rule.jitter);
    Ok(Tourist {
        id,
        position: entry.offset(dx, dy),
        target: random_landmark(world, rng)?,
        speed: rng.random_range(rule.speed_min..=rule.speed_max),
        color: spawn_color(params, rng),
    })
}

/// Bring `population` to exactly `target` tourists.
///
/// Spawns the shortfall at random landmarks, or evicts the surplus from
/// the front (oldest first). Does nothing when the counts already match.
///
/// # Errors
///
/// Returns [`PopulationError`] if a landmark lookup fails or ids run out.
/// The population may be partly grown when that happens.
pub fn reconcile<R: Rng + ?Sized>(
    population: &mut Population,
    target: u32,
    world: &WorldMap,
    params: &SimulationParams,
    rule: &SpawnRule,
    rng: &mut R,
) -> Result<ReconcileOutcome, PopulationError> {
    let target_len = usize::try_from(target).unwrap_or(usize::MAX);
    let live = population.len();
    let mut outcome = ReconcileOutcome::default();

    if live < target_len {
        let shortfall = target_len.saturating_sub(live);
        population.tourists.reserve(shortfall);
        for _ in 0..shortfall {
            let id = population.allocate_id()?;
            let tourist = spawn_one(id, world, *params, rule, rng)?;
            population.tourists.push_back(tourist);
        }
        outcome.spawned = u32::try_from(shortfall).unwrap_or(u32::MAX);
    } else if live > target_len {
        let surplus = live.saturating_sub(target_len);
        population.tourists.drain(..surplus);
        outcome.removed = u32::try_from(surplus).unwrap_or(u32::MAX);
    }

    if outcome != ReconcileOutcome::default() {
        debug!(
            target,
            live = population.len(),
            spawned = outcome.spawned,
            removed = outcome.removed,
            "population reconciled"
        );
    }
    Ok(outcome)
}
