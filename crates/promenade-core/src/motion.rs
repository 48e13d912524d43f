//! Motion rule: steer every tourist toward its effective target.
//!
//! Per tourist, per tick:
//!
//! 1. Resolve the stored target landmark.
//! 2. During golden hour, steer for the sunset landmark instead. The stored
//!    target is left alone and takes over again once the window closes.
//! 3. Inside the arrival radius: pick a new random stored target and stay
//!    put for this tick.
//! 4. Otherwise: step along the unit direction by `speed * damping`.
//!
//! Damping is one world-wide factor per tick, computed from the density
//! target rather than the live count, and floored so nobody stalls.
//! Tourists never observe each other.

use promenade_types::{LandmarkId, Point, Tourist};
use promenade_world::{WorldError, WorldMap};
use rand::Rng;

use crate::config::MotionConfig;
use crate::params::SimulationParams;
use crate::population::{self, Population};

/// Motion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionRule {
    /// Distance below which a tourist has arrived.
    pub arrival_radius: f64,
    /// Target count at which unfloored damping reaches zero.
    pub damping_divisor: f64,
    /// Lowest damping factor.
    pub damping_floor: f64,
}

impl Default for MotionRule {
    fn default() -> Self {
        Self::from_config(&MotionConfig::default())
    }
}

/// What happened to one tourist this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Within the arrival radius; a new stored target was chosen.
    Arrived {
        /// The freshly chosen target.
        new_target: LandmarkId,
    },
    /// Moved toward the effective target.
    Moved,
}

/// Aggregate result of advancing the whole population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionReport {
    /// Tourists that arrived and were retargeted.
    pub arrivals: u32,
    /// Tourists that stepped.
    pub moved: u32,
}

/// Congestion damping with the default divisor and floor:
/// `max(0.2, 1 - count / 800)`.
pub fn density_damping(target_count: u32) -> f64 {
    MotionRule::default().damping(target_count)
}

impl MotionRule {
    /// Take motion constants from configuration.
    pub const fn from_config(config: &MotionConfig) -> Self {
        Self {
            arrival_radius: config.arrival_radius,
            damping_divisor: config.damping_divisor,
            damping_floor: config.damping_floor,
        }
    }

    /// World-wide speed multiplier for a density target.
    ///
    /// Never above `1.0`. Never below `damping_floor` unless the floor
    /// itself exceeds `1.0`.
    pub fn damping(&self, target_count: u32) -> f64 {
        let raw = 1.0 - f64::from(target_count) / self.damping_divisor;
        raw.max(self.damping_floor).min(1.0)
    }

    /// The landmark a tourist is actually walking to this tick.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LandmarkNotFound`] if the stored target is not
    /// in the map.
    pub fn effective_target(
        &self,
        tourist: &Tourist,
        world: &WorldMap,
        params: &SimulationParams,
    ) -> Result<Point, WorldError> {
        let stored = world.landmark(&tourist.target)?;
        if params.is_golden_hour() {
            return Ok(world.sunset_landmark().position);
        }
        Ok(stored.position)
    }

    /// Advance a single tourist.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if a landmark lookup fails.
    pub fn step<R: Rng + ?Sized>(
        &self,
        tourist: &mut Tourist,
        world: &WorldMap,
        params: &SimulationParams,
        damping: f64,
        rng: &mut R,
    ) -> Result<StepOutcome, WorldError> {
        let goal = self.effective_target(tourist, world, params)?;
        let dx = goal.x - tourist.position.x;
        let dy = goal.y - tourist.position.y;
        let distance = dx.hypot(dy);

        if distance < self.arrival_radius || distance <= f64::EPSILON {
            let new_target = population::random_landmark(world, rng)?;
            tourist.target = new_target.clone();
            return Ok(StepOutcome::Arrived { new_target });
        }

        let stride = tourist.speed * damping / distance;
        tourist.position = tourist.position.offset(dx * stride, dy * stride);
        Ok(StepOutcome::Moved)
    }

    /// Advance every live tourist by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] on the first failed lookup.
    pub fn advance<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        world: &WorldMap,
        params: &SimulationParams,
        target_count: u32,
        rng: &mut R,
    ) -> Result<MotionReport, WorldError> {
        let damping = self.damping(target_count);
        let mut report = MotionReport::default();
        for tourist in population.iter_mut() {
            match self.step(tourist, world, params, damping, rng)? {
                StepOutcome::Arrived { .. } => report.arrivals = report.arrivals.saturating_add(1),
                StepOutcome::Moved => report.moved = report.moved.saturating_add(1),
            }
        }
        Ok(report)
    }
}
