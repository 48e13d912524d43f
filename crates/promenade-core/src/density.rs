//! Density policy: how many tourists the waterfront should hold for a given
//! month and hour.
//!
//! ```text
//! target = floor(base_scale * season_factor * time_factor * golden_hour_bonus)
//! ```
//!
//! Every factor is stored as an integer percentage and the product is
//! evaluated in `u64`, so the floor is exact. With the default base scale
//! of 400, August at 19:00 yields `400 * 120 * 100 * 150 / 100^3 = 720`.
//!
//! The policy is pure. The same inputs always give the same count.

use promenade_types::Season;

use crate::config::DensityConfig;
use crate::params::{self, MAX_HOUR, SimulationParams};

/// Default maximum simultaneous tourists at a factor product of 1.0.
pub const BASE_SCALE: u32 = 400;

/// Denominator for a product of three percentages.
const PERCENT_CUBED: u64 = 1_000_000;

/// Daytime traffic multiplier, percent.
const DAYTIME_PCT: u64 = 100;
/// Off-peak traffic multiplier, percent.
const OFF_PEAK_PCT: u64 = 30;
/// Golden-hour surge multiplier, percent.
const GOLDEN_PCT: u64 = 150;
/// No surge, percent.
const NO_SURGE_PCT: u64 = 100;

/// Month multiplier as a percentage. Peaks at 120 in July and August and
/// bottoms at 10 in January.
pub const fn season_factor_pct(season: Season) -> u64 {
    match season {
        Season::January => 10,
        Season::February | Season::December => 15,
        Season::March | Season::November => 30,
        Season::April => 50,
        Season::May => 75,
        Season::June => 95,
        Season::July | Season::August => 120,
        Season::September => 90,
        Season::October => 60,
    }
}

/// Month multiplier as a ratio, for display.
pub fn season_factor(season: Season) -> f64 {
    // Percentages are at most 120, exactly representable.
    f64::from(u8::try_from(season_factor_pct(season)).unwrap_or(u8::MAX)) / 100.0
}

/// Time-of-day multiplier as a percentage: full in `[10, 21]`, else 30.
pub const fn time_factor_pct(hour: u8) -> u64 {
    if params::is_daytime_hour(hour) {
        DAYTIME_PCT
    } else {
        OFF_PEAK_PCT
    }
}

/// Golden-hour multiplier as a percentage: 150 in `[18, 20]`, else 100.
pub const fn golden_hour_bonus_pct(hour: u8) -> u64 {
    if params::is_golden_hour(hour) {
        GOLDEN_PCT
    } else {
        NO_SURGE_PCT
    }
}

/// Target tourist count at the default base scale with no ceiling.
///
/// Out-of-range inputs are clamped: months above 11 act as December, hours
/// above 23 act as 23.
pub fn target_count(season_index: u8, hour: u8) -> u32 {
    let season = season_index.min(Season::MAX_INDEX);
    let season = Season::from_index(season).unwrap_or(Season::December);
    DensityPolicy::default().target_for(season, hour.min(MAX_HOUR))
}

/// Configured density policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityPolicy {
    /// Tourists at a factor product of 1.0.
    pub base_scale: u32,
    /// Optional hard cap on the result.
    pub ceiling: Option<u32>,
}

impl Default for DensityPolicy {
    fn default() -> Self {
        Self {
            base_scale: BASE_SCALE,
            ceiling: None,
        }
    }
}

impl DensityPolicy {
    /// Build a policy from configuration.
    pub const fn from_config(config: &DensityConfig) -> Self {
        Self {
            base_scale: config.base_scale,
            ceiling: config.ceiling,
        }
    }

    /// Target count for a month and hour.
    pub fn target_for(&self, season: Season, hour: u8) -> u32 {
        let raw = u64::from(self.base_scale)
            .saturating_mul(season_factor_pct(season))
            .saturating_mul(time_factor_pct(hour))
            .saturating_mul(golden_hour_bonus_pct(hour))
            .checked_div(PERCENT_CUBED)
            .unwrap_or(0);
        let count = u32::try_from(raw).unwrap_or(u32::MAX);
        self.ceiling.map_or(count, |cap| count.min(cap))
    }

    /// Target count for the given parameters.
    pub fn target_count(&self, params: &SimulationParams) -> u32 {
        self.target_for(params.season, params.hour())
    }
}
