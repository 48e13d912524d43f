//! Simulation parameters: month, hour of day, and display mode.
//!
//! [`SimulationParams`] is a small `Copy` value. The control surface owns the
//! authoritative copy (see [`ParameterControl`](crate::control::ParameterControl))
//! and the tick loop receives a snapshot of it at the start of every tick,
//! so nothing inside a tick ever observes a half-applied change.
//!
//! The hour windows that drive the density policy and the motion rule are
//! defined here so both read from one place.

use promenade_types::{DisplayMode, Season};
use serde::{Deserialize, Serialize};

use crate::config::InitialParamsConfig;

/// Latest valid hour of day.
pub const MAX_HOUR: u8 = 23;

/// First hour of daytime traffic (inclusive).
const DAYTIME_START: u8 = 10;
/// Last hour of daytime traffic (inclusive).
const DAYTIME_END: u8 = 21;
/// First golden hour (inclusive).
const GOLDEN_START: u8 = 18;
/// Last golden hour (inclusive).
const GOLDEN_END: u8 = 20;
/// Hours strictly after this one spawn tourists with warm colors.
const EVENING_AFTER: u8 = 18;

/// Errors from building or updating parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// Month index above 11.
    #[error("season index {0} out of range 0..=11")]
    SeasonOutOfRange(u8),

    /// Hour above 23.
    #[error("hour {0} out of range 0..=23")]
    HourOutOfRange(u8),
}

/// The externally controlled inputs to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationParams {
    /// Current month.
    pub season: Season,
    /// Hour of day, 0 to 23.
    hour: u8,
    /// How the render adapter draws the population.
    pub display_mode: DisplayMode,
}

impl SimulationParams {
    /// Build parameters from raw control-surface values.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] if the month index or hour is out of range.
    pub const fn new(
        season_index: u8,
        hour: u8,
        display_mode: DisplayMode,
    ) -> Result<Self, ParamsError> {
        let Some(season) = Season::from_index(season_index) else {
            return Err(ParamsError::SeasonOutOfRange(season_index));
        };
        if hour > MAX_HOUR {
            return Err(ParamsError::HourOutOfRange(hour));
        }
        Ok(Self {
            season,
            hour,
            display_mode,
        })
    }

    /// Build the startup parameters from configuration.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub const fn from_config(config: &InitialParamsConfig) -> Result<Self, ParamsError> {
        Self::new(config.season, config.hour, config.display_mode)
    }

    /// Hour of day, always within 0..=23.
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// Whether the hour is in the daytime window `[10, 21]`.
    pub const fn is_daytime(&self) -> bool {
        is_daytime_hour(self.hour)
    }

    /// Whether the hour is in the golden-hour window `[18, 20]`.
    pub const fn is_golden_hour(&self) -> bool {
        is_golden_hour(self.hour)
    }

    /// Whether new tourists get the warm evening palette (hour after 18).
    pub const fn is_evening(&self) -> bool {
        self.hour > EVENING_AFTER
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            season: Season::July,
            hour: 12,
            display_mode: DisplayMode::Dots,
        }
    }
}

/// Whether `hour` falls in the daytime window `[10, 21]`.
pub const fn is_daytime_hour(hour: u8) -> bool {
    hour >= DAYTIME_START && hour <= DAYTIME_END
}

/// Whether `hour` falls in the golden-hour window `[18, 20]`.
pub const fn is_golden_hour(hour: u8) -> bool {
    hour >= GOLDEN_START && hour <= GOLDEN_END
}

/// A partial change from the control surface. Absent fields keep their
/// current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsUpdate {
    /// New month index, 0 to 11.
    #[serde(default)]
    pub season: Option<u8>,
    /// New hour, 0 to 23.
    #[serde(default)]
    pub hour: Option<u8>,
    /// New display mode.
    #[serde(default)]
    pub display_mode: Option<DisplayMode>,
}

impl ParamsUpdate {
    /// Whether the update changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.season.is_none() && self.hour.is_none() && self.display_mode.is_none()
    }

    /// Apply this update on top of `current`. Validation is all-or-nothing:
    /// if any field is out of range, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] for an out-of-range month or hour.
    pub fn apply(&self, current: &SimulationParams) -> Result<SimulationParams, ParamsError> {
        SimulationParams::new(
            self.season.unwrap_or_else(|| current.season.index()),
            self.hour.unwrap_or(current.hour),
            self.display_mode.unwrap_or(current.display_mode),
        )
    }
}
