//! Enumeration types for the Promenade simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// A calendar month. The control surface calls this the "season" and
/// addresses it by a zero-based index (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Season {
    /// Deep winter; the quietest month.
    January,
    /// Late winter.
    February,
    /// Early spring.
    March,
    /// Spring.
    April,
    /// Late spring.
    May,
    /// Early summer.
    June,
    /// Mid-summer peak.
    July,
    /// Mid-summer peak.
    August,
    /// Late summer.
    September,
    /// Autumn.
    October,
    /// Late autumn.
    November,
    /// Early winter.
    December,
}

impl Season {
    /// All twelve months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Highest valid zero-based month index.
    pub const MAX_INDEX: u8 = 11;

    /// Look up a month by zero-based index. Returns `None` above 11.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::January),
            1 => Some(Self::February),
            2 => Some(Self::March),
            3 => Some(Self::April),
            4 => Some(Self::May),
            5 => Some(Self::June),
            6 => Some(Self::July),
            7 => Some(Self::August),
            8 => Some(Self::September),
            9 => Some(Self::October),
            10 => Some(Self::November),
            11 => Some(Self::December),
            _ => None,
        }
    }

    /// Zero-based month index.
    pub const fn index(self) -> u8 {
        match self {
            Self::January => 0,
            Self::February => 1,
            Self::March => 2,
            Self::April => 3,
            Self::May => 4,
            Self::June => 5,
            Self::July => 6,
            Self::August => 7,
            Self::September => 8,
            Self::October => 9,
            Self::November => 10,
            Self::December => 11,
        }
    }

    /// English month name, as shown to users and advisors.
    pub const fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }
}

impl core::fmt::Display for Season {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// What kind of place a landmark is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum LandmarkCategory {
    /// A sight people come to see.
    Attraction,
    /// A viewpoint people stop at for photos.
    Photo,
    /// A transit or gathering hub.
    Hub,
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// How the render adapter should draw the population.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// One dot per tourist.
    #[default]
    Dots,
    /// Binned agent counts over a coarse grid.
    Heatmap,
}

/// Human-facing congestion label derived from density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum VibeLabel {
    /// Density 150 or below.
    Serene,
    /// Density above 150, up to 350.
    Bustling,
    /// Density above 350.
    Overwhelming,
}

impl VibeLabel {
    /// Display text for the label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serene => "Serene",
            Self::Bustling => "Bustling",
            Self::Overwhelming => "Overwhelming",
        }
    }
}

impl core::fmt::Display for VibeLabel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn season_index_round_trips_for_every_month() {
        for (i, season) in Season::ALL.iter().enumerate() {
            let idx = u8::try_from(i).unwrap();
            assert_eq!(season.index(), idx);
            assert_eq!(Season::from_index(idx), Some(*season));
        }
        assert_eq!(Season::from_index(12), None);
    }

    #[test]
    fn august_is_index_seven() {
        assert_eq!(Season::from_index(7).unwrap().name(), "August");
    }

    #[test]
    fn display_mode_uses_lowercase_on_the_wire() {
        let json = serde_json::to_string(&DisplayMode::Heatmap).unwrap();
        assert_eq!(json, "\"heatmap\"");
        let parsed: DisplayMode = serde_json::from_str("\"dots\"").unwrap();
        assert_eq!(parsed, DisplayMode::Dots);
    }
}
