//! Human-facing indicators derived from the density target.

use promenade_types::VibeLabel;
use serde::{Deserialize, Serialize};

/// Density above which the vibe is [`VibeLabel::Overwhelming`].
const OVERWHELMING_ABOVE: u32 = 350;
/// Density above which the vibe is [`VibeLabel::Bustling`].
const BUSTLING_ABOVE: u32 = 150;

/// Congestion label for a density.
pub const fn vibe_label(density: u32) -> VibeLabel {
    if density > OVERWHELMING_ABOVE {
        VibeLabel::Overwhelming
    } else if density > BUSTLING_ABOVE {
        VibeLabel::Bustling
    } else {
        VibeLabel::Serene
    }
}

/// Estimated wait at a photo spot, whole minutes: `floor(d / 10)`.
pub const fn photo_wait_minutes(density: u32) -> u32 {
    density / 10
}

/// Estimated walking speed: `max(1, 4 - d / 100)` km/h.
pub fn walking_speed_kmh(density: u32) -> f64 {
    (4.0 - f64::from(density) / 100.0).max(1.0)
}

/// All indicators for one density value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrowdMetrics {
    /// The density these were derived from.
    pub density: u32,
    /// Congestion label.
    pub vibe: VibeLabel,
    /// Photo wait in minutes.
    pub photo_wait_minutes: u32,
    /// Walking speed in km/h.
    pub walking_speed_kmh: f64,
    /// Walking speed rendered to one decimal place.
    pub walking_speed: String,
}

impl CrowdMetrics {
    /// Derive every indicator from `density`.
    pub fn from_density(density: u32) -> Self {
        let kmh = walking_speed_kmh(density);
        Self {
            density,
            vibe: vibe_label(density),
            photo_wait_minutes: photo_wait_minutes(density),
            walking_speed_kmh: kmh,
            walking_speed: format!("{kmh:.1}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_density_indicators() {
        let m = CrowdMetrics::from_density(400);
        assert_eq!(m.vibe, VibeLabel::Overwhelming);
        assert_eq!(m.photo_wait_minutes, 40);
        assert_eq!(m.walking_speed, "1.0");
    }

    #[test]
    fn vibe_thresholds_are_strict() {
        assert_eq!(vibe_label(50), VibeLabel::Serene);
        assert_eq!(vibe_label(150), VibeLabel::Serene);
        assert_eq!(vibe_label(151), VibeLabel::Bustling);
        assert_eq!(vibe_label(200), VibeLabel::Bustling);
        assert_eq!(vibe_label(350), VibeLabel::Bustling);
        assert_eq!(vibe_label(351), VibeLabel::Overwhelming);
    }

    #[test]
    fn photo_wait_floors() {
        assert_eq!(photo_wait_minutes(0), 0);
        assert_eq!(photo_wait_minutes(9), 0);
        assert_eq!(photo_wait_minutes(144), 14);
        assert_eq!(photo_wait_minutes(720), 72);
    }

    #[test]
    fn walking_speed_bottoms_out_at_one() {
        assert_eq!(CrowdMetrics::from_density(50).walking_speed, "3.5");
        assert_eq!(CrowdMetrics::from_density(0).walking_speed, "4.0");
        for d in [300, 301, 400, 720, u32::MAX] {
            let speed = walking_speed_kmh(d);
            assert!((speed - 1.0).abs() < f64::EPSILON, "density {d}");
        }
    }

    #[test]
    fn serializes_for_the_observer() {
        let json = serde_json::to_value(CrowdMetrics::from_density(200)).unwrap_or_default();
        assert_eq!(json["vibe"], "Bustling");
        assert_eq!(json["walking_speed"], "2.0");
    }
}
