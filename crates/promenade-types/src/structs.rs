//! Core entity structs: geometry, landmarks, paths, and tourists.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::LandmarkCategory;
use crate::ids::{LandmarkId, TouristId};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in the 2-D world plane. The default world is 800 by 600 units
/// with the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A display color in HSL space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HslColor {
    /// Hue in degrees, 0 to 359.
    pub hue: u16,
    /// Saturation percentage.
    pub saturation: u8,
    /// Lightness percentage.
    pub lightness: u8,
}

impl HslColor {
    /// CSS color function, e.g. `hsl(200, 60%, 55%)`.
    pub fn css(self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

// ---------------------------------------------------------------------------
// World graph
// ---------------------------------------------------------------------------

/// A named point of interest. Defined once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Landmark {
    /// Stable slug.
    pub id: LandmarkId,
    /// Display name.
    pub name: String,
    /// Fixed position in the world plane.
    pub position: Point,
    /// What kind of place this is.
    pub category: LandmarkCategory,
}

/// A drawn connection between two landmarks.
///
/// Stored with a direction but rendered the same both ways. The weight is
/// reserved for cost-aware routing; tourists walk straight lines and ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Path {
    /// Origin landmark.
    pub from: LandmarkId,
    /// Destination landmark.
    pub to: LandmarkId,
    /// Positive traversal weight.
    pub weight: f64,
}

// ---------------------------------------------------------------------------
// Tourists
// ---------------------------------------------------------------------------

/// A simulated pedestrian.
///
/// Only `position` and `target` change after creation. Speed and color are
/// fixed for the tourist's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tourist {
    /// Creation-ordered identifier.
    pub id: TouristId,
    /// Current continuous position.
    pub position: Point,
    /// The landmark this tourist is heading to when no override applies.
    pub target: LandmarkId,
    /// Units per tick before congestion damping.
    pub speed: f64,
    /// Display color chosen at spawn.
    pub color: HslColor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hsl_renders_as_css() {
        let c = HslColor {
            hue: 20,
            saturation: 80,
            lightness: 60,
        };
        assert_eq!(c.css(), "hsl(20, 80%, 60%)");
    }
}
