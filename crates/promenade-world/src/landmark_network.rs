//! Default landmark network for the Promenade simulation.
//!
//! Eight landmarks of a compact old-town waterfront, laid out in an 800 by
//! 600 plane, joined by ten walking paths. Two hubs act as the natural entry
//! points, three attractions draw crowds, and three photo spots (one of them
//! [`SUNSET_POINT_ID`]) attract photographers.

use promenade_types::{Landmark, LandmarkCategory, LandmarkId, Path, Point};

use crate::error::WorldError;
use crate::world_map::WorldMap;

/// Slug of the landmark every tourist converges on during golden hour.
pub const SUNSET_POINT_ID: &str = "sunset_point";

/// Width of the plane the network is drawn on.
pub const PLANE_WIDTH: f64 = 800.0;

/// Height of the plane the network is drawn on.
pub const PLANE_HEIGHT: f64 = 600.0;

/// Helper to build a [`Landmark`].
fn landmark(id: &str, name: &str, x: f64, y: f64, category: LandmarkCategory) -> Landmark {
    Landmark {
        id: LandmarkId::from(id),
        name: name.to_owned(),
        position: Point::new(x, y),
        category,
    }
}

/// Helper to build a [`Path`].
fn walk(from: &str, to: &str, weight: f64) -> Path {
    Path {
        from: LandmarkId::from(from),
        to: LandmarkId::from(to),
        weight,
    }
}

/// Build the default landmark network.
///
/// # Errors
///
/// Only fails if the authored data is inconsistent, which the tests below
/// rule out.
pub fn create_landmark_network() -> Result<WorldMap, WorldError> {
    let landmarks = vec![
        landmark(
            "old_town_square",
            "Old Town Square",
            400.0,
            300.0,
            LandmarkCategory::Hub,
        ),
        landmark(
            "harbour_gate",
            "Harbour Gate",
            120.0,
            480.0,
            LandmarkCategory::Hub,
        ),
        landmark(
            "cathedral",
            "St. Brigid's Cathedral",
            300.0,
            140.0,
            LandmarkCategory::Attraction,
        ),
        landmark(
            "castle_ramparts",
            "Castle Ramparts",
            620.0,
            110.0,
            LandmarkCategory::Attraction,
        ),
        landmark(
            "market_hall",
            "Covered Market",
            560.0,
            360.0,
            LandmarkCategory::Attraction,
        ),
        landmark(
            "bridge_view",
            "Lantern Bridge",
            230.0,
            330.0,
            LandmarkCategory::Photo,
        ),
        landmark(
            "hilltop_terrace",
            "Hilltop Terrace",
            700.0,
            250.0,
            LandmarkCategory::Photo,
        ),
        landmark(
            SUNSET_POINT_ID,
            "Sunset Point",
            680.0,
            520.0,
            LandmarkCategory::Photo,
        ),
    ];

    let paths = vec![
        walk("harbour_gate", "bridge_view", 1.0),
        walk("bridge_view", "old_town_square", 1.0),
        walk("old_town_square", "cathedral", 1.2),
        walk("cathedral", "castle_ramparts", 2.0),
        walk("castle_ramparts", "hilltop_terrace", 1.5),
        walk("old_town_square", "market_hall", 1.0),
        walk("market_hall", "hilltop_terrace", 1.4),
        walk("market_hall", SUNSET_POINT_ID, 1.3),
        walk("harbour_gate", SUNSET_POINT_ID, 3.0),
        walk("bridge_view", "cathedral", 1.6),
    ];

    let world = WorldMap::new(landmarks, paths, &LandmarkId::from(SUNSET_POINT_ID))?;
    tracing::info!(
        landmarks = world.landmark_count(),
        paths = world.paths().len(),
        "landmark network created"
    );
    Ok(world)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_network_is_consistent() {
        let world = create_landmark_network().unwrap();
        assert_eq!(world.landmark_count(), 8);
        assert_eq!(world.paths().len(), 10);
        assert_eq!(world.sunset_landmark().id.as_str(), SUNSET_POINT_ID);
    }

    #[test]
    fn landmarks_sit_inside_the_plane() {
        let world = create_landmark_network().unwrap();
        for l in world.landmarks() {
            assert!(
                (0.0..=PLANE_WIDTH).contains(&l.position.x),
                "{} x out of range",
                l.id
            );
            assert!(
                (0.0..=PLANE_HEIGHT).contains(&l.position.y),
                "{} y out of range",
                l.id
            );
        }
    }

    #[test]
    fn every_landmark_is_reachable_by_some_path() {
        let world = create_landmark_network().unwrap();
        for l in world.landmarks() {
            assert!(
                !world.neighbors(&l.id).unwrap().is_empty(),
                "{} is isolated",
                l.id
            );
        }
    }

    #[test]
    fn all_categories_are_represented() {
        let world = create_landmark_network().unwrap();
        for category in [
            LandmarkCategory::Hub,
            LandmarkCategory::Attraction,
            LandmarkCategory::Photo,
        ] {
            assert!(world.landmarks().iter().any(|l| l.category == category));
        }
    }
}
