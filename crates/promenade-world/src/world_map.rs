//! The landmark graph: landmarks as nodes, paths as weighted edges.
//!
//! A [`WorldMap`] is validated once at construction and is immutable
//! afterwards. Every path endpoint and the sunset landmark are guaranteed to
//! resolve, so per-tick code only has to handle lookups of ids that came from
//! somewhere other than the map itself.
//!
//! Landmarks keep their authored order, which the population controller
//! relies on when it picks one uniformly by index.

use std::collections::{BTreeMap, BTreeSet};

use promenade_types::{Landmark, LandmarkId, Path};

use crate::error::WorldError;

/// The static world: an ordered landmark list, the paths between them, and
/// the designated sunset landmark.
#[derive(Debug, Clone)]
pub struct WorldMap {
    /// Landmarks in authored order.
    landmarks: Vec<Landmark>,
    /// Landmark id -> position in `landmarks`.
    index: BTreeMap<LandmarkId, usize>,
    /// Paths in authored order.
    paths: Vec<Path>,
    /// Where every tourist converges during golden hour.
    sunset: Landmark,
}

impl WorldMap {
    /// Build and validate a world map.
    ///
    /// # Errors
    ///
    /// - [`WorldError::EmptyNetwork`] if `landmarks` is empty.
    /// - [`WorldError::DuplicateLandmark`] if two landmarks share an id.
    /// - [`WorldError::DanglingPath`] if a path names an unknown landmark.
    /// - [`WorldError::InvalidPathWeight`] if a weight is not finite and positive.
    /// - [`WorldError::MissingSunsetLandmark`] if `sunset_id` is unknown.
    pub fn new(
        landmarks: Vec<Landmark>,
        paths: Vec<Path>,
        sunset_id: &LandmarkId,
    ) -> Result<Self, WorldError> {
        if landmarks.is_empty() {
            return Err(WorldError::EmptyNetwork);
        }

        let mut index = BTreeMap::new();
        for (i, landmark) in landmarks.iter().enumerate() {
            if index.insert(landmark.id.clone(), i).is_some() {
                return Err(WorldError::DuplicateLandmark(landmark.id.clone()));
            }
        }

        for path in &paths {
            for endpoint in [&path.from, &path.to] {
                if !index.contains_key(endpoint) {
                    return Err(WorldError::DanglingPath {
                        from: path.from.clone(),
                        to: path.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
            if !path.weight.is_finite() || path.weight <= 0.0 {
                return Err(WorldError::InvalidPathWeight {
                    from: path.from.clone(),
                    to: path.to.clone(),
                    weight: path.weight,
                });
            }
        }

        let sunset = index
            .get(sunset_id)
            .and_then(|&i| landmarks.get(i))
            .cloned()
            .ok_or_else(|| WorldError::MissingSunsetLandmark(sunset_id.clone()))?;

        tracing::debug!(
            landmarks = landmarks.len(),
            paths = paths.len(),
            sunset = %sunset.id,
            "world map validated"
        );

        Ok(Self {
            landmarks,
            index,
            paths,
            sunset,
        })
    }

    // -------------------------------------------------------------------
    // Landmarks
    // -------------------------------------------------------------------

    /// All landmarks in authored order.
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Number of landmarks. Always at least one.
    pub const fn landmark_count(&self) -> usize {
        self.landmarks.len()
    }

    /// Look up a landmark by id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LandmarkNotFound`] if the id is not in the map.
    pub fn landmark(&self, id: &LandmarkId) -> Result<&Landmark, WorldError> {
        self.index
            .get(id)
            .and_then(|&i| self.landmarks.get(i))
            .ok_or_else(|| WorldError::LandmarkNotFound(id.clone()))
    }

    /// Look up a landmark by its position in the authored order.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LandmarkIndexOutOfRange`] past the end.
    pub fn landmark_at(&self, index: usize) -> Result<&Landmark, WorldError> {
        self.landmarks
            .get(index)
            .ok_or(WorldError::LandmarkIndexOutOfRange {
                index,
                count: self.landmarks.len(),
            })
    }

    /// Whether `id` names a landmark in the map.
    pub fn contains(&self, id: &LandmarkId) -> bool {
        self.index.contains_key(id)
    }

    /// The golden-hour convergence landmark.
    pub const fn sunset_landmark(&self) -> &Landmark {
        &self.sunset
    }

    // -------------------------------------------------------------------
    // Paths
    // -------------------------------------------------------------------

    /// All paths in authored order.
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// Landmarks joined to `id` by a path in either direction.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LandmarkNotFound`] if `id` is not in the map.
    pub fn neighbors(&self, id: &LandmarkId) -> Result<BTreeSet<LandmarkId>, WorldError> {
        if !self.contains(id) {
            return Err(WorldError::LandmarkNotFound(id.clone()));
        }
        let mut out = BTreeSet::new();
        for path in &self.paths {
            if &path.from == id {
                out.insert(path.to.clone());
            } else if &path.to == id {
                out.insert(path.from.clone());
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use promenade_types::{LandmarkCategory, Point};

    use super::*;

    fn landmark(id: &str, x: f64, y: f64) -> Landmark {
        Landmark {
            id: LandmarkId::from(id),
            name: id.to_uppercase(),
            position: Point::new(x, y),
            category: LandmarkCategory::Hub,
        }
    }

    fn path(from: &str, to: &str, weight: f64) -> Path {
        Path {
            from: LandmarkId::from(from),
            to: LandmarkId::from(to),
            weight,
        }
    }

    fn small_map() -> WorldMap {
        WorldMap::new(
            vec![
                landmark("a", 0.0, 0.0),
                landmark("b", 10.0, 0.0),
                landmark("c", 0.0, 10.0),
            ],
            vec![path("a", "b", 1.0), path("c", "a", 2.0)],
            &LandmarkId::from("c"),
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_id_and_index() {
        let map = small_map();
        assert_eq!(map.landmark_count(), 3);
        let b = map.landmark(&LandmarkId::from("b")).unwrap();
        assert!((b.position.x - 10.0).abs() < f64::EPSILON);
        assert_eq!(map.landmark_at(2).unwrap().id.as_str(), "c");
        assert_eq!(map.sunset_landmark().id.as_str(), "c");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let map = small_map();
        let err = map.landmark(&LandmarkId::from("zzz")).unwrap_err();
        assert!(matches!(err, WorldError::LandmarkNotFound(_)));
        assert!(matches!(
            map.landmark_at(3),
            Err(WorldError::LandmarkIndexOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn neighbors_ignore_path_direction() {
        let map = small_map();
        let n = map.neighbors(&LandmarkId::from("a")).unwrap();
        let ids: Vec<&str> = n.iter().map(LandmarkId::as_str).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn empty_network_is_rejected() {
        let err = WorldMap::new(Vec::new(), Vec::new(), &LandmarkId::from("a")).unwrap_err();
        assert!(matches!(err, WorldError::EmptyNetwork));
    }

    #[test]
    fn duplicate_landmark_is_rejected() {
        let err = WorldMap::new(
            vec![landmark("a", 0.0, 0.0), landmark("a", 1.0, 1.0)],
            Vec::new(),
            &LandmarkId::from("a"),
        )
        .unwrap_err();
        assert!(matches!(err, WorldError::DuplicateLandmark(_)));
    }

    #[test]
    fn dangling_path_is_rejected() {
        let err = WorldMap::new(
            vec![landmark("a", 0.0, 0.0)],
            vec![path("a", "ghost", 1.0)],
            &LandmarkId::from("a"),
        )
        .unwrap_err();
        match err {
            WorldError::DanglingPath { missing, .. } => assert_eq!(missing.as_str(), "ghost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        for bad in [0.0, -1.0, f64::NAN] {
            let err = WorldMap::new(
                vec![landmark("a", 0.0, 0.0), landmark("b", 1.0, 0.0)],
                vec![path("a", "b", bad)],
                &LandmarkId::from("a"),
            )
            .unwrap_err();
            assert!(matches!(err, WorldError::InvalidPathWeight { .. }));
        }
    }

    #[test]
    fn missing_sunset_is_rejected() {
        let err = WorldMap::new(
            vec![landmark("a", 0.0, 0.0)],
            Vec::new(),
            &LandmarkId::from("sunset"),
        )
        .unwrap_err();
        assert!(matches!(err, WorldError::MissingSunsetLandmark(_)));
    }
}
