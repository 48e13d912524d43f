//! Error types for the `promenade-world` crate.
//!
//! Construction errors describe an authoring defect in the landmark network.
//! Once a [`WorldMap`](crate::WorldMap) exists, the only runtime error is a
//! lookup of an id the map never contained.

use promenade_types::LandmarkId;

/// Errors raised while building or querying the world model.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A landmark id was referenced that the map does not contain.
    #[error("landmark not found: {0}")]
    LandmarkNotFound(LandmarkId),

    /// A positional landmark lookup fell outside the landmark sequence.
    #[error("landmark index {index} out of range (have {count})")]
    LandmarkIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of landmarks in the map.
        count: usize,
    },

    /// Two landmarks were authored with the same id.
    #[error("duplicate landmark id: {0}")]
    DuplicateLandmark(LandmarkId),

    /// A path endpoint does not name a landmark in the map.
    #[error("path {from} -> {to} references unknown landmark {missing}")]
    DanglingPath {
        /// Path origin.
        from: LandmarkId,
        /// Path destination.
        to: LandmarkId,
        /// The endpoint that failed to resolve.
        missing: LandmarkId,
    },

    /// A path weight is zero, negative, or not finite.
    #[error("path {from} -> {to} has invalid weight {weight}")]
    InvalidPathWeight {
        /// Path origin.
        from: LandmarkId,
        /// Path destination.
        to: LandmarkId,
        /// The rejected weight.
        weight: f64,
    },

    /// The map was built with no landmarks, so no tourist could spawn.
    #[error("landmark network is empty")]
    EmptyNetwork,

    /// The designated sunset landmark is not part of the map.
    #[error("sunset landmark {0} is not in the network")]
    MissingSunsetLandmark(LandmarkId),
}
