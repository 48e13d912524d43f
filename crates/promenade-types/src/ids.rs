//! Typed identifiers for tourists and landmarks.
//!
//! Tourists are numbered sequentially in creation order, so a smaller
//! [`TouristId`] always belongs to an older tourist. Landmarks are keyed by
//! a stable, human-authored slug such as `"sunset_point"`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for a tourist, assigned in creation order.
///
/// Ids are never reused: a tourist removed by reconciliation takes its id
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct TouristId(#[ts(type = "number")] pub u64);

impl TouristId {
    /// The first id handed out by a fresh population.
    pub const FIRST: Self = Self(0);

    /// Return the inner sequence number.
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` once the sequence is exhausted.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl core::fmt::Display for TouristId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "tourist-{}", self.0)
    }
}

/// Stable slug identifying a landmark in the world network.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct LandmarkId(pub String);

impl LandmarkId {
    /// Create a landmark id from any string-like slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Borrow the slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LandmarkId {
    fn from(slug: &str) -> Self {
        Self(slug.to_owned())
    }
}
