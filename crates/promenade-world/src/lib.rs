//! World model for the Promenade simulation.
//!
//! The world is a small, static graph of landmarks joined by paths. It is
//! built once, validated once, and shared read-only with everything else.
//!
//! # Modules
//!
//! - [`error`] -- Error types for world construction and lookup.
//! - [`world_map`] -- [`WorldMap`]: validated landmark graph with id and
//!   index lookups, neighbor queries, and the sunset landmark.
//! - [`landmark_network`] -- The default eight-landmark waterfront network.

pub mod error;
pub mod landmark_network;
pub mod world_map;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use landmark_network::{PLANE_HEIGHT, PLANE_WIDTH, SUNSET_POINT_ID, create_landmark_network};
pub use world_map::WorldMap;
