//! Shared type definitions for the Promenade crowd simulation.
//!
//! Every crate in the workspace speaks in these types. They also flow to
//! `TypeScript` via `ts-rs` for the browser canvas client.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers for tourists and landmarks
//! - [`enums`] -- Months, landmark categories, display modes, vibe labels
//! - [`structs`] -- Geometry, landmarks, paths, and tourists

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{DisplayMode, LandmarkCategory, Season, VibeLabel};
pub use ids::{LandmarkId, TouristId};
pub use structs::{HslColor, Landmark, Path, Point, Tourist};
