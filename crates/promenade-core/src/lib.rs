//! Crowd-simulation engine for the Promenade simulation.
//!
//! Everything with temporal dynamics or numeric policy lives here: how many
//! tourists a month and hour call for, how the population tracks that
//! number, how each tourist walks, and what the crowd feels like. The tick
//! is a plain function of (state, parameters); scheduling it is the
//! runner's job, and drawing it belongs to the observer.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `promenade-config.yaml`
//! - [`params`] -- Month, hour, and display mode, with hour windows
//! - [`control`] -- Shared parameter cell and pause/stop controls
//! - [`density`] -- Month and hour to target tourist count
//! - [`population`] -- FIFO reconciliation toward the target
//! - [`motion`] -- Per-tourist steering, sunset override, damping
//! - [`metrics`] -- Vibe label, photo wait, and walking speed
//! - [`tick`] -- One tick: density, reconcile, motion, metrics
//! - [`runner`] -- Frame-paced and headless tick loops

pub mod config;
pub mod control;
pub mod density;
pub mod metrics;
pub mod motion;
pub mod params;
pub mod population;
pub mod runner;
pub mod tick;

pub use config::SimulationConfig;
pub use control::ParameterControl;
pub use density::{DensityPolicy, target_count};
pub use metrics::CrowdMetrics;
pub use motion::{MotionRule, density_damping};
pub use params::{ParamsError, ParamsUpdate, SimulationParams};
pub use population::{Population, SpawnRule, reconcile};
pub use tick::{SimulationState, TickError, TickSummary, run_tick};
