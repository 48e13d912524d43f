//! Per-tick frame pushed to canvas clients.
//!
//! A [`FrameBroadcast`] is a display-ready projection of one tick: the
//! parameters, the crowd indicators, and either the tourist dots or the
//! heatmap grid, depending on the display mode. The browser draws it as-is.

use promenade_core::TickSummary;
use promenade_types::{DisplayMode, Season, Tourist, TouristId, VibeLabel};
use serde::Serialize;
use ts_rs::TS;

use crate::heatmap::HeatmapGrid;

/// One tourist as a coloured dot.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentDot {
    /// Tourist id.
    pub id: TouristId,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// CSS colour string.
    pub color: String,
}

impl From<&Tourist> for AgentDot {
    fn from(t: &Tourist) -> Self {
        Self {
            id: t.id,
            x: t.position.x,
            y: t.position.y,
            color: t.color.css(),
        }
    }
}

/// Crowd indicators as shown in the stats panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FrameMetrics {
    /// Target tourist count.
    pub density: u32,
    /// Congestion label.
    pub vibe: VibeLabel,
    /// Estimated photo-spot wait, minutes.
    pub photo_wait_minutes: u32,
    /// Walking speed, one decimal place, km/h.
    pub walking_speed: String,
}

/// Everything a client needs to draw one tick.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FrameBroadcast {
    /// Tick number.
    #[ts(type = "number")]
    pub tick: u64,
    /// Current month.
    pub season: Season,
    /// Month name for display.
    pub season_name: String,
    /// Hour of day.
    pub hour: u8,
    /// How to draw this frame.
    pub display_mode: DisplayMode,
    /// Tourist count the density policy asked for.
    pub target_count: u32,
    /// Tourists alive after the tick.
    pub agents_alive: u32,
    /// Dots; empty in heatmap mode.
    pub agents: Vec<AgentDot>,
    /// Stats panel values.
    pub metrics: FrameMetrics,
    /// Density grid; present only in heatmap mode.
    pub heatmap: Option<HeatmapGrid>,
}

impl FrameBroadcast {
    /// Project a finished tick into a frame.
    pub fn from_tick<'a, I>(summary: &TickSummary, tourists: I) -> Self
    where
        I: IntoIterator<Item = &'a Tourist>,
    {
        let params = summary.params;
        let (agents, heatmap) = match params.display_mode {
            DisplayMode::Dots => (tourists.into_iter().map(AgentDot::from).collect(), None),
            DisplayMode::Heatmap => {
                let grid = HeatmapGrid::from_points(tourists.into_iter().map(|t| t.position));
                (Vec::new(), Some(grid))
            }
        };

        Self {
            tick: summary.tick,
            season: params.season,
            season_name: params.season.name().to_owned(),
            hour: params.hour(),
            display_mode: params.display_mode,
            target_count: summary.target_count,
            agents_alive: summary.agents_alive,
            agents,
            metrics: FrameMetrics {
                density: summary.metrics.density,
                vibe: summary.metrics.vibe,
                photo_wait_minutes: summary.metrics.photo_wait_minutes,
                walking_speed: summary.metrics.walking_speed.clone(),
            },
            heatmap,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use promenade_core::{SimulationConfig, SimulationParams, SimulationState, run_tick};
    use promenade_world::create_landmark_network;

    use super::*;

    fn tick_with(mode: DisplayMode) -> (TickSummary, SimulationState) {
        let mut state = SimulationState::new(
            create_landmark_network().unwrap(),
            &SimulationConfig::default(),
        );
        let params = SimulationParams::new(7, 19, mode).unwrap();
        let summary = run_tick(&mut state, &params).unwrap();
        (summary, state)
    }

    #[test]
    fn dots_mode_lists_every_tourist() {
        let (summary, state) = tick_with(DisplayMode::Dots);
        let frame = FrameBroadcast::from_tick(&summary, state.tourists());
        assert_eq!(frame.agents.len(), 720);
        assert!(frame.heatmap.is_none());
        assert_eq!(frame.season_name, "August");
        assert_eq!(frame.hour, 19);
        assert_eq!(frame.metrics.vibe, VibeLabel::Overwhelming);
        assert!(frame.agents.iter().all(|a| a.color.starts_with("hsl(")));
    }

    #[test]
    fn heatmap_mode_bins_instead_of_listing() {
        let (summary, state) = tick_with(DisplayMode::Heatmap);
        let frame = FrameBroadcast::from_tick(&summary, state.tourists());
        assert!(frame.agents.is_empty());
        let grid = frame.heatmap.unwrap();
        assert_eq!(grid.total(), 720);
    }

    #[test]
    fn export_bindings() {
        let _ = AgentDot::export_all();
        let _ = FrameMetrics::export_all();
        let _ = FrameBroadcast::export_all();
        let _ = HeatmapGrid::export_all();
    }
}
