//! Coarse crowd-density grid for heatmap mode.
//!
//! The plane is cut into [`GRID_COLS`] by [`GRID_ROWS`] cells and each
//! tourist is counted in the cell containing it. Positions outside the plane
//! (jittered spawns near an edge) are clamped into the border cells.

use promenade_types::Point;
use promenade_world::{PLANE_HEIGHT, PLANE_WIDTH};
use serde::Serialize;
use ts_rs::TS;

/// Cells across.
pub const GRID_COLS: usize = 20;

/// Cells down.
pub const GRID_ROWS: usize = 15;

/// Tourist counts per cell, row-major from the top-left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HeatmapGrid {
    /// Number of columns.
    pub cols: u32,
    /// Number of rows.
    pub rows: u32,
    /// `cols * rows` counts; cell `(c, r)` is at `r * cols + c`.
    pub counts: Vec<u32>,
    /// Largest single-cell count, for colour scaling.
    pub max: u32,
}

impl HeatmapGrid {
    /// Bin `points` into a fresh grid.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let mut counts = vec![0_u32; GRID_COLS.saturating_mul(GRID_ROWS)];
        for point in points {
            if let Some(cell) = counts.get_mut(cell_index(point)) {
                *cell = cell.saturating_add(1);
            }
        }
        let max = counts.iter().copied().max().unwrap_or(0);
        Self {
            cols: u32::try_from(GRID_COLS).unwrap_or(u32::MAX),
            rows: u32::try_from(GRID_ROWS).unwrap_or(u32::MAX),
            counts,
            max,
        }
    }

    /// Count in cell `(col, row)`, or `None` off the grid.
    pub fn count_at(&self, col: usize, row: usize) -> Option<u32> {
        if col >= GRID_COLS {
            return None;
        }
        let index = row.checked_mul(GRID_COLS)?.checked_add(col)?;
        self.counts.get(index).copied()
    }

    /// Total tourists binned.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Row-major cell index for `point`.
fn cell_index(point: Point) -> usize {
    let col = axis_cell(point.x, PLANE_WIDTH, GRID_COLS);
    let row = axis_cell(point.y, PLANE_HEIGHT, GRID_ROWS);
    row.saturating_mul(GRID_COLS).saturating_add(col)
}

/// Cell along one axis, clamped to `0..cells`.
fn axis_cell(value: f64, extent: f64, cells: usize) -> usize {
    let last = cells.saturating_sub(1);
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let scaled = (value / extent * f64::from(u32::try_from(cells).unwrap_or(u32::MAX))).floor();
    // `scaled` is finite and non-negative here, and is clamped below.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cell = scaled as usize;
    cell.min(last)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_has_the_right_shape() {
        let grid = HeatmapGrid::from_points(std::iter::empty());
        assert_eq!(grid.cols, 20);
        assert_eq!(grid.rows, 15);
        assert_eq!(grid.counts.len(), 300);
        assert_eq!(grid.max, 0);
        assert_eq!(grid.total(), 0);
    }

    #[test]
    fn corners_land_in_corner_cells() {
        let grid = HeatmapGrid::from_points([
            Point::new(0.0, 0.0),
            Point::new(799.0, 599.0),
            Point::new(800.0, 600.0),
        ]);
        assert_eq!(grid.count_at(0, 0), Some(1));
        assert_eq!(grid.count_at(19, 14), Some(2));
    }

    #[test]
    fn out_of_plane_points_are_clamped() {
        let grid = HeatmapGrid::from_points([
            Point::new(-30.0, 300.0),
            Point::new(900.0, -5.0),
            Point::new(f64::NAN, 10.0),
        ]);
        assert_eq!(grid.total(), 3);
        assert_eq!(grid.count_at(0, 7), Some(1));
        assert_eq!(grid.count_at(19, 0), Some(1));
        assert_eq!(grid.count_at(0, 0), Some(1));
    }

    #[test]
    fn cells_are_forty_units_square() {
        let grid = HeatmapGrid::from_points([
            Point::new(39.9, 39.9),
            Point::new(40.0, 40.0),
            Point::new(45.0, 41.0),
        ]);
        assert_eq!(grid.count_at(0, 0), Some(1));
        assert_eq!(grid.count_at(1, 1), Some(2));
        assert_eq!(grid.max, 2);
    }

    #[test]
    fn off_grid_lookup_is_none() {
        let grid = HeatmapGrid::from_points(std::iter::empty());
        assert_eq!(grid.count_at(20, 0), None);
        assert_eq!(grid.count_at(0, 15), None);
    }
}
