//! Regular planar grid specification.
//!
//! Columns run west to east starting at `origin_x`, rows run north to south
//! starting at `origin_y`. Cell values are addressed in row-major order, so
//! the flat index of column `i`, row `j` is `j * nx + i`. Coordinates name
//! cell centers.

use crate::error::{CommonError, CommonResult};
use crate::BoundingBox;
use serde::{Deserialize, Serialize};

/// Specification of a regular grid in planar units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns (x direction)
    pub nx: usize,
    /// Number of rows (y direction)
    pub ny: usize,
    /// Cell size in planar units, identical for both axes
    pub resolution: f64,
    /// X of the first (westernmost) column
    pub origin_x: f64,
    /// Y of the first (northernmost) row
    pub origin_y: f64,
}

impl GridSpec {
    /// Cover `extent` with cells of `resolution`, starting at its north-west corner.
    ///
    /// The column count is `ceil(width / resolution)` and the row count
    /// `ceil(height / resolution)`, never less than one.
    pub fn from_extent(extent: &BoundingBox, resolution: f64) -> CommonResult<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(CommonError::InvalidGrid(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        if !(extent.width().is_finite() && extent.height().is_finite())
            || extent.width() < 0.0
            || extent.height() < 0.0
        {
            return Err(CommonError::InvalidGrid(format!(
                "invalid extent {:?}",
                extent
            )));
        }

        let nx = ((extent.width() / resolution).ceil() as usize).max(1);
        let ny = ((extent.height() / resolution).ceil() as usize).max(1);

        Ok(Self {
            nx,
            ny,
            resolution,
            origin_x: extent.min_x,
            origin_y: extent.max_y,
        })
    }

    /// X coordinate of column `i`.
    pub fn x_at(&self, i: usize) -> f64 {
        self.origin_x + i as f64 * self.resolution
    }

    /// Y coordinate of row `j`.
    pub fn y_at(&self, j: usize) -> f64 {
        self.origin_y - j as f64 * self.resolution
    }

    /// Convert coordinates to the nearest grid index.
    pub fn coord_to_index(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let i = ((x - self.origin_x) / self.resolution).round() as isize;
        let j = ((self.origin_y - y) / self.resolution).round() as isize;

        if i < 0 || j < 0 || i >= self.nx as isize || j >= self.ny as isize {
            return None;
        }

        Some((i as usize, j as usize))
    }

    /// Get the 1D array index for a 2D grid position.
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// Extent covered by the cell edges (half a cell beyond the outer centers).
    pub fn cell_bounds(&self) -> BoundingBox {
        let half = self.resolution / 2.0;
        BoundingBox::new(
            self.origin_x - half,
            self.y_at(self.ny - 1) - half,
            self.x_at(self.nx - 1) + half,
            self.origin_y + half,
        )
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }
}
