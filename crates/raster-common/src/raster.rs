//! Geo-referenced single-band rasters.

use crate::{BoundingBox, CrsCode};

/// A north-up raster with square-or-not pixels and a CRS tag.
///
/// Row 0 is the northern edge and column 0 the western edge; `data` is
/// row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRaster {
    pub width: usize,
    pub height: usize,
    /// Outer edges of the pixel grid
    pub bounds: BoundingBox,
    pub crs: CrsCode,
    pub data: Vec<f32>,
}

impl GeoRaster {
    pub fn new(width: usize, height: usize, bounds: BoundingBox, crs: CrsCode, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            bounds,
            crs,
            data,
        }
    }

    /// Pixel size as `(x, y)`, both positive.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            self.bounds.width() / self.width.max(1) as f64,
            self.bounds.height() / self.height.max(1) as f64,
        )
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Center of pixel `(x, y)` in CRS units.
    pub fn pixel_center(&self, x: usize, y: usize) -> (f64, f64) {
        let (sx, sy) = self.pixel_size();
        (
            self.bounds.min_x + (x as f64 + 0.5) * sx,
            self.bounds.max_y - (y as f64 + 0.5) * sy,
        )
    }

    pub fn max_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f32| m.max(v))))
    }
}
