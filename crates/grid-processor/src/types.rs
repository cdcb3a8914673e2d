//! Core types for grid processing.

use raster_common::GridSpec;

use crate::error::{GridProcessorError, Result};

/// A regular planar grid of interpolated values.
///
/// `data` is row-major with row 0 at `spec.origin_y` (north), so
/// `data[spec.flat_index(i, j)]` is the value at `(spec.x_at(i), spec.y_at(j))`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub spec: GridSpec,
    pub data: Vec<f64>,
}

impl Grid {
    /// A grid of zeros.
    pub fn zeros(spec: GridSpec) -> Self {
        Self {
            data: vec![0.0; spec.len()],
            spec,
        }
    }

    pub fn width(&self) -> usize {
        self.spec.nx
    }

    pub fn height(&self) -> usize {
        self.spec.ny
    }

    /// Value at column `i`, row `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.spec.nx || j >= self.spec.ny {
            return None;
        }
        self.data.get(self.spec.flat_index(i, j)).copied()
    }

    /// Largest value, ignoring NaN.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Divide every cell by the grid maximum and return that maximum.
    ///
    /// A non-positive or non-finite maximum is rejected: zero would turn the
    /// grid into NaN/Inf and a negative one would flip it above 1.
    pub fn normalize(&mut self) -> Result<f64> {
        let max = self.max();
        if !max.is_finite() || max <= 0.0 {
            return Err(GridProcessorError::NormalizationDegenerate { max });
        }

        for value in &mut self.data {
            *value /= max;
        }
        Ok(max)
    }

    /// Cast to 32-bit floats, keeping the row-major layout.
    pub fn to_f32(&self) -> Vec<f32> {
        self.data.iter().map(|&v| v as f32).collect()
    }
}
