//! Grid construction: resolution choice, column chunking and assembly.
//!
//! The grid covers the sample extent starting at its north-west corner. Its
//! columns are split into contiguous chunks of roughly
//! `column_chunk_size` columns; every chunk is interpolated independently
//! (field by field, then summed) and written back at its column offset, so
//! chunk boundaries never change the result.

use std::ops::Range;

use rayon::prelude::*;
use raster_common::{BoundingBox, GridSpec, Samples};
use tracing::{debug, info};

use crate::config::InterpolationConfig;
use crate::error::{GridProcessorError, Result};
use crate::interpolation::SurfaceInterpolator;
use crate::types::Grid;

/// Split `nx` columns into `floor(width / (resolution * chunk_size)) + 1`
/// near-equal contiguous ranges, larger ranges first.
pub fn column_chunks(nx: usize, width: f64, resolution: f64, chunk_size: usize) -> Vec<Range<usize>> {
    if nx == 0 {
        return Vec::new();
    }

    let span = resolution * chunk_size.max(1) as f64;
    let wanted = if span > 0.0 && width.is_finite() {
        (width / span).floor() as usize + 1
    } else {
        1
    };
    let count = wanted.clamp(1, nx);

    let base = nx / count;
    let extra = nx % count;
    let mut ranges = Vec::with_capacity(count);
    let mut start = 0;
    for c in 0..count {
        let len = base + usize::from(c < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Builds interpolated grids from samples.
pub struct GridBuilder<'a> {
    config: &'a InterpolationConfig,
}

impl<'a> GridBuilder<'a> {
    pub fn new(config: &'a InterpolationConfig) -> Self {
        Self { config }
    }

    /// Grid layout for the sample extent.
    pub fn plan(&self, extent: &BoundingBox) -> Result<GridSpec> {
        let resolution = self.config.resolution_tiers.select(extent.area());
        Ok(GridSpec::from_extent(extent, resolution)?)
    }

    /// Interpolate and sum every field of `samples` over the full grid.
    pub fn interpolate(&self, samples: &Samples) -> Result<Grid> {
        let extent = samples
            .extent()
            .ok_or_else(|| GridProcessorError::interpolation("no samples with finite coordinates"))?;
        let spec = self.plan(&extent)?;
        let chunks = column_chunks(
            spec.nx,
            extent.width(),
            spec.resolution,
            self.config.column_chunk_size,
        );

        info!(
            area = extent.area(),
            resolution = spec.resolution,
            nx = spec.nx,
            ny = spec.ny,
            chunks = chunks.len(),
            parallel = self.config.parallel_chunks,
            "Interpolating grid"
        );

        let interpolator = SurfaceInterpolator::new(samples, self.config)?;

        let evaluate = |range: &Range<usize>| evaluate_chunk(&interpolator, &spec, range.clone());
        let results: Vec<Vec<f64>> = if self.config.parallel_chunks {
            chunks.par_iter().map(evaluate).collect::<Result<_>>()?
        } else {
            chunks.iter().map(evaluate).collect::<Result<_>>()?
        };

        let mut grid = Grid::zeros(spec);
        for (range, values) in chunks.iter().zip(results) {
            // Chunk values are column-major: all rows of column i, then i + 1
            for (offset, column) in values.chunks(spec.ny).enumerate() {
                let i = range.start + offset;
                for (j, value) in column.iter().enumerate() {
                    grid.data[spec.flat_index(i, j)] = *value;
                }
            }
        }

        Ok(grid)
    }
}

fn evaluate_chunk(interpolator: &SurfaceInterpolator<'_>, spec: &GridSpec, columns: Range<usize>) -> Result<Vec<f64>> {
    let mut targets = Vec::with_capacity(columns.len() * spec.ny);
    for i in columns.clone() {
        let x = spec.x_at(i);
        for j in 0..spec.ny {
            targets.push([x, spec.y_at(j)]);
        }
    }

    let values = interpolator.interpolate_sum(&targets)?;
    debug!(
        first_column = columns.start,
        columns = columns.len(),
        cells = values.len(),
        "Chunk interpolated"
    );
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::{InterpolationMethod, WeightedField};

    #[test]
    fn test_column_chunks_like_array_split() {
        // 10 columns in 3 chunks: 4, 3, 3
        let chunks = column_chunks(10, 2000.0, 100.0, 10);
        assert_eq!(chunks, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn test_single_chunk_for_small_grid() {
        assert_eq!(column_chunks(7, 650.0, 100.0, 1000), vec![0..7]);
    }

    #[test]
    fn test_chunks_capped_at_columns() {
        let chunks = column_chunks(2, 10_000.0, 100.0, 1);
        assert_eq!(chunks, vec![0..1, 1..2]);
    }

    #[test]
    fn test_chunks_cover_all_columns() {
        for nx in [1, 5, 17, 100, 1001] {
            let chunks = column_chunks(nx, nx as f64 * 100.0, 100.0, 7);
            assert_eq!(chunks.first().unwrap().start, 0);
            assert_eq!(chunks.last().unwrap().end, nx);
            assert!(chunks.windows(2).all(|w| w[0].end == w[1].start));
        }
    }

    #[test]
    fn test_interpolate_orientation() {
        // Low values in the south-west, high in the north-east
        let samples = Samples {
            points: vec![[0.0, 0.0], [1000.0, 1000.0]],
            fields: vec![WeightedField {
                column: "v".to_string(),
                method: InterpolationMethod::Nearest,
                values: vec![1.0, 9.0],
            }],
        };
        let config = InterpolationConfig::default();
        let grid = GridBuilder::new(&config).interpolate(&samples).unwrap();

        assert_eq!(grid.spec.resolution, 100.0);
        assert_eq!((grid.width(), grid.height()), (10, 10));
        // Row 0 is the top (y = 1000), column 0 the west (x = 0)
        assert_eq!(grid.get(9, 0), Some(9.0));
        assert_eq!(grid.get(0, 9), Some(1.0));
    }
}
