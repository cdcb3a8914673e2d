//! Warp a Web Mercator grid onto a regular geographic (EPSG:4326) raster.
//!
//! The output keeps the source pixel dimensions and spans the unprojected
//! outer cell edges. Each output pixel center is projected forward to
//! Mercator and sampled from the source at the corresponding fractional
//! cell index.

use projection::{forward, unproject_bbox};
use raster_common::{CrsCode, GeoRaster};
use tracing::debug;

use crate::config::ResamplingMethod;
use crate::error::{GridProcessorError, Result};
use crate::resample::BandView;
use crate::types::Grid;

/// Reproject a planar Mercator grid to geographic coordinates.
pub fn reproject_to_geographic(grid: &Grid, method: ResamplingMethod) -> Result<GeoRaster> {
    let spec = grid.spec;
    if spec.is_empty() || grid.data.len() != spec.len() {
        return Err(GridProcessorError::ProjectionError(format!(
            "grid {}x{} holds {} values",
            spec.nx,
            spec.ny,
            grid.data.len()
        )));
    }

    let bounds = unproject_bbox(&spec.cell_bounds());
    if ![bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(GridProcessorError::ProjectionError(format!(
            "grid bounds do not unproject: {:?}",
            bounds
        )));
    }

    let (width, height) = (spec.nx, spec.ny);
    let step_x = bounds.width() / width as f64;
    let step_y = bounds.height() / height as f64;
    let source = grid.to_f32();
    let band = BandView::new(&source, width, height).ok_or_else(|| {
        GridProcessorError::ProjectionError(format!("grid {}x{} is not a band", width, height))
    })?;

    let mut data = Vec::with_capacity(width * height);
    for oy in 0..height {
        let lat = bounds.max_y - (oy as f64 + 0.5) * step_y;
        for ox in 0..width {
            let lon = bounds.min_x + (ox as f64 + 0.5) * step_x;
            let (x, y) = forward(lon, lat);
            let col = (x - spec.origin_x) / spec.resolution;
            let row = (spec.origin_y - y) / spec.resolution;
            data.push(band.sample(method, col, row));
        }
    }

    debug!(
        width,
        height,
        min_lon = bounds.min_x,
        max_lat = bounds.max_y,
        resampling = method.as_str(),
        "Reprojected grid to EPSG:4326"
    );

    Ok(GeoRaster::new(width, height, bounds, CrsCode::Epsg4326, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::{BoundingBox, GridSpec};

    #[test]
    fn test_single_cell() {
        let spec = GridSpec::from_extent(&BoundingBox::new(0.0, 0.0, 0.0, 0.0), 100.0).unwrap();
        let grid = Grid { spec, data: vec![0.75] };
        let raster = reproject_to_geographic(&grid, ResamplingMethod::Nearest).unwrap();
        assert_eq!((raster.width, raster.height), (1, 1));
        assert_eq!(raster.data, vec![0.75]);
        assert_eq!(raster.crs, CrsCode::Epsg4326);
    }

    #[test]
    fn test_rejects_mismatched_data() {
        let spec = GridSpec::from_extent(&BoundingBox::new(0.0, 0.0, 300.0, 300.0), 100.0).unwrap();
        let grid = Grid { spec, data: vec![1.0] };
        assert!(reproject_to_geographic(&grid, ResamplingMethod::Nearest).is_err());
    }
}
