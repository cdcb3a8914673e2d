//! Reprojection of Mercator grids onto EPSG:4326 rasters.

use grid_processor::{reproject_to_geographic, GridBuilder, InterpolationConfig, ResamplingMethod};
use projection::forward;
use raster_common::{CrsCode, InterpolationMethod, Samples, WeightedField};
use test_utils::assert_approx_eq;

/// Two samples near 40N 100W: low in the south-west, high in the north-east.
fn diagonal_samples() -> Samples {
    let sw = forward(-100.0, 40.0);
    let ne = forward(-99.95, 40.04);
    Samples {
        points: vec![[sw.0, sw.1], [ne.0, ne.1]],
        fields: vec![WeightedField {
            column: "value".to_string(),
            method: InterpolationMethod::Nearest,
            values: vec![1.0, 9.0],
        }],
    }
}

#[test]
fn test_bounds_and_dimensions() {
    let config = InterpolationConfig::default();
    let grid = GridBuilder::new(&config).interpolate(&diagonal_samples()).unwrap();
    let raster = reproject_to_geographic(&grid, ResamplingMethod::Nearest).unwrap();

    assert_eq!(raster.crs, CrsCode::Epsg4326);
    assert_eq!((raster.width, raster.height), (grid.width(), grid.height()));
    assert_eq!(raster.data.len(), raster.width * raster.height);

    assert_approx_eq!(raster.bounds.min_x, -100.0, 0.001);
    assert_approx_eq!(raster.bounds.max_x, -99.95, 0.001);
    assert_approx_eq!(raster.bounds.min_y, 40.0, 0.001);
    assert_approx_eq!(raster.bounds.max_y, 40.04, 0.001);
}

#[test]
fn test_north_up_orientation() {
    let config = InterpolationConfig::default();
    let grid = GridBuilder::new(&config).interpolate(&diagonal_samples()).unwrap();
    let raster = reproject_to_geographic(&grid, ResamplingMethod::Nearest).unwrap();

    // Top-right pixel is the north-east sample, bottom-left the south-west one
    assert_eq!(raster.get(raster.width - 1, 0), Some(9.0));
    assert_eq!(raster.get(0, raster.height - 1), Some(1.0));
}

#[test]
fn test_bilinear_stays_within_sample_range() {
    let config = InterpolationConfig::default();
    let grid = GridBuilder::new(&config).interpolate(&diagonal_samples()).unwrap();
    let raster = reproject_to_geographic(&grid, ResamplingMethod::Bilinear).unwrap();

    assert!(raster
        .data
        .iter()
        .all(|v| v.is_finite() && *v >= 0.9999 && *v <= 9.0001));
}
