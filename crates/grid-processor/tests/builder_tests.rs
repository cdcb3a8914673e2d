//! Grid construction tests: resolution tiers, chunking, method behavior.

use grid_processor::{GridBuilder, GridProcessorError, InterpolationConfig};
use raster_common::{BoundingBox, InterpolationMethod, Samples, WeightedField};
use test_utils::{assert_approx_eq, lattice_points, random_samples};

fn single_field(points: Vec<[f64; 2]>, values: Vec<f64>, method: InterpolationMethod) -> Samples {
    Samples {
        points,
        fields: vec![WeightedField {
            column: "value".to_string(),
            method,
            values,
        }],
    }
}

fn random_idw(count: usize, seed: u64) -> Samples {
    let (points, values) = random_samples(count, (0.0, 0.0, 8_000.0, 6_000.0), seed);
    single_field(points, values, InterpolationMethod::Idw)
}

// =============================================================================
// RESOLUTION TIERS
// =============================================================================

#[test]
fn test_fine_resolution_for_small_area() {
    let config = InterpolationConfig::default();
    let spec = GridBuilder::new(&config)
        .plan(&BoundingBox::new(0.0, 0.0, 1_000.0, 500.0))
        .unwrap();
    assert_eq!(spec.resolution, 100.0);
    assert_eq!((spec.nx, spec.ny), (10, 5));
}

#[test]
fn test_medium_resolution_above_1e9() {
    let config = InterpolationConfig::default();
    let spec = GridBuilder::new(&config)
        .plan(&BoundingBox::new(0.0, 0.0, 40_000.0, 40_000.0))
        .unwrap();
    assert_eq!(spec.resolution, 250.0);
    assert_eq!(spec.nx, 160);
}

#[test]
fn test_coarse_resolution_above_1e10() {
    let config = InterpolationConfig::default();
    let spec = GridBuilder::new(&config)
        .plan(&BoundingBox::new(0.0, 0.0, 200_000.0, 200_000.0))
        .unwrap();
    assert_eq!(spec.resolution, 500.0);
    assert_eq!((spec.nx, spec.ny), (400, 400));
}

// =============================================================================
// CHUNKING AND BATCHING
// =============================================================================

#[test]
fn test_chunk_and_batch_sizes_do_not_change_result() {
    let samples = random_idw(200, 42);
    let baseline = GridBuilder::new(&InterpolationConfig::default())
        .interpolate(&samples)
        .unwrap();

    for column_chunk_size in [3, 50, 1000] {
        for query_batch_size in [100, 1000, 10_000] {
            let config = InterpolationConfig {
                column_chunk_size,
                query_batch_size,
                ..Default::default()
            };
            let grid = GridBuilder::new(&config).interpolate(&samples).unwrap();
            assert_eq!(
                grid, baseline,
                "chunk {} batch {} changed the grid",
                column_chunk_size, query_batch_size
            );
        }
    }
}

#[test]
fn test_parallel_matches_sequential() {
    let samples = random_idw(150, 7);
    let sequential = InterpolationConfig {
        column_chunk_size: 10,
        ..Default::default()
    };
    let parallel = InterpolationConfig {
        parallel_chunks: true,
        ..sequential.clone()
    };

    let a = GridBuilder::new(&sequential).interpolate(&samples).unwrap();
    let b = GridBuilder::new(&parallel).interpolate(&samples).unwrap();
    assert_eq!(a, b);
}

// =============================================================================
// METHODS
// =============================================================================

#[test]
fn test_idw_reproduces_sample_on_grid_node() {
    // 5x5 lattice 500 m apart; every sample sits on a 100 m grid node
    let points = lattice_points(5, 5, 500.0);
    let values: Vec<f64> = (0..points.len()).map(|i| i as f64 + 1.0).collect();
    let samples = single_field(points, values, InterpolationMethod::Idw);

    let config = InterpolationConfig::default();
    let grid = GridBuilder::new(&config).interpolate(&samples).unwrap();
    assert_eq!((grid.width(), grid.height()), (20, 20));

    // Sample 6 is (500, 500): column 5, row (2000 - 500) / 100 = 15
    assert_approx_eq!(grid.get(5, 15).unwrap(), 7.0, 1e-9);
    // Sample 20 is the north-west corner (0, 2000)
    assert_approx_eq!(grid.get(0, 0).unwrap(), 21.0, 1e-9);
}

#[test]
fn test_coincident_points_average_under_idw() {
    let samples = single_field(
        vec![[1000.0, 1000.0], [1000.0, 1000.0]],
        vec![2.0, 4.0],
        InterpolationMethod::Idw,
    );
    let config = InterpolationConfig::default();
    let grid = GridBuilder::new(&config).interpolate(&samples).unwrap();
    assert_eq!((grid.width(), grid.height()), (1, 1));
    assert_approx_eq!(grid.data[0], 3.0, 1e-12);
}

#[test]
fn test_linear_is_zero_outside_hull() {
    let samples = single_field(
        vec![[0.0, 0.0], [1000.0, 0.0], [0.0, 1000.0]],
        vec![0.0, 10.0, 20.0],
        InterpolationMethod::Linear,
    );
    let config = InterpolationConfig::default();
    let grid = GridBuilder::new(&config).interpolate(&samples).unwrap();

    // Plane v = 0.01x + 0.02y inside the triangle
    assert_approx_eq!(grid.get(1, 8).unwrap(), 5.0, 1e-9);
    // (900, 1000) lies beyond the hypotenuse
    assert_eq!(grid.get(9, 0), Some(0.0));
}

#[test]
fn test_linear_needs_three_points() {
    let samples = single_field(
        vec![[0.0, 0.0], [1000.0, 0.0]],
        vec![1.0, 2.0],
        InterpolationMethod::Linear,
    );
    let config = InterpolationConfig::default();
    let err = GridBuilder::new(&config).interpolate(&samples).unwrap_err();
    assert!(matches!(err, GridProcessorError::InterpolationFailure(_)));
}

#[test]
fn test_fields_sum_cell_by_cell() {
    let (points, values) = random_samples(60, (0.0, 0.0, 3_000.0, 3_000.0), 3);
    let doubled: Vec<f64> = values.iter().map(|v| v * 2.0).collect();
    let config = InterpolationConfig::default();

    let one = single_field(points.clone(), values.clone(), InterpolationMethod::Idw);
    let two = Samples {
        points,
        fields: vec![
            WeightedField {
                column: "a".to_string(),
                method: InterpolationMethod::Idw,
                values,
            },
            WeightedField {
                column: "b".to_string(),
                method: InterpolationMethod::Idw,
                values: doubled,
            },
        ],
    };

    let single = GridBuilder::new(&config).interpolate(&one).unwrap();
    let summed = GridBuilder::new(&config).interpolate(&two).unwrap();
    for (s, t) in single.data.iter().zip(&summed.data) {
        assert_approx_eq!(*t, 3.0 * s, 1e-9);
    }
}

#[test]
fn test_empty_samples_fail() {
    let samples = single_field(Vec::new(), Vec::new(), InterpolationMethod::Idw);
    let config = InterpolationConfig::default();
    assert!(GridBuilder::new(&config).interpolate(&samples).is_err());
}

// =============================================================================
// NORMALIZATION
// =============================================================================

#[test]
fn test_normalized_grid_peaks_at_one() {
    let samples = random_idw(100, 11);
    let config = InterpolationConfig::default();
    let mut grid = GridBuilder::new(&config).interpolate(&samples).unwrap();

    let max = grid.normalize().unwrap();
    assert!(max > 0.0);
    assert_eq!(grid.max(), 1.0);
    assert!(grid.data.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_all_zero_values_cannot_normalize() {
    let samples = single_field(
        vec![[0.0, 0.0], [500.0, 500.0], [0.0, 500.0]],
        vec![0.0, 0.0, 0.0],
        InterpolationMethod::Idw,
    );
    let config = InterpolationConfig::default();
    let mut grid = GridBuilder::new(&config).interpolate(&samples).unwrap();
    assert!(matches!(
        grid.normalize(),
        Err(GridProcessorError::NormalizationDegenerate { .. })
    ));
}
