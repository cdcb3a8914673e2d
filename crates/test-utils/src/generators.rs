//! Test data generators for synthetic point samples.
//!
//! All generators are seeded so a failing test reproduces exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random planar points inside `(min_x, min_y, max_x, max_y)` with values in `[0, 100)`.
///
/// # Example
///
/// ```
/// use test_utils::random_samples;
///
/// let (points, values) = random_samples(10, (0.0, 0.0, 1000.0, 1000.0), 7);
/// assert_eq!(points.len(), 10);
/// assert_eq!(values.len(), 10);
/// ```
pub fn random_samples(
    count: usize,
    extent: (f64, f64, f64, f64),
    seed: u64,
) -> (Vec<[f64; 2]>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (min_x, min_y, max_x, max_y) = extent;

    let mut points = Vec::with_capacity(count);
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        points.push([rng.gen_range(min_x..max_x), rng.gen_range(min_y..max_y)]);
        values.push(rng.gen_range(0.0..100.0));
    }
    (points, values)
}

/// A CSV upload of random geographic points with `lat`, `lon` and `value` columns.
pub fn random_points_csv(count: usize, extent: (f64, f64, f64, f64), seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let (min_lon, min_lat, max_lon, max_lat) = extent;

    let mut csv = String::from("id,lat,lon,value\n");
    for id in 0..count {
        let lat: f64 = rng.gen_range(min_lat..max_lat);
        let lon: f64 = rng.gen_range(min_lon..max_lon);
        let value: f64 = rng.gen_range(1.0..100.0);
        csv.push_str(&format!("{},{:.6},{:.6},{:.3}\n", id, lat, lon, value));
    }
    csv
}

/// Points on a regular lattice, `nx` by `ny`, spaced `step` apart from the origin.
pub fn lattice_points(nx: usize, ny: usize, step: f64) -> Vec<[f64; 2]> {
    let mut points = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            points.push([i as f64 * step, j as f64 * step]);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_samples_deterministic() {
        let a = random_samples(5, (0.0, 0.0, 10.0, 10.0), 42);
        let b = random_samples(5, (0.0, 0.0, 10.0, 10.0), 42);
        assert_eq!(a, b);
        assert!(a.0.iter().all(|p| p[0] >= 0.0 && p[0] < 10.0));
    }

    #[test]
    fn test_random_points_csv_shape() {
        let csv = random_points_csv(3, (-100.0, 40.0, -99.0, 41.0), 1);
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.starts_with("id,lat,lon,value\n"));
    }

    #[test]
    fn test_lattice() {
        let points = lattice_points(3, 2, 10.0);
        assert_eq!(points.len(), 6);
        assert_eq!(points[4], [10.0, 10.0]);
    }
}
