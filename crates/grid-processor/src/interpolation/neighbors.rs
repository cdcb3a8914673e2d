//! k-nearest-neighbor interpolators: IDW, Density and Nearest.
//!
//! Grid points are queried in batches of `query_batch_size`. Each batch
//! fills a distance/index scratch buffer of `batch * k` entries; the buffer
//! is dropped back to zero capacity every `reclaim_every` batches so a long
//! run does not hold on to its high-water mark.

use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::debug;

use crate::config::InterpolationConfig;
use crate::error::{GridProcessorError, Result};

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over the sample locations, built once per run.
pub struct NeighborIndex {
    tree: RTree<IndexedPoint>,
    len: usize,
}

impl NeighborIndex {
    pub fn build(points: &[[f64; 2]]) -> Result<Self> {
        if points.is_empty() {
            return Err(GridProcessorError::interpolation(
                "cannot build a spatial index without points",
            ));
        }
        if let Some(bad) = points.iter().position(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return Err(GridProcessorError::interpolation(format!(
                "sample {} has non-finite coordinates",
                bad
            )));
        }

        let entries: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new(*p, i))
            .collect();

        let tree = RTree::bulk_load(entries);
        debug!(points = points.len(), "Spatial index built");
        Ok(Self {
            tree,
            len: points.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of neighbors actually used for a query.
    pub fn k(&self, max_neighbors: usize) -> usize {
        max_neighbors.min(self.len)
    }

    /// Append the `k` nearest samples to `target` as `(distance, index)`,
    /// closest first.
    fn query_into(&self, target: &[f64; 2], k: usize, distances: &mut Vec<f64>, indices: &mut Vec<usize>) -> Result<()> {
        let before = indices.len();
        for (entry, distance_2) in self.tree.nearest_neighbor_iter_with_distance_2(target).take(k) {
            distances.push(distance_2.sqrt());
            indices.push(entry.data);
        }
        if indices.len() - before != k {
            return Err(GridProcessorError::interpolation(format!(
                "neighbor query returned {} of {} points",
                indices.len() - before,
                k
            )));
        }
        Ok(())
    }

    /// Value of the closest sample.
    fn nearest(&self, target: &[f64; 2]) -> Result<usize> {
        self.tree
            .nearest_neighbor(target)
            .map(|entry| entry.data)
            .ok_or_else(|| GridProcessorError::interpolation("nearest neighbor query on empty index"))
    }
}

/// How neighbor distances become weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weighting {
    /// `Σ(w·v) / Σw` with `w = 1/d^power`
    InverseDistance { power: f64 },
    /// `Σ(v/d)`, deliberately not normalized
    Density,
}

/// Reusable query buffers.
#[derive(Default)]
struct QueryScratch {
    distances: Vec<f64>,
    indices: Vec<usize>,
}

impl QueryScratch {
    fn clear(&mut self) {
        self.distances.clear();
        self.indices.clear();
    }

    fn reclaim(&mut self) {
        self.clear();
        self.distances.shrink_to_fit();
        self.indices.shrink_to_fit();
    }
}

/// Interpolate `values` at every target with distance weighting.
///
/// `out` must be as long as `targets`.
pub fn interpolate_weighted(
    index: &NeighborIndex,
    values: &[f64],
    targets: &[[f64; 2]],
    weighting: Weighting,
    config: &InterpolationConfig,
    out: &mut [f64],
) -> Result<()> {
    check_lengths(index, values, targets, out)?;

    let k = index.k(config.max_neighbors);
    let batch_size = config.query_batch_size.max(1);
    let batches = targets.len().div_ceil(batch_size);
    let mut scratch = QueryScratch::default();

    for (batch, (chunk, out_chunk)) in targets
        .chunks(batch_size)
        .zip(out.chunks_mut(batch_size))
        .enumerate()
    {
        scratch.clear();
        for target in chunk {
            index.query_into(target, k, &mut scratch.distances, &mut scratch.indices)?;
        }

        for (t, slot) in out_chunk.iter_mut().enumerate() {
            let distances = &scratch.distances[t * k..(t + 1) * k];
            let neighbors = &scratch.indices[t * k..(t + 1) * k];
            *slot = combine(distances, neighbors, values, weighting, config.distance_epsilon);
        }

        debug!(batch = batch + 1, batches, "Processed neighbor batch");

        if config.reclaim_every > 0 && batch % config.reclaim_every == 0 {
            scratch.reclaim();
        }
    }

    Ok(())
}

fn combine(distances: &[f64], neighbors: &[usize], values: &[f64], weighting: Weighting, epsilon: f64) -> f64 {
    match weighting {
        Weighting::InverseDistance { power } => {
            let mut weighted = 0.0;
            let mut total = 0.0;
            for (&d, &i) in distances.iter().zip(neighbors) {
                let w = 1.0 / d.max(epsilon).powf(power);
                weighted += w * values[i];
                total += w;
            }
            weighted / total
        }
        Weighting::Density => distances
            .iter()
            .zip(neighbors)
            .map(|(&d, &i)| values[i] / d.max(epsilon))
            .sum(),
    }
}

/// Value of the closest sample at every target; defined everywhere.
pub fn interpolate_nearest(index: &NeighborIndex, values: &[f64], targets: &[[f64; 2]], out: &mut [f64]) -> Result<()> {
    check_lengths(index, values, targets, out)?;

    for (target, slot) in targets.iter().zip(out.iter_mut()) {
        *slot = values[index.nearest(target)?];
    }
    Ok(())
}

fn check_lengths(index: &NeighborIndex, values: &[f64], targets: &[[f64; 2]], out: &[f64]) -> Result<()> {
    if values.len() != index.len() {
        return Err(GridProcessorError::interpolation(format!(
            "{} values for {} indexed points",
            values.len(),
            index.len()
        )));
    }
    if targets.len() != out.len() {
        return Err(GridProcessorError::interpolation(format!(
            "{} targets but {} output cells",
            targets.len(),
            out.len()
        )));
    }
    Ok(())
}
