//! Piecewise linear interpolation over a Delaunay triangulation.
//!
//! The triangulation is bulk loaded into `spade`, which uses exact
//! orientation and in-circle predicates, so flat or near-collinear hull
//! triangles survive and millions-of-meters coordinates need no rescaling.
//! Exact duplicate points keep their first occurrence. Grid cells outside
//! the convex hull receive zero.

use std::collections::HashMap;

use spade::{DelaunayTriangulation, FloatTriangulation as _, HasPosition, Point2, Triangulation as _};
use tracing::debug;

use crate::error::{GridProcessorError, Result};

/// A unique sample position and the index of the sample it came from.
#[derive(Debug, Clone, Copy)]
struct Vertex {
    position: Point2<f64>,
    source: usize,
}

impl HasPosition for Vertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Delaunay triangulation of the sample points.
pub struct Triangulation {
    mesh: DelaunayTriangulation<Vertex>,
    /// Highest original sample index referenced by a vertex
    max_source: usize,
}

impl Triangulation {
    /// Triangulate `points`.
    ///
    /// Fails when fewer than three distinct, non-collinear points exist.
    pub fn build(points: &[[f64; 2]]) -> Result<Self> {
        if points.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return Err(GridProcessorError::interpolation(
                "cannot triangulate non-finite coordinates",
            ));
        }

        // Deduplicate on exact coordinates
        let mut seen: HashMap<(u64, u64), usize> = HashMap::new();
        let mut vertices = Vec::new();
        for (i, p) in points.iter().enumerate() {
            let key = (p[0].to_bits(), p[1].to_bits());
            if seen.insert(key, i).is_none() {
                vertices.push(Vertex {
                    position: Point2::new(p[0], p[1]),
                    source: i,
                });
            }
        }

        if vertices.len() < 3 {
            return Err(GridProcessorError::interpolation(format!(
                "linear interpolation needs at least 3 distinct points, got {}",
                vertices.len()
            )));
        }

        let unique = vertices.len();
        let max_source = vertices.iter().map(|v| v.source).max().unwrap_or(0);
        let mesh = DelaunayTriangulation::<Vertex>::bulk_load(vertices).map_err(|e| {
            GridProcessorError::interpolation(format!("triangulation failed: {:?}", e))
        })?;

        if mesh.num_inner_faces() == 0 {
            return Err(GridProcessorError::interpolation(
                "linear interpolation needs non-collinear points",
            ));
        }

        debug!(
            points = unique,
            triangles = mesh.num_inner_faces(),
            "Delaunay triangulation built"
        );

        Ok(Self { mesh, max_source })
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.num_inner_faces()
    }

    /// Interpolate `values` (one per original sample) at every target.
    pub fn interpolate(&self, values: &[f64], targets: &[[f64; 2]], out: &mut [f64]) -> Result<()> {
        if targets.len() != out.len() {
            return Err(GridProcessorError::interpolation(format!(
                "{} targets but {} output cells",
                targets.len(),
                out.len()
            )));
        }
        if self.max_source >= values.len() {
            return Err(GridProcessorError::interpolation(format!(
                "{} values for a triangulation over more samples",
                values.len()
            )));
        }

        let barycentric = self.mesh.barycentric();
        for (target, slot) in targets.iter().zip(out.iter_mut()) {
            *slot = barycentric
                .interpolate(|v| values[v.data().source], Point2::new(target[0], target[1]))
                .unwrap_or(0.0);
        }
        Ok(())
    }
}
