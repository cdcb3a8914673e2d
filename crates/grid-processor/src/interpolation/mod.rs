//! Scattered-data interpolation of weighted fields onto grid points.
//!
//! The spatial structures are built once per run from the sample locations
//! and shared by every field and every column chunk:
//!
//! | Method  | Structure            | Outside the samples      |
//! |---------|----------------------|--------------------------|
//! | IDW     | [`NeighborIndex`]    | weighted mean of k nearest |
//! | Density | [`NeighborIndex`]    | sum of value / distance  |
//! | Nearest | [`NeighborIndex`]    | closest sample           |
//! | Linear  | [`Triangulation`]    | zero                     |

pub mod neighbors;
pub mod triangulation;

pub use neighbors::{interpolate_nearest, interpolate_weighted, NeighborIndex, Weighting};
pub use triangulation::Triangulation;

use raster_common::{InterpolationMethod, Samples, WeightedField};
use tracing::error;

use crate::config::InterpolationConfig;
use crate::error::{GridProcessorError, Result};

/// Interpolates every weighted field of a sample set.
pub struct SurfaceInterpolator<'a> {
    samples: &'a Samples,
    config: &'a InterpolationConfig,
    neighbors: Option<NeighborIndex>,
    triangulation: Option<Triangulation>,
}

impl<'a> SurfaceInterpolator<'a> {
    /// Build the structures the requested methods need.
    pub fn new(samples: &'a Samples, config: &'a InterpolationConfig) -> Result<Self> {
        if samples.fields.is_empty() {
            return Err(GridProcessorError::interpolation("no weighted fields to interpolate"));
        }
        if let Some(field) = samples.fields.iter().find(|f| f.values.len() != samples.len()) {
            return Err(GridProcessorError::interpolation(format!(
                "field '{}' has {} values for {} points",
                field.column,
                field.values.len(),
                samples.len()
            )));
        }

        let needs_neighbors = samples.fields.iter().any(|f| f.method.uses_neighbor_index());
        let needs_triangulation = samples
            .fields
            .iter()
            .any(|f| f.method == InterpolationMethod::Linear);

        let neighbors = if needs_neighbors {
            Some(NeighborIndex::build(&samples.points).map_err(|e| {
                error!(error = %e, "Failed to build spatial index");
                e
            })?)
        } else {
            None
        };

        let triangulation = if needs_triangulation {
            Some(Triangulation::build(&samples.points).map_err(|e| {
                error!(error = %e, "Failed to triangulate samples");
                e
            })?)
        } else {
            None
        };

        Ok(Self {
            samples,
            config,
            neighbors,
            triangulation,
        })
    }

    pub fn samples(&self) -> &Samples {
        self.samples
    }

    /// Interpolate one field at `targets` into `out`.
    pub fn interpolate_field(&self, field: &WeightedField, targets: &[[f64; 2]], out: &mut [f64]) -> Result<()> {
        match field.method {
            InterpolationMethod::Idw => interpolate_weighted(
                self.neighbor_index()?,
                &field.values,
                targets,
                Weighting::InverseDistance {
                    power: self.config.power,
                },
                self.config,
                out,
            ),
            InterpolationMethod::Density => interpolate_weighted(
                self.neighbor_index()?,
                &field.values,
                targets,
                Weighting::Density,
                self.config,
                out,
            ),
            InterpolationMethod::Nearest => {
                interpolate_nearest(self.neighbor_index()?, &field.values, targets, out)
            }
            InterpolationMethod::Linear => self
                .triangulation
                .as_ref()
                .ok_or_else(|| GridProcessorError::interpolation("triangulation was not built"))?
                .interpolate(&field.values, targets, out),
        }
    }

    /// Sum of every field at `targets`.
    pub fn interpolate_sum(&self, targets: &[[f64; 2]]) -> Result<Vec<f64>> {
        let mut total = vec![0.0; targets.len()];
        let mut scratch = vec![0.0; targets.len()];

        for field in &self.samples.fields {
            self.interpolate_field(field, targets, &mut scratch)
                .map_err(|e| {
                    error!(field = %field.column, method = %field.method, error = %e, "Interpolation failed");
                    e
                })?;
            for (t, v) in total.iter_mut().zip(&scratch) {
                *t += v;
            }
        }
        Ok(total)
    }

    fn neighbor_index(&self) -> Result<&NeighborIndex> {
        self.neighbors
            .as_ref()
            .ok_or_else(|| GridProcessorError::interpolation("spatial index was not built"))
    }
}
