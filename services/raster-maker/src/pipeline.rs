//! Pipeline orchestration: input bytes to a [`LayerBundle`].
//!
//! Each run walks the [`PipelineStage`] state machine in order. Stage errors
//! are logged once with their stage and kind, then returned as a single
//! [`PipelineError`]; nothing partial is returned on failure.

use std::time::Instant;

use bytes::Bytes;
use grid_processor::{reproject_to_geographic, GridBuilder};
use ingestion::{prepare_samples, provide_columns, GeomSpec, Table};
use raster_common::{LayerBundle, LayerRecord, WeightSpec};
use renderer::{convert_to_alpha, geotiff_bytes, read_geotiff, PixelIndex};
use tracing::{debug, error, info, info_span, Span};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineStage, StageError};

/// Single-shot point-to-raster pipeline.
///
/// Logging goes to the span the pipeline was created with, so callers can
/// attach run context (layer title, request id) once.
pub struct Pipeline {
    config: PipelineConfig,
    span: Span,
    stage: PipelineStage,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_span(config, info_span!("pipeline"))
    }

    pub fn with_span(config: PipelineConfig, span: Span) -> Self {
        Self {
            config,
            span,
            stage: PipelineStage::Idle,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stage reached by the last run.
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Numeric columns of an upload, in table order.
    pub fn columns(&self, input: &[u8]) -> Result<Vec<String>, PipelineError> {
        let _guard = self.span.enter();
        provide_columns(input, &self.config.ingestion).map_err(|e| {
            let err = PipelineError::new(PipelineStage::Parsing, e);
            error!(stage = %err.stage, kind = %err.kind(), error = %err.source, "Column listing failed");
            err
        })
    }

    /// Run every stage over `input`.
    pub fn run(&mut self, input: &[u8], weights: &WeightSpec, geom: &GeomSpec) -> Result<LayerBundle, PipelineError> {
        let Self { config, span, stage } = self;
        let _guard = span.enter();
        let started = Instant::now();
        *stage = PipelineStage::Idle;

        info!(
            input_bytes = input.len(),
            fields = weights.len(),
            lat = %geom.lat,
            lon = %geom.lon,
            "Starting pipeline run"
        );

        let table = advance(stage, || Table::read(input, &config.ingestion))?;
        let rows = table.n_rows();

        let samples = advance(stage, || prepare_samples(table, geom, weights))?;

        let interpolation = &config.interpolation;
        let mut grid = advance(stage, || GridBuilder::new(interpolation).interpolate(&samples))?;

        let max = advance(stage, || grid.normalize())?;

        let render = &config.render;
        let raster_bytes = advance(stage, || -> Result<Vec<u8>, StageError> {
            let raster = reproject_to_geographic(&grid, interpolation.resampling)?;
            Ok(geotiff_bytes(&raster, render.tiff_compression)?)
        })?;

        let index_json = advance(stage, || -> Result<String, StageError> {
            Ok(PixelIndex::from_tiff_bytes(&raster_bytes)?.to_json()?)
        })?;

        let alpha = advance(stage, || -> Result<_, StageError> {
            let raster = read_geotiff(&raster_bytes)?;
            Ok(convert_to_alpha(&raster, render)?)
        })?;

        *stage = PipelineStage::Done;
        info!(
            rows,
            points = samples.len(),
            grid_width = grid.width(),
            grid_height = grid.height(),
            resolution = grid.spec.resolution,
            max,
            raster_bytes = raster_bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline run complete"
        );

        Ok(LayerBundle {
            raster: Bytes::from(raster_bytes),
            index_json,
            alpha_png: Bytes::from(alpha.png),
            alpha_tiff: alpha.tiff.map(Bytes::from),
        })
    }

    /// Run over a stored record and return it with fresh outputs.
    pub fn render_record(&mut self, record: &LayerRecord) -> Result<(LayerRecord, LayerBundle), PipelineError> {
        let weights = WeightSpec::from_json(&record.col_weights).map_err(|e| {
            self.stage = PipelineStage::Failed;
            let err = PipelineError::new(PipelineStage::Parsing, e);
            error!(parent: &self.span, title = %record.title, error = %err, "Invalid weight spec");
            err
        })?;
        let geom = GeomSpec::new(record.geom_lat.clone(), record.geom_lon.clone());

        let bundle = self.run(&record.input, &weights, &geom)?;
        Ok((record.with_bundle(&bundle), bundle))
    }
}

/// Enter the stage after `current` and run `f` in it, failing the run on error.
fn advance<T, E, F>(current: &mut PipelineStage, f: F) -> Result<T, PipelineError>
where
    E: Into<StageError>,
    F: FnOnce() -> Result<T, E>,
{
    let stage = current.next().unwrap_or(PipelineStage::Failed);
    *current = stage;
    debug!(stage = %stage, "Entering stage");

    f().map_err(|e| {
        *current = PipelineStage::Failed;
        let err = PipelineError::new(stage, e);
        error!(stage = %stage, kind = %err.kind(), error = %err.source, "Pipeline stage failed");
        err
    })
}
