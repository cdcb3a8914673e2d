//! Pipeline stages and the single failure type surfaced to callers.

use std::fmt;

use grid_processor::GridProcessorError;
use ingestion::IngestionError;
use raster_common::{CommonError, ErrorKind};
use renderer::RenderError;
use serde::Serialize;
use thiserror::Error;

/// Pipeline state machine.
///
/// `Idle` → `Parsing` → `Projecting` → `Interpolating` → `Normalizing` →
/// `Reprojecting` → `Indexing` → `AlphaConverting` → `Done`. A failure in
/// any stage moves straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Parsing,
    Projecting,
    Interpolating,
    Normalizing,
    Reprojecting,
    Indexing,
    AlphaConverting,
    Done,
    Failed,
}

impl PipelineStage {
    /// Stage that follows on success; `None` once finished.
    pub fn next(self) -> Option<Self> {
        use PipelineStage::*;
        match self {
            Idle => Some(Parsing),
            Parsing => Some(Projecting),
            Projecting => Some(Interpolating),
            Interpolating => Some(Normalizing),
            Normalizing => Some(Reprojecting),
            Reprojecting => Some(Indexing),
            Indexing => Some(AlphaConverting),
            AlphaConverting => Some(Done),
            Done | Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsing => "parsing",
            Self::Projecting => "projecting",
            Self::Interpolating => "interpolating",
            Self::Normalizing => "normalizing",
            Self::Reprojecting => "reprojecting",
            Self::Indexing => "indexing",
            Self::AlphaConverting => "alpha_converting",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cause of a stage failure.
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Grid(#[from] GridProcessorError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Ingestion(e) => e.kind(),
            Self::Grid(e) => e.kind(),
            Self::Render(e) => e.kind(),
            Self::Common(e) => e.kind(),
        }
    }
}

/// A failed pipeline run.
#[derive(Error, Debug)]
#[error("pipeline failed while {stage} ({}): {source}", .source.kind())]
pub struct PipelineError {
    pub stage: PipelineStage,
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: PipelineStage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Errors loading a [`PipelineConfig`](crate::PipelineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error(transparent)]
    Grid(#[from] GridProcessorError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let mut stage = PipelineStage::Idle;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen.len(), 9);
        assert_eq!(seen.last(), Some(&PipelineStage::Done));
        assert!(PipelineStage::Failed.next().is_none());
    }

    #[test]
    fn test_error_kind_and_message() {
        let err = PipelineError::new(
            PipelineStage::Normalizing,
            GridProcessorError::NormalizationDegenerate { max: 0.0 },
        );
        assert_eq!(err.kind(), ErrorKind::NormalizationDegenerate);
        assert!(err.to_string().starts_with("pipeline failed while normalizing"));
    }
}
