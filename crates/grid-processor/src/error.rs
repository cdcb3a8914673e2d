//! Error types for grid processing.

use raster_common::{CommonError, ErrorKind};
use thiserror::Error;

/// Errors that can occur while building, normalizing or reprojecting a grid.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// Spatial index construction or querying failed.
    #[error("interpolation error: {0}")]
    InterpolationFailure(String),

    /// The assembled grid cannot be normalized.
    #[error("cannot normalize grid with maximum {max}")]
    NormalizationDegenerate { max: f64 },

    /// Reprojection produced an unusable raster.
    #[error("projection error: {0}")]
    ProjectionError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid grid or sample input.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl GridProcessorError {
    /// Create an InterpolationFailure error.
    pub fn interpolation(msg: impl Into<String>) -> Self {
        Self::InterpolationFailure(msg.into())
    }

    /// Map onto the pipeline-wide error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InterpolationFailure(_) => ErrorKind::InterpolationFailure,
            Self::NormalizationDegenerate { .. } => ErrorKind::NormalizationDegenerate,
            Self::ProjectionError(_) => ErrorKind::SerializationFailure,
            Self::ConfigError(_) => ErrorKind::InvalidInput,
            Self::Common(e) => e.kind(),
        }
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
