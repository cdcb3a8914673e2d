//! Error types for the ingestion crate.

use raster_common::{CommonError, ErrorKind};
use thiserror::Error;

/// Errors that can occur while turning uploaded bytes into samples.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("No supported encoding could parse the input (tried {tried})")]
    Decode { tried: String },

    #[error("Failed to parse table: {0}")]
    TableParse(String),

    #[error("Invalid geometry: {0}")]
    GeometryInvalid(String),

    #[error("Unknown or non-numeric weight column: {0}")]
    WeightColumn(String),

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Common(#[from] CommonError),
}

impl IngestionError {
    /// Map onto the pipeline-wide error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestionError::Io(_) | IngestionError::Decode { .. } | IngestionError::TableParse(_) => {
                ErrorKind::DecodeError
            }
            IngestionError::GeometryInvalid(_) => ErrorKind::GeometryInvalid,
            IngestionError::WeightColumn(_)
            | IngestionError::UnknownEncoding(_)
            | IngestionError::InvalidConfig(_) => ErrorKind::InvalidInput,
            IngestionError::Common(e) => e.kind(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
