//! Error types for raster serialization and derived artifacts.

use raster_common::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("PNG encoding failed: {0}")]
    Png(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The raster cannot be written or was read back incomplete.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// A pixel index query named a coordinate that is not in the index.
    #[error("no pixel at '{0}'")]
    MissingPixel(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl RenderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingPixel(_) | Self::ConfigError(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::SerializationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
