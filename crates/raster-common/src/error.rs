//! Error taxonomy shared by every pipeline stage.

use std::fmt;
use thiserror::Error;

/// Result type alias using CommonError.
pub type CommonResult<T> = Result<T, CommonError>;

/// The kinds of failure a pipeline run can report.
///
/// Every crate error maps onto one of these through its `kind()` method so the
/// orchestrator can surface a single, stable failure signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No supported encoding could parse the input.
    DecodeError,
    /// Delimiter sniffing and counting were both indeterminate.
    /// Only ever logged; a best-guess delimiter is always returned.
    DelimiterAmbiguous,
    /// Geometry columns missing, non-numeric, or entirely null/zero.
    GeometryInvalid,
    /// Spatial index construction or querying failed.
    InterpolationFailure,
    /// The assembled grid has a zero (or non-finite) maximum.
    NormalizationDegenerate,
    /// Raster, image or JSON serialization failed.
    SerializationFailure,
    /// Malformed caller input such as a weight specification.
    InvalidInput,
}

impl ErrorKind {
    /// Stable identifier for logs and API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::DecodeError => "DecodeError",
            ErrorKind::DelimiterAmbiguous => "DelimiterAmbiguous",
            ErrorKind::GeometryInvalid => "GeometryInvalid",
            ErrorKind::InterpolationFailure => "InterpolationFailure",
            ErrorKind::NormalizationDegenerate => "NormalizationDegenerate",
            ErrorKind::SerializationFailure => "SerializationFailure",
            ErrorKind::InvalidInput => "InvalidInput",
        }
    }

    /// Whether this kind aborts a run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorKind::DelimiterAmbiguous)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors raised by the shared types in this crate.
#[derive(Debug, Error)]
pub enum CommonError {
    #[error("Invalid weight specification: {0}")]
    InvalidWeightSpec(String),

    #[error("Unknown interpolation method: {0}")]
    UnknownMethod(String),

    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
}

impl CommonError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        CommonError::InvalidWeightSpec(format!("JSON error: {}", err))
    }
}
