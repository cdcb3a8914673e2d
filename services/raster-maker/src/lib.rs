//! Point data to raster pipeline.
//!
//! Turns an uploaded delimited table of geocoded measurements into a
//! normalized EPSG:4326 GeoTIFF, its pixel index JSON and an alpha overlay
//! PNG. Persistence and transport are left to the caller; a run only needs
//! the input bytes, a [`WeightSpec`](raster_common::WeightSpec) and the
//! names of the latitude and longitude columns.
//!
//! # Example
//!
//! ```ignore
//! use raster_maker::{Pipeline, PipelineConfig};
//! use raster_common::WeightSpec;
//! use ingestion::GeomSpec;
//!
//! let weights = WeightSpec::from_json(r#"{"population": [1.0, "IDW"]}"#)?;
//! let geom = GeomSpec::new("lat", "lon");
//! let bundle = Pipeline::new(PipelineConfig::default()).run(&csv_bytes, &weights, &geom)?;
//! ```

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{ConfigError, PipelineError, PipelineStage, StageError};
pub use pipeline::Pipeline;
