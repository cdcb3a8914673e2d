//! Common types shared across the raster-maker crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod layer;
pub mod raster;
pub mod samples;
pub mod weights;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{CommonError, CommonResult, ErrorKind};
pub use grid::GridSpec;
pub use layer::{LayerBundle, LayerRecord, LayerSummary};
pub use raster::GeoRaster;
pub use samples::{Samples, WeightedField};
pub use weights::{InterpolationMethod, WeightEntry, WeightSpec, COUNT_COLUMN};
