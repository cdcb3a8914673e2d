//! Point-to-surface interpolation on a Web Mercator grid.
//!
//! Turns cleaned [`Samples`](raster_common::Samples) into a regular planar
//! grid, normalizes it and warps it onto a geographic raster.
//!
//! # Architecture
//!
//! ```text
//! Samples (EPSG:3857)
//!      │
//!      ▼
//! GridBuilder::interpolate
//!      │
//!      ├─► Pick resolution from the extent area
//!      │
//!      ├─► Split columns into chunks
//!      │
//!      ├─► SurfaceInterpolator per chunk (IDW, density, linear, nearest)
//!      │         │
//!      │         └─► Sum of every weighted field
//!      │
//!      └─► Assemble row-major Grid
//!               │
//!               ▼
//!          Grid::normalize ─► reproject_to_geographic ─► GeoRaster (EPSG:4326)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_processor::{GridBuilder, InterpolationConfig, reproject_to_geographic};
//!
//! let config = InterpolationConfig::default();
//! let mut grid = GridBuilder::new(&config).interpolate(&samples)?;
//! grid.normalize()?;
//! let raster = reproject_to_geographic(&grid, config.resampling)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod interpolation;
pub mod reproject;
pub mod resample;
pub mod types;

pub use builder::{column_chunks, GridBuilder};
pub use config::{InterpolationConfig, ResamplingMethod, ResolutionTiers};
pub use error::{GridProcessorError, Result};
pub use interpolation::{NeighborIndex, SurfaceInterpolator, Triangulation, Weighting};
pub use reproject::reproject_to_geographic;
pub use resample::BandView;
pub use types::Grid;
