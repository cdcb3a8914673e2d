//! Serialization of geographic rasters and the artifacts derived from them.
//!
//! - GeoTIFF (float32, single band) encode/decode
//! - Pixel index JSON
//! - Alpha overlay PNG (gray+alpha), optionally mirrored as an RGBA TIFF

pub mod alpha;
pub mod config;
pub mod error;
pub mod geotiff;
pub mod pixel_index;
pub mod png;

pub use alpha::{alpha_value, convert_to_alpha, gray_alpha_pixels, AlphaOutput};
pub use config::{PngCompression, RenderConfig, TiffCompression};
pub use error::{RenderError, Result};
pub use geotiff::{geotiff_bytes, read_geotiff, read_geotiff_from, rgba_geotiff_bytes, write_geotiff};
pub use pixel_index::{IndexMetadata, IndexQuery, PixelIndex};
