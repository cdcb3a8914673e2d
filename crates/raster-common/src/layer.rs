//! Layer records and the immutable output bundle of a pipeline run.
//!
//! Persistence belongs to the caller. These types only describe the shape of
//! what gets stored and how a fresh run replaces previous outputs.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Outputs of one successful pipeline run.
#[derive(Debug, Clone)]
pub struct LayerBundle {
    /// Single-band float32 GeoTIFF in EPSG:4326
    pub raster: Bytes,
    /// Per-pixel index as JSON text
    pub index_json: String,
    /// Luminance+alpha overlay as PNG
    pub alpha_png: Bytes,
    /// Optional copy of the overlay as TIFF, for inspection
    pub alpha_tiff: Option<Bytes>,
}

/// A stored raster layer.
#[derive(Debug, Clone)]
pub struct LayerRecord {
    /// Unique, human-readable title
    pub title: String,
    /// Name of the uploaded file
    pub filename: String,
    /// Weight specification as JSON text
    pub col_weights: String,
    /// Latitude column name
    pub geom_lat: String,
    /// Longitude column name
    pub geom_lon: String,
    /// Raw uploaded table
    pub input: Bytes,
    /// Output raster, absent until a run succeeds
    pub raster: Option<Bytes>,
    /// Output pixel index JSON, absent until a run succeeds
    pub index_json: Option<String>,
}

/// Public fields of a record, used for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    pub title: String,
    pub filename: String,
    pub col_weights: String,
    pub geom_x: String,
    pub geom_y: String,
}

impl LayerRecord {
    pub fn new(
        title: impl Into<String>,
        filename: impl Into<String>,
        col_weights: impl Into<String>,
        geom_lat: impl Into<String>,
        geom_lon: impl Into<String>,
        input: Bytes,
    ) -> Self {
        Self {
            title: title.into(),
            filename: filename.into(),
            col_weights: col_weights.into(),
            geom_lat: geom_lat.into(),
            geom_lon: geom_lon.into(),
            input,
            raster: None,
            index_json: None,
        }
    }

    /// A copy of this record carrying the outputs of `bundle`.
    ///
    /// The original record is left untouched so the caller can swap the new
    /// one in atomically.
    pub fn with_bundle(&self, bundle: &LayerBundle) -> Self {
        Self {
            raster: Some(bundle.raster.clone()),
            index_json: Some(bundle.index_json.clone()),
            ..self.clone()
        }
    }

    /// Whether outputs have been attached.
    pub fn is_rendered(&self) -> bool {
        self.raster.is_some() && self.index_json.is_some()
    }

    /// Listing view. Longitude is reported as `geomX`, latitude as `geomY`.
    pub fn summary(&self) -> LayerSummary {
        LayerSummary {
            title: self.title.clone(),
            filename: self.filename.clone(),
            col_weights: self.col_weights.clone(),
            geom_x: self.geom_lon.clone(),
            geom_y: self.geom_lat.clone(),
        }
    }
}
