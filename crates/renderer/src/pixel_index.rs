//! Flat per-pixel lookup index of a geographic raster.
//!
//! Serialized as one JSON object: the metadata keys `lbound`, `bbound`,
//! `rbound`, `tbound`, `sizex` and `sizey` first, then one entry per pixel
//! keyed `"x,y"` holding `{"name": value}`, with `x` in the outer loop.
//! The whole raster is materialized, so the document grows with
//! `width * height`.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use raster_common::GeoRaster;

use crate::error::{RenderError, Result};
use crate::geotiff::read_geotiff;

const METADATA_KEYS: [&str; 6] = ["lbound", "bbound", "rbound", "tbound", "sizex", "sizey"];

/// Bounds and size of an indexed raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexMetadata {
    pub lbound: f64,
    pub bbound: f64,
    pub rbound: f64,
    pub tbound: f64,
    pub sizex: usize,
    pub sizey: usize,
}

/// Pixel values addressable by `"x,y"`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelIndex {
    pub metadata: IndexMetadata,
    /// Row-major, row 0 at `tbound`
    values: Vec<f32>,
}

/// Result of [`PixelIndex::query`].
#[derive(Debug, Clone, PartialEq)]
pub enum IndexQuery {
    Metadata(IndexMetadata),
    Pixel { key: String, value: f32 },
}

#[derive(Serialize)]
struct PixelEntry {
    name: Option<f64>,
}

impl PixelEntry {
    fn new(value: f32) -> Self {
        Self {
            name: value.is_finite().then_some(value as f64),
        }
    }
}

impl PixelIndex {
    pub fn from_raster(raster: &GeoRaster) -> Self {
        Self {
            metadata: IndexMetadata {
                lbound: raster.bounds.min_x,
                bbound: raster.bounds.min_y,
                rbound: raster.bounds.max_x,
                tbound: raster.bounds.max_y,
                sizex: raster.width,
                sizey: raster.height,
            },
            values: raster.data.clone(),
        }
    }

    /// Index a serialized GeoTIFF.
    pub fn from_tiff_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_raster(&read_geotiff(bytes)?))
    }

    pub fn width(&self) -> usize {
        self.metadata.sizex
    }

    pub fn height(&self) -> usize {
        self.metadata.sizey
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.values.get(y * self.width() + x).copied()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a serialized index; every pixel entry must be present.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| serde_json::Error::custom("pixel index must be a JSON object"))?;

        let metadata = IndexMetadata {
            lbound: metadata_float(object, "lbound")?,
            bbound: metadata_float(object, "bbound")?,
            rbound: metadata_float(object, "rbound")?,
            tbound: metadata_float(object, "tbound")?,
            sizex: metadata_size(object, "sizex")?,
            sizey: metadata_size(object, "sizey")?,
        };

        // Size the grid from the document itself before allocating
        let entries = object.len() - METADATA_KEYS.len();
        let cells = metadata
            .sizex
            .checked_mul(metadata.sizey)
            .filter(|&cells| cells == entries)
            .ok_or_else(|| {
                RenderError::Json(serde_json::Error::custom(format!(
                    "size {}x{} does not match {} pixel entries",
                    metadata.sizex, metadata.sizey, entries
                )))
            })?;

        let mut values = vec![f32::NAN; cells];
        for y in 0..metadata.sizey {
            for x in 0..metadata.sizex {
                let key = pixel_key(x, y);
                let entry = object
                    .get(&key)
                    .ok_or_else(|| RenderError::MissingPixel(key.clone()))?;
                values[y * metadata.sizex + x] = match entry.get("name") {
                    Some(Value::Null) => f32::NAN,
                    Some(v) => v.as_f64().map(|f| f as f32).ok_or_else(|| {
                        RenderError::Json(serde_json::Error::custom(format!("pixel '{}' is not a number", key)))
                    })?,
                    None => return Err(RenderError::MissingPixel(key)),
                };
            }
        }

        Ok(Self { metadata, values })
    }

    /// Metadata for `None`, a single pixel for `Some("x,y")`.
    pub fn query(&self, coord: Option<&str>) -> Result<IndexQuery> {
        let Some(coord) = coord else {
            return Ok(IndexQuery::Metadata(self.metadata));
        };

        let (x, y) = parse_key(coord).ok_or_else(|| RenderError::MissingPixel(coord.to_string()))?;
        let value = self
            .get(x, y)
            .ok_or_else(|| RenderError::MissingPixel(coord.to_string()))?;
        Ok(IndexQuery::Pixel {
            key: pixel_key(x, y),
            value,
        })
    }
}

impl Serialize for PixelIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let m = &self.metadata;
        let mut map = serializer.serialize_map(Some(METADATA_KEYS.len() + self.values.len()))?;
        map.serialize_entry("lbound", &m.lbound)?;
        map.serialize_entry("bbound", &m.bbound)?;
        map.serialize_entry("rbound", &m.rbound)?;
        map.serialize_entry("tbound", &m.tbound)?;
        map.serialize_entry("sizex", &m.sizex)?;
        map.serialize_entry("sizey", &m.sizey)?;

        for x in 0..m.sizex {
            for y in 0..m.sizey {
                let value = self.values[y * m.sizex + x];
                map.serialize_entry(&pixel_key(x, y), &PixelEntry::new(value))?;
            }
        }
        map.end()
    }
}

impl Serialize for IndexQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Metadata(metadata) => metadata.serialize(serializer),
            Self::Pixel { key, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, &PixelEntry::new(*value))?;
                map.end()
            }
        }
    }
}

fn metadata_field<'a>(object: &'a Map<String, Value>, key: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| RenderError::Json(serde_json::Error::custom(format!("missing '{}'", key))))
}

fn metadata_float(object: &Map<String, Value>, key: &str) -> Result<f64> {
    metadata_field(object, key)?
        .as_f64()
        .ok_or_else(|| RenderError::Json(serde_json::Error::custom(format!("'{}' is not a number", key))))
}

fn metadata_size(object: &Map<String, Value>, key: &str) -> Result<usize> {
    metadata_field(object, key)?
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| RenderError::Json(serde_json::Error::custom(format!("'{}' is not a size", key))))
}

fn pixel_key(x: usize, y: usize) -> String {
    format!("{},{}", x, y)
}

fn parse_key(coord: &str) -> Option<(usize, usize)> {
    let (x, y) = coord.split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::{BoundingBox, CrsCode};

    fn index() -> PixelIndex {
        let raster = GeoRaster::new(
            2,
            3,
            BoundingBox::new(-1.0, -2.0, 1.0, 2.0),
            CrsCode::Epsg4326,
            vec![0.0, 0.5, 0.25, 1.0, 0.75, f32::NAN],
        );
        PixelIndex::from_raster(&raster)
    }

    #[test]
    fn test_key_order() {
        let json = index().to_json().unwrap();
        let expected_prefix = r#"{"lbound":-1.0,"bbound":-2.0,"rbound":1.0,"tbound":2.0,"sizex":2,"sizey":3,"0,0":{"name":0.0},"0,1":{"name":0.25},"0,2":{"name":0.75},"1,0":{"name":0.5}"#;
        assert!(json.starts_with(expected_prefix), "got {}", json);
        assert!(json.ends_with(r#""1,2":{"name":null}}"#));
    }

    #[test]
    fn test_json_read_back() {
        let original = index();
        let parsed = PixelIndex::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(parsed.metadata, original.metadata);
        assert_eq!(parsed.get(1, 1), Some(1.0));
        assert!(parsed.get(1, 2).unwrap().is_nan());
    }

    #[test]
    fn test_query_metadata() {
        let result = index().query(None).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"lbound":-1.0,"bbound":-2.0,"rbound":1.0,"tbound":2.0,"sizex":2,"sizey":3}"#
        );
    }

    #[test]
    fn test_query_pixel() {
        let result = index().query(Some("1, 0")).unwrap();
        assert_eq!(
            result,
            IndexQuery::Pixel {
                key: "1,0".to_string(),
                value: 0.5
            }
        );
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"1,0":{"name":0.5}}"#);
    }

    #[test]
    fn test_query_missing_pixel() {
        assert!(matches!(index().query(Some("2,0")), Err(RenderError::MissingPixel(_))));
        assert!(matches!(index().query(Some("abc")), Err(RenderError::MissingPixel(_))));
    }

    #[test]
    fn test_incomplete_json_rejected() {
        let json = r#"{"lbound":0,"bbound":0,"rbound":1,"tbound":1,"sizex":1,"sizey":1,"5,5":{"name":1}}"#;
        assert!(matches!(PixelIndex::from_json(json), Err(RenderError::MissingPixel(k)) if k == "0,0"));
    }

    #[test]
    fn test_size_must_match_entries() {
        let json = r#"{"lbound":0,"bbound":0,"rbound":1,"tbound":1,"sizex":1,"sizey":1}"#;
        assert!(matches!(PixelIndex::from_json(json), Err(RenderError::Json(_))));

        let json = r#"{"lbound":0,"bbound":0,"rbound":1,"tbound":1,"sizex":4000000000,"sizey":4000000000,"0,0":{"name":1}}"#;
        assert!(matches!(PixelIndex::from_json(json), Err(RenderError::Json(_))));

        let json = format!(
            r#"{{"lbound":0,"bbound":0,"rbound":1,"tbound":1,"sizex":{},"sizey":2,"0,0":{{"name":1}}}}"#,
            usize::MAX
        );
        assert!(matches!(PixelIndex::from_json(&json), Err(RenderError::Json(_))));
    }
}
