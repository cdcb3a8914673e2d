//! Single-band float32 GeoTIFF encoding and decoding.
//!
//! Georeferencing uses the three baseline GeoTIFF tags: a pixel scale, a
//! tie point binding pixel (0, 0) to the raster's north-west corner, and a
//! GeoKey directory naming the EPSG code.

use std::io::{Cursor, Read, Seek, Write};

use raster_common::{BoundingBox, CrsCode, GeoRaster};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{Gray32Float, RGBA8};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tracing::debug;

use crate::config::TiffCompression;
use crate::error::{RenderError, Result};

// GeoTIFF tag IDs (not in the tiff crate)
const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;

// GeoKey IDs
const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

// GeoKey values
const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// Write `raster` as a float32 GeoTIFF.
pub fn write_geotiff<W: Write + Seek>(raster: &GeoRaster, compression: TiffCompression, writer: W) -> Result<()> {
    check_dimensions(raster.width, raster.height, raster.data.len(), 1)?;

    let mut encoder = TiffEncoder::new(writer)?.with_compression(compression.to_tiff());
    let mut image = encoder.new_image::<Gray32Float>(raster.width as u32, raster.height as u32)?;
    write_georeference(image.encoder(), raster.width, raster.height, &raster.bounds, raster.crs)?;
    image.write_data(&raster.data)?;

    debug!(
        width = raster.width,
        height = raster.height,
        crs = %raster.crs,
        "GeoTIFF written"
    );
    Ok(())
}

/// Encode `raster` into an in-memory GeoTIFF, readable from offset zero.
pub fn geotiff_bytes(raster: &GeoRaster, compression: TiffCompression) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_geotiff(raster, compression, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Encode 8-bit RGBA pixels with the georeferencing of a raster grid.
pub fn rgba_geotiff_bytes(
    rgba: &[u8],
    width: usize,
    height: usize,
    bounds: &BoundingBox,
    crs: CrsCode,
    compression: TiffCompression,
) -> Result<Vec<u8>> {
    check_dimensions(width, height, rgba.len(), 4)?;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)?.with_compression(compression.to_tiff());
        let mut image = encoder.new_image::<RGBA8>(width as u32, height as u32)?;
        write_georeference(image.encoder(), width, height, bounds, crs)?;
        image.write_data(rgba)?;
    }
    Ok(cursor.into_inner())
}

/// Decode a single-band float GeoTIFF written by [`write_geotiff`].
pub fn read_geotiff(bytes: &[u8]) -> Result<GeoRaster> {
    read_geotiff_from(Cursor::new(bytes))
}

pub fn read_geotiff_from<R: Read + Seek>(reader: R) -> Result<GeoRaster> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let scale = decoder.get_tag_f64_vec(Tag::Unknown(GEOTIFF_MODELPIXELSCALE))?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(GEOTIFF_MODELTIEPOINT))?;
    let geokeys = decoder.get_tag_u16_vec(Tag::Unknown(GEOTIFF_GEOKEYDIRECTORY))?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(RenderError::InvalidRaster(
            "incomplete pixel scale or tie point".to_string(),
        ));
    }

    let crs = crs_from_geokeys(&geokeys)?;
    let min_x = tiepoint[3] - tiepoint[0] * scale[0];
    let max_y = tiepoint[4] + tiepoint[1] * scale[1];
    let bounds = BoundingBox::new(
        min_x,
        max_y - scale[1] * height as f64,
        min_x + scale[0] * width as f64,
        max_y,
    );

    let data = match decoder.read_image()? {
        DecodingResult::F32(values) => values,
        DecodingResult::F64(values) => values.into_iter().map(|v| v as f32).collect(),
        _ => {
            return Err(RenderError::InvalidRaster(
                "expected floating point samples".to_string(),
            ))
        }
    };
    check_dimensions(width, height, data.len(), 1)?;

    Ok(GeoRaster::new(width, height, bounds, crs, data))
}

fn check_dimensions(width: usize, height: usize, len: usize, channels: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidRaster(format!(
            "zero dimensions {}x{}",
            width, height
        )));
    }
    if len != width * height * channels {
        return Err(RenderError::InvalidRaster(format!(
            "{} samples for {}x{}x{}",
            len, width, height, channels
        )));
    }
    Ok(())
}

fn write_georeference<W: Write + Seek, K: TiffKind>(
    dir: &mut DirectoryEncoder<W, K>,
    width: usize,
    height: usize,
    bounds: &BoundingBox,
    crs: CrsCode,
) -> Result<()> {
    // ModelPixelScale: [ScaleX, ScaleY, ScaleZ]
    let pixel_scale = [
        bounds.width() / width as f64,
        bounds.height() / height as f64,
        0.0,
    ];
    dir.write_tag(Tag::Unknown(GEOTIFF_MODELPIXELSCALE), pixel_scale.as_slice())?;

    // ModelTiepoint: pixel (0, 0) at (min_x, max_y)
    let tiepoint = [0.0, 0.0, 0.0, bounds.min_x, bounds.max_y, 0.0];
    dir.write_tag(Tag::Unknown(GEOTIFF_MODELTIEPOINT), tiepoint.as_slice())?;

    let geokeys = geokey_directory(crs);
    dir.write_tag(Tag::Unknown(GEOTIFF_GEOKEYDIRECTORY), geokeys.as_slice())?;
    Ok(())
}

/// GeoKeyDirectory: a 4-entry header followed by
/// `[KeyID, TIFFTagLocation, Count, Value]` quads.
fn geokey_directory(crs: CrsCode) -> Vec<u16> {
    let (model_type, crs_key) = if crs.is_geographic() {
        (MODEL_TYPE_GEOGRAPHIC, GEOGRAPHIC_TYPE_GEO_KEY)
    } else {
        (MODEL_TYPE_PROJECTED, PROJECTED_CS_TYPE_GEO_KEY)
    };

    vec![
        1, 1, 0, 3, // version, revision, minor revision, key count
        GT_MODEL_TYPE_GEO_KEY, 0, 1, model_type,
        GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA,
        crs_key, 0, 1, crs.epsg(),
    ]
}

fn crs_from_geokeys(keys: &[u16]) -> Result<CrsCode> {
    let entries = keys.get(4..).unwrap_or_default();
    for quad in entries.chunks_exact(4) {
        let (id, location, value) = (quad[0], quad[1], quad[3]);
        if location == 0 && (id == GEOGRAPHIC_TYPE_GEO_KEY || id == PROJECTED_CS_TYPE_GEO_KEY) {
            return CrsCode::from_epsg(value).ok_or_else(|| {
                RenderError::InvalidRaster(format!("unsupported EPSG code {}", value))
            });
        }
    }
    Err(RenderError::InvalidRaster(
        "GeoKey directory names no coordinate reference system".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster() -> GeoRaster {
        GeoRaster::new(
            3,
            2,
            BoundingBox::new(-100.0, 40.0, -99.97, 40.02),
            CrsCode::Epsg4326,
            vec![0.0, 0.5, 1.0, 0.25, 0.75, 0.125],
        )
    }

    #[test]
    fn test_geokeys_geographic() {
        let keys = geokey_directory(CrsCode::Epsg4326);
        assert_eq!(keys[3], 3);
        assert_eq!(keys[7], MODEL_TYPE_GEOGRAPHIC);
        assert_eq!(keys[12], GEOGRAPHIC_TYPE_GEO_KEY);
        assert_eq!(keys[15], 4326);
        assert_eq!(crs_from_geokeys(&keys).unwrap(), CrsCode::Epsg4326);
    }

    #[test]
    fn test_geokeys_projected() {
        let keys = geokey_directory(CrsCode::Epsg3857);
        assert_eq!(keys[7], MODEL_TYPE_PROJECTED);
        assert_eq!(crs_from_geokeys(&keys).unwrap(), CrsCode::Epsg3857);
    }

    #[test]
    fn test_read_back() {
        for compression in [TiffCompression::None, TiffCompression::Lzw, TiffCompression::Deflate] {
            let original = raster();
            let bytes = geotiff_bytes(&original, compression).unwrap();
            assert_eq!(&bytes[0..2], b"II");

            let decoded = read_geotiff(&bytes).unwrap();
            assert_eq!((decoded.width, decoded.height), (3, 2));
            assert_eq!(decoded.data, original.data);
            assert_eq!(decoded.crs, CrsCode::Epsg4326);
            assert!((decoded.bounds.min_x - original.bounds.min_x).abs() < 1e-9);
            assert!((decoded.bounds.max_y - original.bounds.max_y).abs() < 1e-9);
            assert!((decoded.bounds.max_x - original.bounds.max_x).abs() < 1e-9);
            assert!((decoded.bounds.min_y - original.bounds.min_y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_raster_error() {
        let empty = GeoRaster::new(0, 0, BoundingBox::new(0.0, 0.0, 0.0, 0.0), CrsCode::Epsg4326, vec![]);
        assert!(geotiff_bytes(&empty, TiffCompression::Deflate).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(read_geotiff(b"not a tiff").is_err());
    }
}
