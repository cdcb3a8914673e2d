//! Transparency overlay derived from a normalized raster.
//!
//! Each pixel becomes black (luminance 0) with alpha
//! `clamp(round(value * alpha_scale), 0, 255)`. Non-finite values are fully
//! transparent.

use raster_common::GeoRaster;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::Result;
use crate::geotiff::rgba_geotiff_bytes;
use crate::png::create_png_gray_alpha;

/// Encoded alpha image plus the optional TIFF copy.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaOutput {
    pub png: Vec<u8>,
    pub tiff: Option<Vec<u8>>,
}

/// Alpha value for a normalized raster value.
#[inline]
pub fn alpha_value(value: f32, scale: f64) -> u8 {
    let scaled = value as f64 * scale;
    if !scaled.is_finite() {
        return 0;
    }
    scaled.round().clamp(0.0, 255.0) as u8
}

/// Interleaved luminance/alpha bytes, luminance always zero.
pub fn gray_alpha_pixels(raster: &GeoRaster, scale: f64) -> Vec<u8> {
    raster
        .data
        .iter()
        .flat_map(|&v| [0, alpha_value(v, scale)])
        .collect()
}

/// Build the alpha PNG (and TIFF when configured) for `raster`.
pub fn convert_to_alpha(raster: &GeoRaster, config: &RenderConfig) -> Result<AlphaOutput> {
    let pixels = gray_alpha_pixels(raster, config.alpha_scale);
    let png = create_png_gray_alpha(&pixels, raster.width, raster.height, config.png_compression.level())?;

    let tiff = if config.alpha_tiff {
        let rgba: Vec<u8> = pixels
            .chunks_exact(2)
            .flat_map(|la| [la[0], la[0], la[0], la[1]])
            .collect();
        Some(rgba_geotiff_bytes(
            &rgba,
            raster.width,
            raster.height,
            &raster.bounds,
            raster.crs,
            config.tiff_compression,
        )?)
    } else {
        None
    };

    debug!(
        width = raster.width,
        height = raster.height,
        png_bytes = png.len(),
        tiff = tiff.is_some(),
        "Alpha image encoded"
    );
    Ok(AlphaOutput { png, tiff })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_value() {
        assert_eq!(alpha_value(0.0, 255.0), 0);
        assert_eq!(alpha_value(1.0, 255.0), 255);
        assert_eq!(alpha_value(0.5, 255.0), 128);
        assert_eq!(alpha_value(0.2, 255.0), 51);
    }

    #[test]
    fn test_alpha_value_clamps() {
        assert_eq!(alpha_value(2.0, 255.0), 255);
        assert_eq!(alpha_value(-0.5, 255.0), 0);
        assert_eq!(alpha_value(f32::NAN, 255.0), 0);
        assert_eq!(alpha_value(f32::INFINITY, 255.0), 0);
    }
}
