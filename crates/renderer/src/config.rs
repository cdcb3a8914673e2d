//! Output encoding configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Compression of GeoTIFF strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiffCompression {
    None,
    Lzw,
    #[default]
    Deflate,
}

impl FromStr for TiffCompression {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "lzw" => Ok(Self::Lzw),
            "deflate" | "zlib" => Ok(Self::Deflate),
            _ => Err(RenderError::ConfigError(format!("unknown TIFF compression: {}", s))),
        }
    }
}

impl TiffCompression {
    pub(crate) fn to_tiff(self) -> tiff::encoder::Compression {
        match self {
            Self::None => tiff::encoder::Compression::Uncompressed,
            Self::Lzw => tiff::encoder::Compression::Lzw,
            Self::Deflate => tiff::encoder::Compression::Deflate(tiff::encoder::DeflateLevel::Fast),
        }
    }
}

/// zlib effort for PNG image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    #[default]
    Fast,
    Default,
    Best,
}

impl FromStr for PngCompression {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "default" => Ok(Self::Default),
            "best" => Ok(Self::Best),
            _ => Err(RenderError::ConfigError(format!("unknown PNG compression: {}", s))),
        }
    }
}

impl PngCompression {
    pub(crate) fn level(self) -> flate2::Compression {
        match self {
            Self::Fast => flate2::Compression::fast(),
            Self::Default => flate2::Compression::default(),
            Self::Best => flate2::Compression::best(),
        }
    }
}

/// Configuration for raster, index and alpha outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub tiff_compression: TiffCompression,

    pub png_compression: PngCompression,

    /// Factor mapping normalized values to 8-bit alpha
    pub alpha_scale: f64,

    /// Also produce the alpha image as an RGBA TIFF
    pub alpha_tiff: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tiff_compression: TiffCompression::Deflate,
            png_compression: PngCompression::Fast,
            alpha_scale: 255.0,
            alpha_tiff: false,
        }
    }
}

impl RenderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlay environment variables on `self`, then validate.
    pub fn with_env(self) -> Result<Self> {
        let mut config = self;

        if let Ok(val) = std::env::var("RENDER_TIFF_COMPRESSION") {
            config.tiff_compression = val.parse()?;
        }

        if let Ok(val) = std::env::var("RENDER_PNG_COMPRESSION") {
            config.png_compression = val.parse()?;
        }

        if let Ok(val) = std::env::var("RENDER_ALPHA_SCALE") {
            if let Ok(scale) = val.parse() {
                config.alpha_scale = scale;
            }
        }

        if let Ok(val) = std::env::var("RENDER_ALPHA_TIFF") {
            config.alpha_tiff = val.to_lowercase() == "true" || val == "1";
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha_scale.is_finite() && self.alpha_scale > 0.0) {
            return Err(RenderError::ConfigError(
                "alpha_scale must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
