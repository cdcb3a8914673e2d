//! Configuration for surface interpolation and reprojection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridProcessorError, Result};

/// Area-driven grid resolution.
///
/// Areas are in squared planar units (m² in Web Mercator). The two
/// thresholds are inherited constants; they are kept configurable so
/// deployments can tune them against golden fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionTiers {
    /// Areas above this use `coarse`
    pub coarse_area: f64,
    pub coarse: f64,
    /// Areas above this (and not above `coarse_area`) use `medium`
    pub medium_area: f64,
    pub medium: f64,
    /// Everything else
    pub fine: f64,
}

impl Default for ResolutionTiers {
    fn default() -> Self {
        Self {
            coarse_area: 1e10,
            coarse: 500.0,
            medium_area: 1e9,
            medium: 250.0,
            fine: 100.0,
        }
    }
}

impl ResolutionTiers {
    /// Cell size for an extent of `area`.
    pub fn select(&self, area: f64) -> f64 {
        if area > self.coarse_area {
            self.coarse
        } else if area > self.medium_area {
            self.medium
        } else {
            self.fine
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, res) in [("coarse", self.coarse), ("medium", self.medium), ("fine", self.fine)] {
            if !(res.is_finite() && res > 0.0) {
                return Err(GridProcessorError::ConfigError(format!(
                    "{} resolution must be > 0",
                    name
                )));
            }
        }
        if self.medium_area > self.coarse_area {
            return Err(GridProcessorError::ConfigError(
                "medium_area must not exceed coarse_area".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resampling used when warping the planar grid to geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplingMethod {
    /// Nearest source cell
    #[default]
    Nearest,
    /// Bilinear between the four surrounding source cells
    Bilinear,
}

impl FromStr for ResamplingMethod {
    type Err = GridProcessorError;

    /// Parse from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            _ => Err(GridProcessorError::ConfigError(format!(
                "unknown resampling method: {}",
                s
            ))),
        }
    }
}

impl ResamplingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
        }
    }
}

/// Configuration for the interpolation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Upper bound on neighbors per grid point (IDW and Density)
    pub max_neighbors: usize,

    /// IDW distance exponent
    pub power: f64,

    /// Distances are clamped to at least this value
    pub distance_epsilon: f64,

    /// Grid points per neighbor query batch
    pub query_batch_size: usize,

    /// Release query buffers every this many batches
    pub reclaim_every: usize,

    /// Target number of grid columns per chunk
    pub column_chunk_size: usize,

    pub resolution_tiers: ResolutionTiers,

    /// Evaluate column chunks on the rayon pool
    pub parallel_chunks: bool,

    pub resampling: ResamplingMethod,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            max_neighbors: 50,
            power: 2.0,
            distance_epsilon: 1e-10,
            query_batch_size: 10_000,
            reclaim_every: 5,
            column_chunk_size: 1000,
            resolution_tiers: ResolutionTiers::default(),
            parallel_chunks: false,
            resampling: ResamplingMethod::Nearest,
        }
    }
}

impl InterpolationConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlay environment variables on `self`, then validate.
    pub fn with_env(self) -> Result<Self> {
        let mut config = self;

        if let Ok(val) = std::env::var("INTERP_MAX_NEIGHBORS") {
            if let Ok(n) = val.parse() {
                config.max_neighbors = n;
            }
        }

        if let Ok(val) = std::env::var("INTERP_POWER") {
            if let Ok(power) = val.parse() {
                config.power = power;
            }
        }

        if let Ok(val) = std::env::var("INTERP_QUERY_BATCH_SIZE") {
            if let Ok(size) = val.parse() {
                config.query_batch_size = size;
            }
        }

        if let Ok(val) = std::env::var("INTERP_RECLAIM_EVERY") {
            if let Ok(n) = val.parse() {
                config.reclaim_every = n;
            }
        }

        if let Ok(val) = std::env::var("INTERP_COLUMN_CHUNK_SIZE") {
            if let Ok(size) = val.parse() {
                config.column_chunk_size = size;
            }
        }

        if let Ok(val) = std::env::var("INTERP_PARALLEL_CHUNKS") {
            config.parallel_chunks = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("INTERP_RESAMPLING") {
            config.resampling = val.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_neighbors == 0 {
            return Err(GridProcessorError::ConfigError(
                "max_neighbors must be > 0".to_string(),
            ));
        }

        if !(self.power.is_finite() && self.power > 0.0) {
            return Err(GridProcessorError::ConfigError("power must be > 0".to_string()));
        }

        if !(self.distance_epsilon.is_finite() && self.distance_epsilon > 0.0) {
            return Err(GridProcessorError::ConfigError(
                "distance_epsilon must be > 0".to_string(),
            ));
        }

        if self.query_batch_size == 0 || self.column_chunk_size == 0 {
            return Err(GridProcessorError::ConfigError(
                "batch and chunk sizes must be > 0".to_string(),
            ));
        }

        self.resolution_tiers.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_tiers() {
        let tiers = ResolutionTiers::default();
        assert_eq!(tiers.select(2e10), 500.0);
        assert_eq!(tiers.select(1e10), 250.0);
        assert_eq!(tiers.select(5e9), 250.0);
        assert_eq!(tiers.select(1e9), 100.0);
        assert_eq!(tiers.select(0.0), 100.0);
    }

    #[test]
    fn test_default_config_valid() {
        assert!(InterpolationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = InterpolationConfig {
            max_neighbors: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = InterpolationConfig {
            query_batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resampling_from_str() {
        assert_eq!("Bilinear".parse::<ResamplingMethod>().unwrap(), ResamplingMethod::Bilinear);
        assert!(matches!(
            "cubic".parse::<ResamplingMethod>(),
            Err(GridProcessorError::ConfigError(_))
        ));
    }
}
