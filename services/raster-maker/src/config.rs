//! Pipeline configuration.
//!
//! Loaded from an optional YAML file, then overlaid with environment
//! variables. Every section falls back to its defaults when absent:
//!
//! ```yaml
//! ingestion:
//!   sample_size: 4096
//!   encodings: [utf-8, latin-1]
//! interpolation:
//!   max_neighbors: 50
//!   power: 2.0
//!   column_chunk_size: 1000
//!   parallel_chunks: false
//!   resampling: nearest
//! render:
//!   tiff_compression: deflate
//!   alpha_tiff: false
//! ```

use std::fs;
use std::path::Path;

use grid_processor::InterpolationConfig;
use ingestion::IngestionConfig;
use renderer::RenderConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ingestion: IngestionConfig,
    pub interpolation: InterpolationConfig,
    pub render: RenderConfig,
}

impl PipelineConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        info!(path = %path.display(), "Loaded pipeline configuration");
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Overlay environment variables on every section.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        Ok(Self {
            ingestion: self.ingestion.with_env()?,
            interpolation: self.interpolation.with_env()?,
            render: self.render.with_env()?,
        })
    }

    /// The file when given (defaults otherwise), overlaid with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        base.with_env()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ingestion.validate()?;
        self.interpolation.validate()?;
        self.render.validate()?;
        Ok(())
    }
}
