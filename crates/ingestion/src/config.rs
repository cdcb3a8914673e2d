//! Ingestion configuration.
//!
//! Defaults reproduce the behavior expected from uploaded spreadsheets:
//! a 4 KiB sniffing sample, the six supported encodings in fixed order and
//! the usual spreadsheet spellings of a missing value.

use serde::{Deserialize, Serialize};

use crate::encoding::TextEncoding;
use crate::error::{IngestionError, Result};

/// Default number of bytes sampled for delimiter detection.
pub const DEFAULT_SAMPLE_SIZE: usize = 4096;

/// Default share of records that must agree on a delimiter count.
pub const DEFAULT_CONSISTENCY: f64 = 0.9;

/// Cell spellings treated as null.
pub fn default_na_values() -> Vec<String> {
    [
        "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Bytes read from the start of the input for delimiter detection
    pub sample_size: usize,
    /// Minimum share of sampled records with the modal delimiter count
    pub consistency_threshold: f64,
    /// Encodings tried in order until one parses
    pub encodings: Vec<TextEncoding>,
    /// Cell values treated as missing
    pub na_values: Vec<String>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            consistency_threshold: DEFAULT_CONSISTENCY,
            encodings: TextEncoding::ALL.to_vec(),
            na_values: default_na_values(),
        }
    }
}

impl IngestionConfig {
    /// Overlay environment variables on the defaults.
    ///
    /// - `INGEST_SAMPLE_SIZE`
    /// - `INGEST_CONSISTENCY`
    /// - `INGEST_ENCODINGS` (comma separated, e.g. `utf-8,latin-1`)
    /// - `INGEST_NA_VALUES` (comma separated)
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlay environment variables on `self`, then validate.
    pub fn with_env(self) -> Result<Self> {
        let mut config = self;

        if let Some(size) = std::env::var("INGEST_SAMPLE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.sample_size = size;
        }

        if let Some(threshold) = std::env::var("INGEST_CONSISTENCY")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.consistency_threshold = threshold;
        }

        if let Ok(list) = std::env::var("INGEST_ENCODINGS") {
            config.encodings = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<TextEncoding>)
                .collect::<Result<Vec<_>>>()?;
        }

        if let Ok(list) = std::env::var("INGEST_NA_VALUES") {
            config.na_values = list.split(',').map(|s| s.to_string()).collect();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(IngestionError::InvalidConfig(
                "sample_size must be greater than zero".to_string(),
            ));
        }
        if !(self.consistency_threshold > 0.0 && self.consistency_threshold <= 1.0) {
            return Err(IngestionError::InvalidConfig(format!(
                "consistency_threshold must be in (0, 1], got {}",
                self.consistency_threshold
            )));
        }
        if self.encodings.is_empty() {
            return Err(IngestionError::InvalidConfig(
                "at least one encoding is required".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn is_na(&self, cell: &str) -> bool {
        self.na_values.iter().any(|na| na == cell.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = IngestionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.encodings.len(), 6);
        assert_eq!(config.encodings[0], TextEncoding::Utf8);
    }

    #[test]
    fn test_rejects_empty_encodings() {
        let config = IngestionConfig {
            encodings: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_na_markers() {
        let config = IngestionConfig::default();
        assert!(config.is_na(""));
        assert!(config.is_na("  NA "));
        assert!(config.is_na("#N/A"));
        assert!(!config.is_na("0"));
    }
}
