//! Weight specifications: which columns feed the surface and how.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CommonError, CommonResult};

/// Synthetic column name; when present in a spec every row contributes 1.0.
pub const COUNT_COLUMN: &str = "Count";

/// Scattered-data interpolation method for one weighted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Inverse distance weighting over the nearest samples.
    #[serde(rename = "IDW")]
    Idw,
    /// Unnormalized inverse distance accumulation.
    Density,
    /// Piecewise linear over a Delaunay triangulation.
    Linear,
    /// Value of the closest sample.
    Nearest,
}

impl InterpolationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idw => "IDW",
            Self::Density => "Density",
            Self::Linear => "Linear",
            Self::Nearest => "Nearest",
        }
    }

    /// Whether this method is served by the k-nearest-neighbor index.
    pub fn uses_neighbor_index(&self) -> bool {
        matches!(self, Self::Idw | Self::Density | Self::Nearest)
    }
}

impl FromStr for InterpolationMethod {
    type Err = CommonError;

    /// Parse from string (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "idw" => Ok(Self::Idw),
            "density" => Ok(Self::Density),
            "linear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            _ => Err(CommonError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One weighted field of a [`WeightSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntry {
    pub column: String,
    pub weight: f64,
    pub method: InterpolationMethod,
}

/// Mapping from column name to `(weight, method)`.
///
/// Entries are kept sorted by column name so repeated runs sum fields in the
/// same order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightSpec {
    entries: Vec<WeightEntry>,
}

/// Weight as it appears on the wire: a number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawWeight {
    Number(f64),
    Text(String),
}

impl WeightSpec {
    /// Build a spec from entries; later duplicates replace earlier ones.
    pub fn new(entries: impl IntoIterator<Item = WeightEntry>) -> Self {
        let mut by_column: BTreeMap<String, WeightEntry> = BTreeMap::new();
        for entry in entries {
            by_column.insert(entry.column.clone(), entry);
        }
        Self {
            entries: by_column.into_values().collect(),
        }
    }

    /// Parse `{"column": [weight, "method"], ...}`.
    ///
    /// Single quotes are accepted in place of double quotes, since specs
    /// submitted through HTML forms often arrive that way.
    pub fn from_json(json: &str) -> CommonResult<Self> {
        let normalized = json.replace('\'', "\"");
        let raw: BTreeMap<String, (RawWeight, String)> = serde_json::from_str(&normalized)?;

        if raw.is_empty() {
            return Err(CommonError::InvalidWeightSpec(
                "at least one column is required".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(raw.len());
        for (column, (weight, method)) in raw {
            let weight = match weight {
                RawWeight::Number(w) => w,
                RawWeight::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                    CommonError::InvalidWeightSpec(format!(
                        "weight for '{}' is not numeric: {:?}",
                        column, text
                    ))
                })?,
            };
            if !weight.is_finite() {
                return Err(CommonError::InvalidWeightSpec(format!(
                    "weight for '{}' must be finite",
                    column
                )));
            }
            entries.push(WeightEntry {
                column,
                weight,
                method: method.parse()?,
            });
        }

        Ok(Self { entries })
    }

    /// Serialize back to the wire form, e.g. for storing on a layer record.
    pub fn to_json(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .entries
            .iter()
            .map(|e| {
                (
                    e.column.clone(),
                    serde_json::json!([e.weight, e.method.as_str()]),
                )
            })
            .collect();
        serde_json::Value::Object(map).to_string()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightEntry> {
        self.entries.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.column.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&WeightEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    /// Whether the synthetic point-count column is requested.
    pub fn wants_count(&self) -> bool {
        self.get(COUNT_COLUMN).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
