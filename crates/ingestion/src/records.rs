//! Record cleaning: from a typed table to projected, weighted samples.

use projection::mercator;
use raster_common::{Samples, WeightSpec, WeightedField, COUNT_COLUMN};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{IngestionError, Result};
use crate::table::Table;

/// Names of the latitude and longitude columns, in degrees (WGS84).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeomSpec {
    pub lat: String,
    pub lon: String,
}

impl GeomSpec {
    pub fn new(lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }
}

/// Clean `table` and project it into planar samples.
///
/// - A `Count` key in `weights` adds (or replaces) a column of 1.0.
/// - Rows with a missing or zero coordinate are dropped; zero marks missing
///   geometry in the uploads this pipeline receives.
/// - Rows with a missing value in any weighted column are dropped.
/// - Each field value is the cell multiplied by its weight.
pub fn prepare_samples(mut table: Table, geom: &GeomSpec, weights: &WeightSpec) -> Result<Samples> {
    if weights.wants_count() {
        table.set_numeric(COUNT_COLUMN, vec![Some(1.0); table.n_rows()])?;
    }

    let lat = geometry_column(&table, &geom.lat)?;
    let lon = geometry_column(&table, &geom.lon)?;

    let mut weighted = Vec::with_capacity(weights.len());
    for entry in weights.iter() {
        let values = table.numeric(&entry.column).ok_or_else(|| {
            IngestionError::WeightColumn(format!(
                "'{}' (numeric columns: {})",
                entry.column,
                crate::columns::numeric_columns(&table).join(", ")
            ))
        })?;
        weighted.push((entry, values));
    }

    let total = table.n_rows();
    let mut missing_geometry = 0usize;
    let mut missing_value = 0usize;
    let mut unprojectable = 0usize;

    let mut points = Vec::with_capacity(total);
    let mut fields: Vec<WeightedField> = weighted
        .iter()
        .map(|(entry, _)| WeightedField {
            column: entry.column.clone(),
            method: entry.method,
            values: Vec::with_capacity(total),
        })
        .collect();

    for row in 0..total {
        let (Some(lat_deg), Some(lon_deg)) = (lat[row], lon[row]) else {
            missing_geometry += 1;
            continue;
        };
        if lat_deg == 0.0 || lon_deg == 0.0 {
            missing_geometry += 1;
            continue;
        }
        if weighted.iter().any(|(_, values)| values[row].is_none()) {
            missing_value += 1;
            continue;
        }

        let (x, y) = mercator::forward(lon_deg, lat_deg);
        if !x.is_finite() || !y.is_finite() {
            unprojectable += 1;
            continue;
        }

        points.push([x, y]);
        for (field, (entry, values)) in fields.iter_mut().zip(&weighted) {
            field.values.push(values[row].unwrap_or_default() * entry.weight);
        }
    }

    if missing_value > 0 || unprojectable > 0 {
        warn!(
            missing_value,
            unprojectable, "Dropped rows that cannot contribute to the surface"
        );
    }

    if points.is_empty() {
        return Err(IngestionError::GeometryInvalid(format!(
            "no row of {} has usable '{}'/'{}' coordinates",
            total, geom.lat, geom.lon
        )));
    }

    info!(
        rows = total,
        kept = points.len(),
        missing_geometry,
        fields = fields.len(),
        "Prepared samples"
    );

    Ok(Samples { points, fields })
}

fn geometry_column<'a>(table: &'a Table, name: &str) -> Result<&'a [Option<f64>]> {
    match table.column(name) {
        None => Err(IngestionError::GeometryInvalid(format!(
            "column '{}' does not exist",
            name
        ))),
        Some(column) => column.as_numeric().ok_or_else(|| {
            IngestionError::GeometryInvalid(format!("column '{}' is not numeric", name))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestionConfig;
    use raster_common::InterpolationMethod;

    fn table(csv: &str) -> Table {
        Table::parse(csv, b',', &IngestionConfig::default()).unwrap()
    }

    #[test]
    fn test_drops_zero_and_missing_geometry() {
        let t = table("lat,lon,v\n10,20,1\n0,20,1\n10,,1\n11,21,2\n");
        let weights = WeightSpec::from_json(r#"{"v": [2, "IDW"]}"#).unwrap();
        let samples = prepare_samples(t, &GeomSpec::new("lat", "lon"), &weights).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.fields[0].values, vec![2.0, 4.0]);
    }

    #[test]
    fn test_count_column() {
        let t = table("lat,lon,name\n10,20,a\n11,21,b\n");
        let weights = WeightSpec::from_json(r#"{"Count": [1, "Density"]}"#).unwrap();
        let samples = prepare_samples(t, &GeomSpec::new("lat", "lon"), &weights).unwrap();
        assert_eq!(samples.fields[0].values, vec![1.0, 1.0]);
        assert_eq!(samples.fields[0].method, InterpolationMethod::Density);
    }

    #[test]
    fn test_missing_weight_value_drops_row() {
        let t = table("lat,lon,v\n10,20,\n11,21,3\n");
        let weights = WeightSpec::from_json(r#"{"v": [1, "IDW"]}"#).unwrap();
        let samples = prepare_samples(t, &GeomSpec::new("lat", "lon"), &weights).unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_text_geometry_is_invalid() {
        let t = table("lat,lon,v\nnorth,20,1\n");
        let weights = WeightSpec::from_json(r#"{"v": [1, "IDW"]}"#).unwrap();
        let err = prepare_samples(t, &GeomSpec::new("lat", "lon"), &weights).unwrap_err();
        assert!(matches!(err, IngestionError::GeometryInvalid(_)));
    }

    #[test]
    fn test_all_zero_geometry_is_invalid() {
        let t = table("lat,lon,v\n0,0,1\n0,0,2\n");
        let weights = WeightSpec::from_json(r#"{"v": [1, "IDW"]}"#).unwrap();
        let err = prepare_samples(t, &GeomSpec::new("lat", "lon"), &weights).unwrap_err();
        assert_eq!(err.kind(), raster_common::ErrorKind::GeometryInvalid);
    }

    #[test]
    fn test_unknown_weight_column() {
        let t = table("lat,lon,v\n10,20,1\n");
        let weights = WeightSpec::from_json(r#"{"w": [1, "IDW"]}"#).unwrap();
        let err = prepare_samples(t, &GeomSpec::new("lat", "lon"), &weights).unwrap_err();
        assert!(matches!(err, IngestionError::WeightColumn(_)));
    }
}
