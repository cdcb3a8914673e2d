//! Tests for encoding detection, typed tables and sample preparation.

use ingestion::{
    prepare_samples, provide_columns, ColumnKind, GeomSpec, IngestionConfig, IngestionError,
    Table, TextEncoding,
};
use raster_common::{ErrorKind, WeightSpec};
use test_utils::fixtures::{self, delimited};

// ============================================================================
// Encoding tests
// ============================================================================

#[test]
fn test_every_encoding_parses() {
    let text = fixtures::CITIES_CSV;
    let inputs = [
        text.as_bytes().to_vec(),
        fixtures::utf16le_with_bom(text),
        fixtures::utf16be(text),
        fixtures::latin1(text),
    ];

    for bytes in inputs {
        let table = Table::read(&bytes, &IngestionConfig::default()).unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_columns(), 5);
    }
}

#[test]
fn test_utf16be_without_bom_is_not_misread_as_le() {
    let bytes = fixtures::utf16be("x,y\n1,2\n");
    let table = Table::read(&bytes, &IngestionConfig::default()).unwrap();
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["x", "y"]);
}

#[test]
fn test_restricted_encodings_fail() {
    let config = IngestionConfig {
        encodings: vec![TextEncoding::Utf8],
        ..Default::default()
    };
    let err = Table::read(b"name\n\xFF\xFE\xFD\n", &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
    assert!(err.to_string().contains("utf-8"));
}

// ============================================================================
// Classifier tests
// ============================================================================

#[test]
fn test_numeric_columns_in_order() {
    let columns = provide_columns(fixtures::CITIES_CSV.as_bytes(), &IngestionConfig::default()).unwrap();
    assert_eq!(columns, fixtures::CITIES_NUMERIC);
}

#[test]
fn test_every_delimiter_classifies_the_same() {
    for (text, _) in delimited::ALL {
        let table = Table::read(text.as_bytes(), &IngestionConfig::default()).unwrap();
        assert_eq!(table.column("name").unwrap().kind(), ColumnKind::Text);
        assert_eq!(table.column("value").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(table.numeric("value").unwrap(), &[Some(1.0), Some(2.0), Some(3.0)]);
    }
}

// ============================================================================
// Sample preparation
// ============================================================================

#[test]
fn test_dirty_geometry_rows_dropped() {
    let table = Table::read(fixtures::DIRTY_GEOMETRY_CSV.as_bytes(), &IngestionConfig::default()).unwrap();
    let weights = WeightSpec::from_json(r#"{"value": [1, "IDW"]}"#).unwrap();
    let samples = prepare_samples(table, &GeomSpec::new("lat", "lon"), &weights).unwrap();

    // Rows 1 and 6 survive: 2-4 have bad geometry, 5 has no value
    assert_eq!(samples.len(), 2);
    assert_eq!(samples.fields[0].values, vec![1.0, 6.0]);
}

#[test]
fn test_points_are_projected() {
    let table = Table::read(fixtures::FIVE_POINTS_CSV.as_bytes(), &IngestionConfig::default()).unwrap();
    let weights = WeightSpec::from_json(r#"{"population": [1.0, "IDW"]}"#).unwrap();
    let samples = prepare_samples(table, &GeomSpec::new("lat", "lon"), &weights).unwrap();

    assert_eq!(samples.len(), 5);
    let (x, y) = projection::forward(-100.0, 40.0);
    assert_eq!(samples.points[0], [x, y]);
}

#[test]
fn test_missing_geometry_column() {
    let table = Table::read(fixtures::CITIES_CSV.as_bytes(), &IngestionConfig::default()).unwrap();
    let weights = WeightSpec::from_json(r#"{"population": [1.0, "IDW"]}"#).unwrap();
    let err = prepare_samples(table, &GeomSpec::new("lat", "lon"), &weights).unwrap_err();
    assert!(matches!(err, IngestionError::GeometryInvalid(_)));
}
