//! Column classification.

use crate::config::IngestionConfig;
use crate::error::Result;
use crate::table::Table;

/// Names of the numeric columns, in table order.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.is_numeric())
        .map(|c| c.name.clone())
        .collect()
}

/// Parse uploaded bytes and list the columns usable as weights or geometry.
pub fn provide_columns(bytes: &[u8], config: &IngestionConfig) -> Result<Vec<String>> {
    let table = Table::read(bytes, config)?;
    Ok(numeric_columns(&table))
}
