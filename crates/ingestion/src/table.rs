//! Typed tables parsed from delimited text.
//!
//! Every column carries a declared kind, fixed at parse time: a column is
//! numeric when all of its non-null cells parse as floating point numbers,
//! textual otherwise.

use std::collections::HashSet;
use std::io::Cursor;

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::config::IngestionConfig;
use crate::delimiter::{detect_delimiter, Delimiter};
use crate::encoding::TextEncoding;
use crate::error::{IngestionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Cell values of one column; `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        match self {
            ColumnData::Numeric(values) => retain_by_mask(values, keep),
            ColumnData::Text(values) => retain_by_mask(values, keep),
        }
    }
}

fn retain_by_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut row = 0;
    values.retain(|_| {
        let kept = keep.get(row).copied().unwrap_or(false);
        row += 1;
        kept
    });
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(values) => Some(values),
            ColumnData::Text(_) => None,
        }
    }
}

/// An ordered set of equally long, typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Detect delimiter and encoding, then parse.
    ///
    /// Encodings are tried in `config.encodings` order; the first one that
    /// decodes strictly and parses wins.
    pub fn read(bytes: &[u8], config: &IngestionConfig) -> Result<Self> {
        let delimiter = detect_delimiter(&mut Cursor::new(bytes), config)?;

        for encoding in &config.encodings {
            let Some(text) = encoding.decode(bytes) else {
                debug!(encoding = %encoding, "Input is not valid in this encoding");
                continue;
            };

            if text.contains('\0') {
                debug!(encoding = %encoding, "Decoded text contains NUL characters");
                continue;
            }
            if encoding.is_wide() && !looks_tabular(&text, delimiter) {
                debug!(encoding = %encoding, "Decoded text has no record structure");
                continue;
            }

            match Self::parse(&text, delimiter.byte, config) {
                Ok(table) => {
                    info!(
                        encoding = %encoding,
                        delimiter = ?delimiter.as_char(),
                        rows = table.n_rows(),
                        columns = table.n_columns(),
                        "Parsed table"
                    );
                    return Ok(table);
                }
                Err(e) => {
                    debug!(encoding = %encoding, error = %e, "Parse attempt failed");
                }
            }
        }

        Err(IngestionError::Decode {
            tried: config
                .encodings
                .iter()
                .map(TextEncoding::label)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Parse already decoded text with a known delimiter.
    pub fn parse(text: &str, delimiter: u8, config: &IngestionConfig) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => record.map_err(|e| IngestionError::TableParse(e.to_string()))?,
            None => return Err(IngestionError::TableParse("no columns to parse".to_string())),
        };
        let names = unique_names(header.iter());

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for (row, record) in records.enumerate() {
            let record = record.map_err(|e| IngestionError::TableParse(e.to_string()))?;
            if record.len() > names.len() {
                return Err(IngestionError::TableParse(format!(
                    "row {} has {} fields, expected at most {}",
                    row + 1,
                    record.len(),
                    names.len()
                )));
            }
            for (i, column) in cells.iter_mut().enumerate() {
                let cell = record.get(i).filter(|c| !config.is_na(c));
                column.push(cell.map(str::to_string));
            }
        }

        let n_rows = cells.first().map_or(0, Vec::len);
        let columns = names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column {
                name,
                data: classify(values),
            })
            .collect();

        Ok(Self { columns, n_rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of a numeric column; `None` for missing or textual columns.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).and_then(Column::as_numeric)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Add a numeric column, replacing any column of the same name in place.
    pub fn set_numeric(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.n_rows {
            return Err(IngestionError::TableParse(format!(
                "column '{}' has {} values, table has {} rows",
                name,
                values.len(),
                self.n_rows
            )));
        }

        let data = ColumnData::Numeric(values);
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.data = data,
            None => self.columns.push(Column {
                name: name.to_string(),
                data,
            }),
        }
        Ok(())
    }

    /// Keep only the rows whose mask entry is true.
    pub fn retain_rows(&mut self, keep: &[bool]) {
        for column in &mut self.columns {
            column.data.retain_rows(keep);
        }
        self.n_rows = keep.iter().take(self.n_rows).filter(|&&k| k).count();
    }
}

/// Whether decoded text plausibly holds records split by `delimiter`.
fn looks_tabular(text: &str, delimiter: Delimiter) -> bool {
    text.is_empty() || text.contains('\n') || text.contains(delimiter.as_char())
}

/// Blank headers become `Unnamed: {index}` and repeats get `.1`, `.2`, ...
fn unique_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (i, header) in headers.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", i)
        } else {
            header.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

fn classify(values: Vec<Option<String>>) -> ColumnData {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text.trim().parse::<f64>().ok().map(Some),
        })
        .collect();

    match parsed {
        Some(numbers) => ColumnData::Numeric(numbers),
        None => ColumnData::Text(values),
    }
}
