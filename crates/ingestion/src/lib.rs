//! Tabular point data ingestion.
//!
//! Turns an uploaded byte buffer into projected, weighted samples:
//!
//! - delimiter sniffing with a counting fallback ([`delimiter`])
//! - encoding detection over a fixed list of encodings ([`encoding`])
//! - typed table parsing ([`table`]) and numeric column listing ([`columns`])
//! - record cleaning and Web Mercator projection ([`records`])

pub mod columns;
pub mod config;
pub mod delimiter;
pub mod encoding;
pub mod error;
pub mod records;
pub mod table;

// Re-exports
pub use columns::{numeric_columns, provide_columns};
pub use config::IngestionConfig;
pub use delimiter::{detect_delimiter, detect_in_sample, Delimiter, DetectionMethod};
pub use encoding::TextEncoding;
pub use error::{IngestionError, Result};
pub use records::{prepare_samples, GeomSpec};
pub use table::{Column, ColumnData, ColumnKind, Table};
