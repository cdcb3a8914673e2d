//! Field delimiter detection.
//!
//! Detection runs in two passes over a fixed-size sample from the start of
//! the input:
//!
//! 1. **Sniffing**: for every candidate, count its occurrences outside double
//!    quotes in each sampled record. A candidate qualifies when its modal
//!    count is non-zero and at least `consistency_threshold` of the records
//!    share it. The bar starts at full agreement and drops in steps of 0.01
//!    down to the threshold; at the first level where anything qualifies,
//!    the qualifying candidate earliest in preference order wins.
//! 2. **Fallback**: when nothing qualifies, the candidate with the highest
//!    raw count in the sample is used (comma when the sample holds none).
//!
//! The sample is decoded lossily with NUL characters removed, so UTF-16
//! input sniffs the same as its UTF-8 equivalent.

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom};

use raster_common::ErrorKind;
use tracing::{debug, warn};

use crate::config::IngestionConfig;
use crate::error::Result;

/// Candidate delimiters in preference order.
pub const CANDIDATES: [u8; 5] = [b',', b'\t', b';', b'|', b' '];

/// How a delimiter was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    /// Per-record counts were consistent
    Sniffed,
    /// Most frequent candidate in the sample
    Counted,
    /// Nothing found; comma assumed
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    pub byte: u8,
    pub method: DetectionMethod,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        self.byte as char
    }
}

/// Detect the delimiter of a seekable input.
///
/// Reads up to `config.sample_size` bytes from the current position and
/// seeks back to it afterwards.
pub fn detect_delimiter<R: Read + Seek>(reader: &mut R, config: &IngestionConfig) -> Result<Delimiter> {
    let start = reader.stream_position()?;

    let mut sample = Vec::with_capacity(config.sample_size);
    let read = reader
        .by_ref()
        .take(config.sample_size as u64)
        .read_to_end(&mut sample);
    // Restore the position even when the read failed.
    reader.seek(SeekFrom::Start(start))?;
    read?;

    // A full sample most likely ends mid-record
    if sample.len() == config.sample_size {
        if let Some(last_newline) = sample.iter().rposition(|&b| b == b'\n') {
            sample.truncate(last_newline + 1);
        }
    }

    Ok(detect_in_sample(&sample, config.consistency_threshold))
}

/// Detect the delimiter of an in-memory sample.
pub fn detect_in_sample(sample: &[u8], consistency_threshold: f64) -> Delimiter {
    let text: String = String::from_utf8_lossy(sample)
        .chars()
        .filter(|&c| c != '\0')
        .collect();
    let records = split_records(&text);

    if let Some(byte) = sniff(&records, consistency_threshold) {
        debug!(delimiter = ?(byte as char), "Delimiter sniffed");
        return Delimiter {
            byte,
            method: DetectionMethod::Sniffed,
        };
    }

    warn!(
        kind = %ErrorKind::DelimiterAmbiguous,
        records = records.len(),
        "Delimiter sniffing was inconclusive, falling back to counting"
    );
    count_fallback(&text)
}

/// Split into records on newlines outside quotes, skipping blank lines.
fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                let record = text[start..i].trim_end_matches('\r');
                if !record.trim().is_empty() {
                    records.push(record);
                }
                start = i + 1;
            }
            _ => {}
        }
    }

    let tail = text[start..].trim_end_matches('\r');
    if !tail.trim().is_empty() {
        records.push(tail);
    }
    records
}

fn count_outside_quotes(record: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in record.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Step by which the agreement bar is lowered while sniffing.
const CONSISTENCY_STEP: f64 = 0.01;

fn sniff(records: &[&str], consistency_threshold: f64) -> Option<u8> {
    if records.is_empty() {
        return None;
    }

    let agreement: Vec<(u8, f64)> = CANDIDATES
        .iter()
        .map(|&candidate| (candidate, modal_agreement(records, candidate)))
        .collect();

    let mut level = 1.0;
    while level >= consistency_threshold - f64::EPSILON {
        if let Some(&(candidate, _)) = agreement.iter().find(|&&(_, share)| share >= level) {
            return Some(candidate);
        }
        level -= CONSISTENCY_STEP;
    }
    None
}

/// Share of records agreeing on the modal count of `candidate`, or zero when
/// that count is zero.
fn modal_agreement(records: &[&str], candidate: u8) -> f64 {
    let mut frequencies: HashMap<usize, usize> = HashMap::new();
    for record in records {
        *frequencies
            .entry(count_outside_quotes(record, candidate))
            .or_insert(0) += 1;
    }

    // Modal count, ties broken toward the larger count
    let (mode, agreeing) = frequencies
        .into_iter()
        .max_by_key(|&(count, records)| (records, count))
        .unwrap_or((0, 0));

    if mode == 0 {
        0.0
    } else {
        agreeing as f64 / records.len() as f64
    }
}

fn count_fallback(text: &str) -> Delimiter {
    let mut best = (b',', 0usize);
    for &candidate in &CANDIDATES {
        let count = text.bytes().filter(|&b| b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }

    if best.1 == 0 {
        warn!(kind = %ErrorKind::DelimiterAmbiguous, "No candidate delimiter found, assuming comma");
        Delimiter {
            byte: b',',
            method: DetectionMethod::Default,
        }
    } else {
        Delimiter {
            byte: best.0,
            method: DetectionMethod::Counted,
        }
    }
}
