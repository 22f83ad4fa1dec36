//! Raw acquisition run tables read from CSV exports.
//!
//! Instrument software exports one row per acquisition event, with a
//! `Solution Label` column and one numeric column per measured element.
//! This module reads such an export into an untyped [`RunTable`]; the
//! typed dataset conversion lives downstream in `oes-core`.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::warn;

use crate::numeric::parse_f64;

/// An untyped run table: normalized headers plus string cells.
#[derive(Debug, Clone)]
pub struct RunTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RunTable {
    /// Index of a header, matched case-insensitively on the trimmed name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_ascii_lowercase();
        self.headers
            .iter()
            .position(|header| header.trim().to_ascii_lowercase() == wanted)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a run CSV. The first non-empty row is the header; fully empty rows
/// are dropped; short records are padded to the header width.
pub fn read_run_table(path: &Path) -> Result<RunTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Ok(RunTable {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    }
    let headers: Vec<String> = raw_rows[0].iter().map(|value| normalize_header(value)).collect();
    let mut rows = Vec::new();
    for record in raw_rows.iter().skip(1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).map(String::as_str).unwrap_or("");
            row.push(normalize_cell(value));
        }
        rows.push(row);
    }
    Ok(RunTable { headers, rows })
}

/// Headers other than the label/order columns whose non-empty cells are
/// mostly numeric: the candidate element columns of a run table.
///
/// Stray non-numeric cells (`n/a`, `<LOD`) do not disqualify an element
/// column; they coerce to missing downstream. A column is only dropped
/// when most of its non-empty cells fail to parse.
pub fn numeric_columns(table: &RunTable, skip: &BTreeSet<String>) -> Vec<String> {
    let mut columns = Vec::new();
    for (idx, header) in table.headers.iter().enumerate() {
        if header.is_empty() || skip.contains(&header.to_ascii_lowercase()) {
            continue;
        }
        let mut non_empty = 0usize;
        let mut numeric = 0usize;
        for row in &table.rows {
            let value = row.get(idx).map(String::as_str).unwrap_or("");
            if value.is_empty() {
                continue;
            }
            non_empty += 1;
            if parse_f64(value).is_some() {
                numeric += 1;
            }
        }
        if non_empty > 0 && numeric * 2 > non_empty {
            if numeric < non_empty {
                warn!(
                    column = %header,
                    skipped = non_empty - numeric,
                    "non-numeric cells in element column treated as missing"
                );
            }
            columns.push(header.clone());
        }
    }
    columns
}
