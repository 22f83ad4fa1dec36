//! The owned acquisition dataset.
//!
//! One `Dataset` value holds the whole run: rows in acquisition order, the
//! element columns, and optional source-file partition boundaries. All
//! correction operations take the dataset by exclusive reference; there is
//! exactly one logical writer at a time, and only the undo manager replaces
//! the value wholesale.

use std::collections::{BTreeMap, BTreeSet};

use oes_ingest::{RunTable, numeric_columns, parse_f64, parse_i64};
use oes_model::{ElementName, FilePartition, ScanError};

/// Conventional label column of an instrument export.
pub const SOLUTION_LABEL: &str = "Solution Label";

/// One acquisition event.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Acquisition-order index. Immutable once the dataset is built.
    pub original_index: i64,
    /// Dense 0..N-1 index after ordering by `original_index`.
    pub pivot_index: usize,
    pub solution_label: String,
    values: BTreeMap<ElementName, Option<f64>>,
}

impl Row {
    pub fn new(
        original_index: i64,
        pivot_index: usize,
        solution_label: impl Into<String>,
        values: BTreeMap<ElementName, Option<f64>>,
    ) -> Self {
        Self {
            original_index,
            pivot_index,
            solution_label: solution_label.into(),
            values,
        }
    }

    /// Measured value for an element; None for missing or non-numeric cells.
    pub fn value(&self, element: &ElementName) -> Option<f64> {
        self.values.get(element).copied().flatten()
    }

    pub fn set_value(&mut self, element: &ElementName, value: f64) {
        self.values.insert(element.clone(), Some(value));
    }

    /// True when no element carries a usable value.
    pub fn is_effectively_empty(&self) -> bool {
        self.values.values().all(Option::is_none)
    }
}

/// The acquisition run as an owned, ordered table.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
    elements: Vec<ElementName>,
    partitions: Vec<FilePartition>,
}

impl Dataset {
    /// Build a dataset from a raw run table. Row order is acquisition order.
    ///
    /// Fails with [`ScanError::MissingColumn`] when the label column is
    /// absent; element columns are every all-numeric column besides the
    /// label and order columns. Non-numeric cells inside element columns
    /// become missing values, never errors.
    pub fn from_table(table: &RunTable) -> Result<Self, ScanError> {
        Self::from_table_with_order(table, None)
    }

    /// As [`Dataset::from_table`], taking acquisition order from an explicit
    /// column when one is named. Rows with an unparsable order cell keep
    /// their file position.
    pub fn from_table_with_order(
        table: &RunTable,
        order_column: Option<&str>,
    ) -> Result<Self, ScanError> {
        let label_idx = table
            .column_index(SOLUTION_LABEL)
            .ok_or_else(|| ScanError::MissingColumn(SOLUTION_LABEL.to_string()))?;
        let order_idx = order_column.and_then(|name| table.column_index(name));

        let mut skip = BTreeSet::new();
        skip.insert(SOLUTION_LABEL.to_ascii_lowercase());
        if let Some(name) = order_column {
            skip.insert(name.to_ascii_lowercase());
        }
        let elements: Vec<ElementName> = numeric_columns(table, &skip)
            .into_iter()
            .filter_map(|name| ElementName::new(name).ok())
            .collect();
        let element_indices: Vec<(ElementName, usize)> = elements
            .iter()
            .filter_map(|element| {
                table
                    .column_index(element.as_str())
                    .map(|idx| (element.clone(), idx))
            })
            .collect();

        let mut rows: Vec<Row> = Vec::with_capacity(table.row_count());
        for (position, record) in table.rows.iter().enumerate() {
            let label = record.get(label_idx).cloned().unwrap_or_default();
            let original_index = order_idx
                .and_then(|idx| record.get(idx))
                .and_then(|cell| parse_i64(cell))
                .unwrap_or(position as i64);
            let mut values = BTreeMap::new();
            for (element, idx) in &element_indices {
                let cell = record.get(*idx).map(String::as_str).unwrap_or("");
                values.insert(element.clone(), parse_f64(cell));
            }
            rows.push(Row::new(original_index, 0, label, values));
        }
        rows.sort_by_key(|row| row.original_index);
        for (pivot, row) in rows.iter_mut().enumerate() {
            row.pivot_index = pivot;
        }
        Ok(Self {
            rows,
            elements,
            partitions: Vec::new(),
        })
    }

    /// Build a dataset directly from rows, for callers that already hold
    /// typed data. Rows are re-ordered by `original_index` and re-pivoted.
    pub fn from_rows(mut rows: Vec<Row>, elements: Vec<ElementName>) -> Self {
        rows.sort_by_key(|row| row.original_index);
        for (pivot, row) in rows.iter_mut().enumerate() {
            row.pivot_index = pivot;
        }
        Self {
            rows,
            elements,
            partitions: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, pivot_index: usize) -> Option<&Row> {
        self.rows.get(pivot_index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn elements(&self) -> &[ElementName] {
        &self.elements
    }

    pub fn value(&self, pivot_index: usize, element: &ElementName) -> Option<f64> {
        self.rows.get(pivot_index).and_then(|row| row.value(element))
    }

    pub fn set_value(&mut self, pivot_index: usize, element: &ElementName, value: f64) {
        if let Some(row) = self.rows.get_mut(pivot_index) {
            row.set_value(element, value);
        }
    }

    /// Pivot index of the row with the given acquisition index. Rows are
    /// kept sorted by `original_index`, so this is a binary search.
    pub fn pivot_of(&self, original_index: i64) -> Option<usize> {
        self.rows
            .binary_search_by_key(&original_index, |row| row.original_index)
            .ok()
    }

    pub fn partitions(&self) -> &[FilePartition] {
        &self.partitions
    }

    pub fn set_partitions(&mut self, partitions: Vec<FilePartition>) {
        self.partitions = partitions;
    }

    /// Index of the partition containing an acquisition index, if any.
    pub fn partition_index(&self, original_index: i64) -> Option<usize> {
        self.partitions
            .iter()
            .position(|partition| partition.contains(original_index))
    }

    /// Distinct labels in acquisition order, capped at `limit`. Used for
    /// scan-failure diagnostics.
    pub fn sample_labels(&self, limit: usize) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut labels = Vec::new();
        for row in &self.rows {
            if labels.len() >= limit {
                break;
            }
            if seen.insert(row.solution_label.clone()) {
                labels.push(row.solution_label.clone());
            }
        }
        labels
    }
}
