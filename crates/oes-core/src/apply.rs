//! Correction applicator: commits drift ratios to sample rows.
//!
//! Triggered explicitly per reference group. Walks adjacent pairs of
//! usable reference points and multiplies the sample rows between them by
//! the drift ratio, either uniformly or stepwise-interpolated across the
//! interval. Every affected row lands in the change-log.

use std::collections::BTreeMap;

use tracing::{debug, info};

use oes_model::{
    ChangeLog, CorrectionBasis, CorrectionOptions, CorrectionRecord, ElementName,
};

use crate::dataset::Dataset;
use crate::reference_table::ReferenceTable;

/// User-edited individual sample values, keyed by acquisition index and
/// element. An override takes precedence over the computed ratio for that
/// row and is recorded with the implied ratio `new / old`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualCorrections {
    entries: BTreeMap<(i64, ElementName), f64>,
}

impl ManualCorrections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, original_index: i64, element: ElementName, value: f64) {
        self.entries.insert((original_index, element), value);
    }

    pub fn get(&self, original_index: i64, element: &ElementName) -> Option<f64> {
        self.entries
            .get(&(original_index, element.clone()))
            .copied()
    }

    pub fn remove(&mut self, original_index: i64, element: &ElementName) {
        self.entries.remove(&(original_index, element.clone()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one apply pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// False when the group had fewer than two usable points: nothing to
    /// apply, and no state was touched.
    pub applied: bool,
    pub corrected_rows: usize,
}

impl ApplyOutcome {
    pub fn nothing_to_apply() -> Self {
        Self {
            applied: false,
            corrected_rows: 0,
        }
    }
}

/// Apply the (possibly edited) drift ratios of one reference group to the
/// sample rows between its points, writing corrected values into the
/// dataset and the change-log.
///
/// Reference rows themselves are rewritten at their current values as part
/// of the same commit. Callers push an undo snapshot first; this function
/// never partially applies.
pub fn apply_group(
    dataset: &mut Dataset,
    table: &mut ReferenceTable,
    change_log: &mut ChangeLog,
    manual: &ManualCorrections,
    element: &ElementName,
    reference_number: i64,
    options: &CorrectionOptions,
) -> ApplyOutcome {
    let group = table.group_indices(reference_number);
    let usable: Vec<usize> = group
        .iter()
        .copied()
        .filter(|&index| {
            table
                .point(index)
                .is_some_and(|reference| !table.is_effectively_empty(reference.point.original_index))
        })
        .collect();
    if usable.len() < 2 {
        info!(
            element = %element,
            reference_number,
            points = usable.len(),
            "nothing to apply"
        );
        return ApplyOutcome::nothing_to_apply();
    }

    let reference_rows = table.original_indices();
    let mut corrected_rows = 0usize;

    for pair in usable.windows(2) {
        let (Some(prev), Some(next)) = (table.point(pair[0]), table.point(pair[1])) else {
            continue;
        };
        let prev_ratio = prev.ratio(element).unwrap_or(1.0);
        let current_ratio = next.ratio(element).unwrap_or(1.0);
        let low = prev.point.original_index;
        let high = next.point.original_index;

        // Sample rows strictly inside the interval, skipping reference rows
        // and rows with no value for this element.
        let selected: Vec<(usize, i64, String, f64)> = dataset
            .rows()
            .iter()
            .filter(|row| {
                row.original_index > low
                    && row.original_index < high
                    && !reference_rows.contains(&row.original_index)
            })
            .filter_map(|row| {
                row.value(element).map(|value| {
                    (
                        row.pivot_index,
                        row.original_index,
                        row.solution_label.clone(),
                        value,
                    )
                })
            })
            .collect();
        let n = selected.len();
        if n == 0 {
            continue;
        }
        let step = (current_ratio - prev_ratio) / n as f64;

        for (position, (pivot, original_index, label, old_value)) in selected.into_iter().enumerate()
        {
            let ratio = if options.stepwise {
                prev_ratio + step * (position + 1) as f64
            } else {
                current_ratio
            };
            let (new_value, recorded_ratio) = match manual.get(original_index, element) {
                Some(override_value) => {
                    let implied = if old_value != 0.0 {
                        override_value / old_value
                    } else {
                        1.0
                    };
                    (override_value, implied)
                }
                None => (old_value * ratio, ratio),
            };
            debug!(
                label = %label,
                element = %element,
                ratio = recorded_ratio,
                old_value,
                new_value,
                "correcting sample row"
            );
            dataset.set_value(pivot, element, new_value);
            change_log.upsert(CorrectionRecord {
                solution_label: label,
                element: element.clone(),
                basis: CorrectionBasis::Ratio(recorded_ratio),
                original_value: old_value,
                new_value,
            });
            corrected_rows += 1;
        }
    }

    // Reference rows are committed at their edited current values.
    for &index in &group {
        let Some(reference) = table.point(index) else {
            continue;
        };
        if let Some(current) = reference.current_value(element) {
            dataset.set_value(reference.point.pivot_index, element, current);
        }
    }

    info!(
        element = %element,
        reference_number,
        corrected_rows,
        stepwise = options.stepwise,
        "correction applied"
    );
    ApplyOutcome {
        applied: true,
        corrected_rows,
    }
}
