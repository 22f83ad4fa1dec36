//! Drift-ratio engine: interactive edits to reference current values.
//!
//! Operates on one (element, reference number) group at a time. All
//! operations mutate only the reference table's current values; sample
//! rows are untouched until the applicator commits (see `apply`).

use tracing::debug;

use oes_model::{ElementName, FilePartition};

use crate::reference_table::ReferenceTable;
use crate::regress::linear_fit;

/// Scope over which flat-optimize and the slope operations act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeScope {
    /// Each Cone-delimited segment independently.
    Segment,
    /// The whole run at once.
    Global,
    /// Each source-file partition independently.
    PerFile,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    table_index: usize,
    x: f64,
    bucket: i64,
    valid: bool,
}

/// Edit operations on one reference group.
pub struct DriftEngine<'a> {
    table: &'a mut ReferenceTable,
    element: ElementName,
    reference_number: i64,
    partitions: Vec<FilePartition>,
}

impl<'a> DriftEngine<'a> {
    pub fn new(
        table: &'a mut ReferenceTable,
        element: ElementName,
        reference_number: i64,
        partitions: &[FilePartition],
    ) -> Self {
        Self {
            table,
            element,
            reference_number,
            partitions: partitions.to_vec(),
        }
    }

    /// Drift ratio per group point, pivot order. None marks an undefined
    /// ratio (missing value or zero original); such points never correct
    /// samples and appear as N/A in reports.
    pub fn ratios(&self) -> Vec<Option<f64>> {
        self.table
            .group_indices(self.reference_number)
            .into_iter()
            .filter_map(|index| self.table.point(index))
            .map(|reference| reference.ratio(&self.element))
            .collect()
    }

    /// Current values per group point, pivot order.
    pub fn current_values(&self) -> Vec<Option<f64>> {
        self.table
            .group_indices(self.reference_number)
            .into_iter()
            .filter_map(|index| self.table.point(index))
            .map(|reference| reference.current_value(&self.element))
            .collect()
    }

    /// Overwrite one group point's current value, by position within the
    /// group.
    pub fn set_current(&mut self, group_position: usize, value: f64) {
        let indices = self.table.group_indices(self.reference_number);
        if let Some(&table_index) = indices.get(group_position)
            && let Some(reference) = self.table.point_mut(table_index)
        {
            reference.set_current(&self.element, value);
        }
    }

    /// Set every valid point's current value to the first valid point's
    /// current value, within each scope bucket.
    pub fn flat_optimize(&mut self, scope: OptimizeScope) {
        let slots = self.slots(scope);
        for bucket in bucket_ids(&slots) {
            let valid: Vec<Slot> = slots
                .iter()
                .copied()
                .filter(|slot| slot.bucket == bucket && slot.valid)
                .collect();
            let Some(first) = valid.first() else { continue };
            let Some(target) = self
                .table
                .point(first.table_index)
                .and_then(|reference| reference.current_value(&self.element))
            else {
                continue;
            };
            for slot in &valid {
                if let Some(reference) = self.table.point_mut(slot.table_index) {
                    reference.set_current(&self.element, target);
                }
            }
        }
    }

    /// Remove the drift trend entirely: regression slope becomes zero while
    /// the first valid point keeps its value exactly.
    pub fn slope_to_zero(&mut self, scope: OptimizeScope) {
        self.apply_slope(0.0, scope);
    }

    /// Shift valid points so the regression slope becomes `target_slope`,
    /// anchored at the first valid point. Buckets with fewer than two
    /// valid points are left untouched.
    pub fn apply_slope(&mut self, target_slope: f64, scope: OptimizeScope) {
        let slots = self.slots(scope);
        for bucket in bucket_ids(&slots) {
            let valid: Vec<(Slot, f64)> = slots
                .iter()
                .filter(|slot| slot.bucket == bucket && slot.valid)
                .filter_map(|slot| {
                    self.table
                        .point(slot.table_index)
                        .and_then(|reference| reference.current_value(&self.element))
                        .map(|value| (*slot, value))
                })
                .collect();
            if valid.len() < 2 {
                debug!(
                    bucket,
                    points = valid.len(),
                    "slope adjustment skipped, not enough points"
                );
                continue;
            }
            let points: Vec<(f64, f64)> =
                valid.iter().map(|(slot, value)| (slot.x, *value)).collect();
            let Some(fit) = linear_fit(&points) else {
                continue;
            };
            let x_first = valid[0].0.x;
            let correction = fit.slope - target_slope;
            for (slot, value) in &valid {
                let adjusted = value - correction * (slot.x - x_first);
                if let Some(reference) = self.table.point_mut(slot.table_index) {
                    reference.set_current(&self.element, adjusted);
                }
            }
        }
    }

    /// Discard all edits for this group: current values return to the
    /// values frozen at scan time.
    pub fn reset_to_original(&mut self) {
        let element = self.element.clone();
        for table_index in self.table.group_indices(self.reference_number) {
            if let Some(reference) = self.table.point_mut(table_index) {
                reference.reset_current(&element);
            }
        }
    }

    fn slots(&self, scope: OptimizeScope) -> Vec<Slot> {
        self.table
            .group_indices(self.reference_number)
            .into_iter()
            .filter_map(|table_index| {
                let reference = self.table.point(table_index)?;
                let original_index = reference.point.original_index;
                let bucket = match scope {
                    OptimizeScope::Segment => i64::from(reference.point.segment_id),
                    OptimizeScope::Global => 0,
                    OptimizeScope::PerFile => self
                        .partitions
                        .iter()
                        .position(|partition| partition.contains(original_index))
                        .map_or(-1, |index| index as i64),
                };
                let valid = !self.table.is_effectively_empty(original_index)
                    && reference.current_value(&self.element).is_some();
                Some(Slot {
                    table_index,
                    x: reference.point.pivot_index as f64,
                    bucket,
                    valid,
                })
            })
            .collect()
    }
}

fn bucket_ids(slots: &[Slot]) -> Vec<i64> {
    let mut ids: Vec<i64> = slots.iter().map(|slot| slot.bucket).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}
