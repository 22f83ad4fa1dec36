//! The scanned reference-point table.
//!
//! Holds every positioned reference row together with its per-element
//! original values (frozen at scan time) and current values (edited by the
//! drift operations). Points are never deleted; unusable ones are flagged
//! empty at scan time and user exclusions go into a separate, reversible
//! ignored set.

use std::collections::{BTreeMap, BTreeSet};

use oes_model::{ElementName, ReferenceKind, ReferencePoint};

/// One reference row with its frozen and editable element values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedReference {
    pub point: ReferencePoint,
    original: BTreeMap<ElementName, Option<f64>>,
    current: BTreeMap<ElementName, Option<f64>>,
}

impl ScannedReference {
    pub fn new(point: ReferencePoint, values: BTreeMap<ElementName, Option<f64>>) -> Self {
        Self {
            point,
            current: values.clone(),
            original: values,
        }
    }

    /// Value at first scan. Never mutated after construction.
    pub fn original_value(&self, element: &ElementName) -> Option<f64> {
        self.original.get(element).copied().flatten()
    }

    pub fn current_value(&self, element: &ElementName) -> Option<f64> {
        self.current.get(element).copied().flatten()
    }

    pub fn set_current(&mut self, element: &ElementName, value: f64) {
        self.current.insert(element.clone(), Some(value));
    }

    pub fn reset_current(&mut self, element: &ElementName) {
        let original = self.original.get(element).copied().flatten();
        self.current.insert(element.clone(), original);
    }

    /// Drift ratio for an element: current / original. None when either
    /// value is missing or the original is zero (an undefined ratio is a
    /// no-op reference, surfaced as N/A).
    pub fn ratio(&self, element: &ElementName) -> Option<f64> {
        let original = self.original_value(element)?;
        let current = self.current_value(element)?;
        if original == 0.0 {
            return None;
        }
        Some(current / original)
    }

    fn has_no_values(&self) -> bool {
        self.original.values().all(Option::is_none)
    }
}

/// All reference points of a scan, with the empty and ignored sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    points: Vec<ScannedReference>,
    /// Scanner-flagged: no usable value in any element column.
    empty: BTreeSet<i64>,
    /// User-chosen exclusions; reversible, unlike the empty set.
    ignored: BTreeSet<i64>,
}

impl ReferenceTable {
    pub fn new(points: Vec<ScannedReference>) -> Self {
        let empty = points
            .iter()
            .filter(|reference| reference.has_no_values())
            .map(|reference| reference.point.original_index)
            .collect();
        Self {
            points,
            empty,
            ignored: BTreeSet::new(),
        }
    }

    pub fn points(&self) -> &[ScannedReference] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<&ScannedReference> {
        self.points.get(index)
    }

    pub fn point_mut(&mut self, index: usize) -> Option<&mut ScannedReference> {
        self.points.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct reference numbers carried by Base/Check points.
    pub fn reference_numbers(&self) -> BTreeSet<i64> {
        self.points
            .iter()
            .filter(|reference| reference.point.kind != ReferenceKind::Cone)
            .map(|reference| reference.point.reference_number)
            .collect()
    }

    /// Indices of the Base/Check points of one reference group, in pivot
    /// order (the table itself is acquisition-ordered).
    pub fn group_indices(&self, reference_number: i64) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, reference)| {
                reference.point.kind != ReferenceKind::Cone
                    && reference.point.reference_number == reference_number
            })
            .map(|(index, _)| index)
            .collect()
    }

    /// Acquisition indices of every reference row, Cones included. The
    /// applicator uses this to keep reference rows out of sample selection.
    pub fn original_indices(&self) -> BTreeSet<i64> {
        self.points
            .iter()
            .map(|reference| reference.point.original_index)
            .collect()
    }

    /// Effectively empty: scanner-flagged or user-ignored. Both are
    /// excluded from trend and segment math.
    pub fn is_effectively_empty(&self, original_index: i64) -> bool {
        self.empty.contains(&original_index) || self.ignored.contains(&original_index)
    }

    pub fn ignore(&mut self, original_index: i64) {
        self.ignored.insert(original_index);
    }

    pub fn unignore(&mut self, original_index: i64) {
        self.ignored.remove(&original_index);
    }

    pub fn ignored(&self) -> &BTreeSet<i64> {
        &self.ignored
    }

    pub fn empty(&self) -> &BTreeSet<i64> {
        &self.empty
    }
}
