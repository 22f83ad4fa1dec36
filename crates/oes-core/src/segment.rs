//! Segmentation of tagged reference rows.
//!
//! Cone markers delimit segments (instrument maintenance boundaries);
//! within a segment one reference number acts as the correction baseline.

use oes_model::{ReferenceKind, ReferencePoint};

/// A reference row tagged by the label parser, before positioning.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedReference {
    pub pivot_index: usize,
    pub original_index: i64,
    pub solution_label: String,
    pub reference_number: i64,
    pub kind: ReferenceKind,
}

/// Position tagged reference rows: assign segment ids, carry the baseline
/// reference number forward, and record each point's acquisition span.
///
/// Invariants: segment ids are non-decreasing in acquisition order; a Cone
/// row always starts a new segment; every row lands in exactly one segment.
/// The input must already be sorted by `original_index`.
pub fn position_references(tagged: &[TaggedReference]) -> Vec<ReferencePoint> {
    let mut positioned = Vec::with_capacity(tagged.len());
    let mut segment_id: u32 = 0;
    let mut baseline: Option<i64> = None;
    let mut previous_index: i64 = -1;

    for row in tagged {
        if row.kind == ReferenceKind::Cone {
            segment_id += 1;
            baseline = None;
        } else if baseline.is_none() {
            baseline = Some(row.reference_number);
        }
        positioned.push(ReferencePoint {
            pivot_index: row.pivot_index,
            original_index: row.original_index,
            solution_label: row.solution_label.clone(),
            reference_number: row.reference_number,
            kind: row.kind,
            segment_id,
            ref_reference_number: baseline.unwrap_or(row.reference_number),
            span_min: previous_index,
            span_max: row.original_index,
        });
        previous_index = row.original_index;
    }
    positioned
}
