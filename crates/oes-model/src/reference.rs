//! Reference material (RM) point types.

use serde::{Deserialize, Serialize};

/// Role of a reference row in the acquisition sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// Primary drift anchor.
    Base,
    /// Secondary anchor, re-measured between Base points.
    Check,
    /// Segment boundary marker (e.g. after instrument maintenance).
    Cone,
}

impl ReferenceKind {
    /// Cone rows delimit segments; only Base/Check rows carry a usable
    /// reference value.
    pub fn is_boundary(self) -> bool {
        matches!(self, Self::Cone)
    }
}

/// A reference row positioned by the segmenter.
///
/// `span_min`/`span_max` bound the acquisition interval between this point
/// and the previous reference row: sample rows with `original_index`
/// strictly inside the span are corrected against this point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    /// Dense index after sorting by acquisition order.
    pub pivot_index: usize,
    /// Immutable acquisition-order index of the backing row.
    pub original_index: i64,
    pub solution_label: String,
    /// Number parsed from the label (0 when the label carries none).
    pub reference_number: i64,
    pub kind: ReferenceKind,
    /// Segment this point belongs to; monotonic in acquisition order.
    pub segment_id: u32,
    /// The reference number acting as the segment's correction baseline.
    pub ref_reference_number: i64,
    /// Previous reference row's original index, -1 for the first point.
    pub span_min: i64,
    /// This row's original index.
    pub span_max: i64,
}
