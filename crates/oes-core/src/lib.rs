//! Drift-correction engine for ICP-OES acquisition runs.
//!
//! The core pipeline: a raw run table becomes an owned [`Dataset`]; the
//! scan extracts and segments its reference rows into a
//! [`ReferenceTable`]; the [`DriftEngine`] edits per-reference current
//! values (flat-optimize, slope-to-zero, manual edits); an explicit apply
//! commits the resulting ratios to the sample rows, recorded in a
//! change-log and guarded by snapshot undo.

pub mod apply;
pub mod dataset;
pub mod drift;
pub mod label;
pub mod reference_table;
pub mod regress;
pub mod scan;
pub mod segment;
pub mod undo;

pub use apply::{ApplyOutcome, ManualCorrections, apply_group};
pub use dataset::{Dataset, Row, SOLUTION_LABEL};
pub use drift::{DriftEngine, OptimizeScope};
pub use label::{ParsedReference, is_reference_label, parse_reference_label};
pub use reference_table::{ReferenceTable, ScannedReference};
pub use regress::{LinearFit, linear_fit};
pub use scan::{ScanEvent, ScanWorker, scan_references};
pub use segment::{TaggedReference, position_references};
pub use undo::CorrectionSession;
