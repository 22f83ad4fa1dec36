//! Snapshot-based undo over the correction session state.
//!
//! Every committing operation pushes a full snapshot of the four state
//! pieces first; undo pops the stack and restores all four atomically.
//! There is no redo and no partial replay: restoration is exact.

use tracing::info;

use oes_model::{ChangeLog, CorrectionOptions, ElementName};

use crate::apply::{ApplyOutcome, ManualCorrections, apply_group};
use crate::dataset::Dataset;
use crate::reference_table::ReferenceTable;

/// Immutable copy of the session state at one commit boundary.
#[derive(Debug, Clone)]
struct UndoSnapshot {
    dataset: Dataset,
    references: ReferenceTable,
    change_log: ChangeLog,
    manual: ManualCorrections,
}

/// The mutable state of one correction session: the dataset, its scanned
/// reference table, the accumulated change-log and manual overrides, and
/// the undo stack guarding them.
///
/// One logical writer at a time; callers issuing commands asynchronously
/// must serialize access to the session themselves.
#[derive(Debug)]
pub struct CorrectionSession {
    pub dataset: Dataset,
    pub references: ReferenceTable,
    pub change_log: ChangeLog,
    pub manual: ManualCorrections,
    undo: Vec<UndoSnapshot>,
}

impl CorrectionSession {
    pub fn new(dataset: Dataset, references: ReferenceTable) -> Self {
        Self {
            dataset,
            references,
            change_log: ChangeLog::new(),
            manual: ManualCorrections::new(),
            undo: Vec::new(),
        }
    }

    /// Push an undo snapshot. Committing operations outside this crate
    /// (e.g. CRM blank/scale batches) call this before mutating.
    pub fn push_snapshot(&mut self) {
        self.undo.push(UndoSnapshot {
            dataset: self.dataset.clone(),
            references: self.references.clone(),
            change_log: self.change_log.clone(),
            manual: self.manual.clone(),
        });
    }

    /// Apply one reference group's corrections as a single atomic commit.
    ///
    /// A group with fewer than two usable points is a no-op: no snapshot
    /// is retained and the state is untouched.
    pub fn apply_group(
        &mut self,
        element: &ElementName,
        reference_number: i64,
        options: &CorrectionOptions,
    ) -> ApplyOutcome {
        self.push_snapshot();
        let outcome = apply_group(
            &mut self.dataset,
            &mut self.references,
            &mut self.change_log,
            &self.manual,
            element,
            reference_number,
            options,
        );
        if !outcome.applied {
            self.undo.pop();
        }
        outcome
    }

    /// Undo the most recent commit. Returns false when the stack is empty.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        self.dataset = snapshot.dataset;
        self.references = snapshot.references;
        self.change_log = snapshot.change_log;
        self.manual = snapshot.manual;
        info!(depth = self.undo.len(), "undo restored previous state");
        true
    }

    /// Number of undoable commits.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}
