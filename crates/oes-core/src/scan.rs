//! Reference-point scan: extraction plus segmentation.
//!
//! The scan is the only operation allowed off the main execution context:
//! [`ScanWorker`] runs it on one background thread, reporting progress
//! increments over a channel and delivering the finished table (or error)
//! as its final event. Everything downstream of the scan is synchronous.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use tracing::{debug, info};

use oes_model::{ScanError, ScanOptions};

use crate::dataset::Dataset;
use crate::label::parse_reference_label;
use crate::reference_table::{ReferenceTable, ScannedReference};
use crate::segment::{TaggedReference, position_references};

/// Rows scanned between progress reports and cancellation checks.
const PROGRESS_CHUNK: usize = 256;

/// Scan the dataset for reference rows and build the positioned table.
///
/// Fatal failures ([`ScanError::NoReferenceFound`]) leave no partial
/// result. Rows whose labels do not match the keyword stay sample rows.
pub fn scan_references(
    dataset: &Dataset,
    options: &ScanOptions,
) -> Result<ReferenceTable, ScanError> {
    scan_inner(dataset, options, |_, _| true)
}

fn scan_inner(
    dataset: &Dataset,
    options: &ScanOptions,
    mut on_progress: impl FnMut(usize, usize) -> bool,
) -> Result<ReferenceTable, ScanError> {
    let total = dataset.len();
    let mut tagged = Vec::new();
    let mut values = Vec::new();

    for (scanned, row) in dataset.rows().iter().enumerate() {
        if scanned % PROGRESS_CHUNK == 0 && !on_progress(scanned, total) {
            return Err(ScanError::Cancelled);
        }
        let Some(parsed) = parse_reference_label(&row.solution_label, &options.keyword) else {
            continue;
        };
        debug!(
            label = %row.solution_label,
            number = parsed.reference_number,
            kind = ?parsed.kind,
            "reference row"
        );
        tagged.push(TaggedReference {
            pivot_index: row.pivot_index,
            original_index: row.original_index,
            solution_label: row.solution_label.clone(),
            reference_number: parsed.reference_number,
            kind: parsed.kind,
        });
        let row_values = dataset
            .elements()
            .iter()
            .map(|element| (element.clone(), row.value(element)))
            .collect();
        values.push(row_values);
    }
    if !on_progress(total, total) {
        return Err(ScanError::Cancelled);
    }

    if tagged.is_empty() {
        return Err(ScanError::NoReferenceFound {
            keyword: options.keyword.clone(),
            observed: dataset.sample_labels(options.observed_label_sample),
        });
    }

    let positioned = position_references(&tagged);
    let points: Vec<ScannedReference> = positioned
        .into_iter()
        .zip(values)
        .map(|(point, row_values)| ScannedReference::new(point, row_values))
        .collect();
    let table = ReferenceTable::new(points);
    info!(
        points = table.len(),
        empty = table.empty().len(),
        "reference scan complete"
    );
    Ok(table)
}

/// Events delivered by the background scan worker.
#[derive(Debug)]
pub enum ScanEvent {
    Progress { rows_scanned: usize, total_rows: usize },
    Finished(Result<ReferenceTable, ScanError>),
}

/// Handle to the background scan thread.
///
/// The worker checks the cancellation flag between progress increments;
/// once cancelled it delivers [`ScanError::Cancelled`] and exits without a
/// partial result.
#[derive(Debug)]
pub struct ScanWorker {
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ScanWorker {
    /// Spawn the scan over an owned copy of the dataset. Events arrive on
    /// the returned receiver; `Finished` is always the last event.
    pub fn spawn(dataset: Dataset, options: ScanOptions) -> (Self, Receiver<ScanEvent>) {
        let (sender, receiver) = channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = std::thread::spawn(move || run_scan(&dataset, &options, &sender, &flag));
        (
            Self {
                cancel,
                handle: Some(handle),
            },
            receiver,
        )
    }

    /// Request cancellation. The worker exits at its next progress check.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Wait for the worker thread to exit.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_scan(
    dataset: &Dataset,
    options: &ScanOptions,
    sender: &Sender<ScanEvent>,
    cancel: &AtomicBool,
) {
    let result = scan_inner(dataset, options, |rows_scanned, total_rows| {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        let _ = sender.send(ScanEvent::Progress {
            rows_scanned,
            total_rows,
        });
        true
    });
    let _ = sender.send(ScanEvent::Finished(result));
}
