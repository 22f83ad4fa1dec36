//! Applicator behavior over a small acquisition run.

use std::collections::BTreeMap;

use oes_core::{CorrectionSession, Dataset, DriftEngine, Row, scan_references};
use oes_model::{CorrectionOptions, ElementName, ScanOptions};

const TOLERANCE: f64 = 1e-9;

fn element() -> ElementName {
    ElementName::new("Fe").expect("element name")
}

fn row(index: i64, label: &str, value: Option<f64>) -> Row {
    let mut values = BTreeMap::new();
    values.insert(element(), value);
    Row::new(index, 0, label, values)
}

/// Three RM-1 points at pivots 0, 5, 10 (measured 100 each) with sample
/// rows of value 50 at pivots 2, 3, 7, 8. Filler rows carry no value.
fn scenario_dataset() -> Dataset {
    let rows = vec![
        row(0, "RM-1", Some(100.0)),
        row(1, "Filler A", None),
        row(2, "Sample 2", Some(50.0)),
        row(3, "Sample 3", Some(50.0)),
        row(4, "Filler B", None),
        row(5, "RM-1", Some(100.0)),
        row(6, "Filler C", None),
        row(7, "Sample 7", Some(50.0)),
        row(8, "Sample 8", Some(50.0)),
        row(9, "Filler D", None),
        row(10, "RM-1", Some(100.0)),
    ];
    Dataset::from_rows(rows, vec![element()])
}

fn scenario_session(edited_middle: f64) -> CorrectionSession {
    let dataset = scenario_dataset();
    let references = scan_references(&dataset, &ScanOptions::default()).expect("scan");
    let mut session = CorrectionSession::new(dataset, references);
    let partitions = session.dataset.partitions().to_vec();
    let mut engine = DriftEngine::new(&mut session.references, element(), 1, &partitions);
    engine.set_current(1, edited_middle);
    session
}

#[test]
fn uniform_apply_multiplies_by_interval_end_ratio() {
    let mut session = scenario_session(110.0);
    let outcome = session.apply_group(&element(), 1, &CorrectionOptions::default());
    assert!(outcome.applied);
    assert_eq!(outcome.corrected_rows, 4);

    // First interval ends at the edited point: ratio 110/100.
    assert!((session.dataset.value(2, &element()).unwrap() - 55.0).abs() < TOLERANCE);
    assert!((session.dataset.value(3, &element()).unwrap() - 55.0).abs() < TOLERANCE);
    // Second interval ends at an unedited point: ratio 1.0.
    assert!((session.dataset.value(7, &element()).unwrap() - 50.0).abs() < TOLERANCE);
    assert!((session.dataset.value(8, &element()).unwrap() - 50.0).abs() < TOLERANCE);
    // The edited reference row is written back at its current value.
    assert!((session.dataset.value(5, &element()).unwrap() - 110.0).abs() < TOLERANCE);
}

#[test]
fn stepwise_apply_interpolates_across_the_interval() {
    let mut session = scenario_session(110.0);
    let options = CorrectionOptions {
        stepwise: true,
        ..CorrectionOptions::default()
    };
    let outcome = session.apply_group(&element(), 1, &options);
    assert!(outcome.applied);

    // Two rows between ratios 1.0 and 1.1: row 1 gets 1.05, row 2 gets 1.1.
    assert!((session.dataset.value(2, &element()).unwrap() - 52.5).abs() < TOLERANCE);
    assert!((session.dataset.value(3, &element()).unwrap() - 55.0).abs() < TOLERANCE);
    // Back down between 1.1 and 1.0.
    assert!((session.dataset.value(7, &element()).unwrap() - 52.5).abs() < TOLERANCE);
    assert!((session.dataset.value(8, &element()).unwrap() - 50.0).abs() < TOLERANCE);
}

#[test]
fn ratio_one_is_idempotent() {
    let mut session = scenario_session(100.0);
    let before = session.dataset.clone();
    let outcome = session.apply_group(&element(), 1, &CorrectionOptions::default());
    assert!(outcome.applied);
    for pivot in [2usize, 3, 7, 8] {
        let original = before.value(pivot, &element()).unwrap();
        let corrected = session.dataset.value(pivot, &element()).unwrap();
        assert!(
            (original - corrected).abs() < TOLERANCE,
            "pivot {pivot}: {original} vs {corrected}"
        );
    }
}

#[test]
fn change_log_replaces_entries_on_reapply() {
    let mut session = scenario_session(110.0);
    session.apply_group(&element(), 1, &CorrectionOptions::default());
    assert_eq!(session.change_log.len(), 4);
    session.apply_group(&element(), 1, &CorrectionOptions::default());
    // Same keys, replaced entries.
    assert_eq!(session.change_log.len(), 4);
}

#[test]
fn manual_override_takes_precedence() {
    let mut session = scenario_session(110.0);
    session.manual.set(2, element(), 42.0);
    session.apply_group(&element(), 1, &CorrectionOptions::default());
    assert!((session.dataset.value(2, &element()).unwrap() - 42.0).abs() < TOLERANCE);
    // Non-overridden neighbor still gets the computed ratio.
    assert!((session.dataset.value(3, &element()).unwrap() - 55.0).abs() < TOLERANCE);
}

#[test]
fn single_point_group_is_nothing_to_apply() {
    let rows = vec![
        row(0, "RM-1", Some(100.0)),
        row(1, "Sample 1", Some(50.0)),
    ];
    let dataset = Dataset::from_rows(rows, vec![element()]);
    let references = scan_references(&dataset, &ScanOptions::default()).expect("scan");
    let mut session = CorrectionSession::new(dataset, references);
    let before = session.dataset.clone();
    let outcome = session.apply_group(&element(), 1, &CorrectionOptions::default());
    assert!(!outcome.applied);
    assert_eq!(outcome.corrected_rows, 0);
    assert_eq!(session.dataset, before);
    assert_eq!(session.undo_depth(), 0);
}

#[test]
fn ignored_reference_point_is_skipped_as_interval_end() {
    let mut session = scenario_session(110.0);
    // Ignoring the middle point leaves one interval spanning 0..10.
    session.references.ignore(5);
    let outcome = session.apply_group(&element(), 1, &CorrectionOptions::default());
    assert!(outcome.applied);
    // End ratio is 100/100 = 1.0 for the whole span.
    for pivot in [2usize, 3, 7, 8] {
        assert!((session.dataset.value(pivot, &element()).unwrap() - 50.0).abs() < TOLERANCE);
    }
}
