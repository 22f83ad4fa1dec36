//! Verification engine behavior.

use std::collections::BTreeMap;

use oes_core::{CorrectionSession, Dataset, Row, scan_references};
use oes_model::{
    BlankStatus, ElementName, PreviewContext, ScalingDirection, ScanOptions, ToleranceBands,
};
use oes_verify::{
    BlankCandidate, CrmGroup, apply_blank_scale, build_annotations, dynamic_half_width,
    preview_value, scaling_advice, select_blank,
};

fn element() -> ElementName {
    ElementName::new("Pb").expect("element name")
}

#[test]
fn tolerance_banding_reference_values() {
    let bands = ToleranceBands::default();
    assert_eq!(dynamic_half_width(50.0, &bands), 50.0 * 20.0 / 100.0);
    assert_eq!(dynamic_half_width(5.0, &bands), 2.0);
    assert_eq!(dynamic_half_width(150_000.0, &bands), 150_000.0 * 3.0 / 100.0);
}

#[test]
fn blank_bringing_group_in_range_wins() {
    // Certified 10 with tolerance +-2, measured 13. Blank 1 corrects to 12,
    // which sits on the band edge and is out of range; blank 3 corrects to
    // 10 and must be selected.
    let groups = vec![CrmGroup {
        solution_label: "CRM A".to_string(),
        certified_value: 10.0,
        measured_value: 13.0,
    }];
    let candidates = vec![
        BlankCandidate {
            solution_label: "Blank 1".to_string(),
            value: 1.0,
        },
        BlankCandidate {
            solution_label: "Blank 2".to_string(),
            value: 3.0,
        },
    ];
    let bands = ToleranceBands::default();
    let selection = select_blank(&groups, &candidates, &bands).expect("selection");
    assert_eq!(selection.candidate.value, 3.0);
    assert!(selection.in_band);
    assert_eq!(selection.status, BlankStatus::Applied);
}

#[test]
fn out_of_band_first_candidate_is_passed_over() {
    // Tighter 10% band [9, 11]: blank 1 corrects to 12 (out), blank 3 to
    // 10 (in).
    let groups = vec![CrmGroup {
        solution_label: "CRM A".to_string(),
        certified_value: 10.0,
        measured_value: 13.0,
    }];
    let candidates = vec![
        BlankCandidate {
            solution_label: "Blank 1".to_string(),
            value: 1.0,
        },
        BlankCandidate {
            solution_label: "Blank 2".to_string(),
            value: 3.0,
        },
    ];
    let bands = ToleranceBands {
        range_mid: 10.0,
        ..ToleranceBands::default()
    };
    let selection = select_blank(&groups, &candidates, &bands).expect("selection");
    assert_eq!(selection.candidate.value, 3.0);
    assert!(selection.in_band);
}

#[test]
fn nearest_fit_fallback_when_nothing_lands_in_band() {
    let groups = vec![CrmGroup {
        solution_label: "CRM A".to_string(),
        certified_value: 10.0,
        measured_value: 30.0,
    }];
    let candidates = vec![
        BlankCandidate {
            solution_label: "Blank 1".to_string(),
            value: 0.0,
        },
        BlankCandidate {
            solution_label: "Blank 2".to_string(),
            value: 5.0,
        },
    ];
    let bands = ToleranceBands::default();
    let selection = select_blank(&groups, &candidates, &bands).expect("selection");
    assert_eq!(selection.candidate.value, 5.0);
    assert!(!selection.in_band);
    assert_eq!(selection.status, BlankStatus::Applied);
}

#[test]
fn zero_blank_is_not_applied() {
    let groups = vec![CrmGroup {
        solution_label: "CRM A".to_string(),
        certified_value: 10.0,
        measured_value: 10.5,
    }];
    let candidates = vec![BlankCandidate {
        solution_label: "Blank 1".to_string(),
        value: 0.0,
    }];
    let selection =
        select_blank(&groups, &candidates, &ToleranceBands::default()).expect("selection");
    assert_eq!(selection.status, BlankStatus::NotApplied);
}

#[test]
fn preview_gates_exclusions_range_and_threshold() {
    let mut context = PreviewContext::new().with_blank(2.0).with_scale(1.5);
    context.exclude_set.insert("Skip me".to_string());

    assert_eq!(preview_value(10.0, "Sample", &context), Some(12.0));
    assert_eq!(preview_value(10.0, "Skip me", &context), None);

    let ranged = context.clone().with_scale_range(5.0, 20.0);
    assert_eq!(preview_value(30.0, "Sample", &ranged), None);
    assert_eq!(preview_value(10.0, "Sample", &ranged), Some(12.0));

    let mut gated = context.clone();
    gated.only_above_50 = true;
    assert_eq!(preview_value(10.0, "Sample", &gated), None);
    assert_eq!(preview_value(60.0, "Sample", &gated), Some(87.0));
}

#[test]
fn scaling_advice_directions_and_threshold() {
    // Corrected below the band: increase.
    let advice = scaling_advice(8.0, 9.0, 11.0).expect("advice");
    assert_eq!(advice.direction, ScalingDirection::Increase);
    assert!((advice.factor - 9.0 / 8.0).abs() < 1e-12);
    assert!((advice.required_percent - 12.5).abs() < 1e-9);
    assert!(!advice.excessive);

    // Corrected far above the band: decrease, excessive.
    let advice = scaling_advice(20.0, 9.0, 11.0).expect("advice");
    assert_eq!(advice.direction, ScalingDirection::Decrease);
    assert!(advice.excessive);

    // In range or zero: no advice.
    assert!(scaling_advice(10.0, 9.0, 11.0).is_none());
    assert!(scaling_advice(0.0, 9.0, 11.0).is_none());
}

#[test]
fn annotations_skip_excluded_outliers_and_carry_status() {
    let groups = vec![
        CrmGroup {
            solution_label: "CRM A".to_string(),
            certified_value: 10.0,
            measured_value: 13.0,
        },
        CrmGroup {
            solution_label: "CRM B".to_string(),
            certified_value: 10.0,
            measured_value: 10.2,
        },
    ];
    let mut context = PreviewContext::new().with_blank(3.0);
    context.excluded_outliers.insert("CRM B".to_string());
    let annotations =
        build_annotations(&element(), &groups, &context, &ToleranceBands::default());
    assert_eq!(annotations.len(), 1);
    let annotation = &annotations[0];
    assert_eq!(annotation.solution_label, "CRM A");
    // Band is [8, 12]: 13 is out before blank, 10 is in after.
    assert!(!annotation.in_range_before_blank);
    assert!(annotation.in_range_after_blank);
    assert_eq!(annotation.blank_status, BlankStatus::Applied);
    assert!(annotation.scaling.is_none());
    assert!(annotation.display_line().contains("in range"));
}

#[test]
fn blank_scale_batch_commits_and_undoes() {
    let mut values = BTreeMap::new();
    values.insert(element(), Some(100.0));
    let rows = vec![
        Row::new(0, 0, "RM-1", values.clone()),
        Row::new(1, 0, "Sample 1", values.clone()),
        Row::new(2, 0, "Sample 2", values.clone()),
        Row::new(3, 0, "RM-1", values.clone()),
    ];
    let dataset = Dataset::from_rows(rows, vec![element()]);
    let references = scan_references(&dataset, &ScanOptions::default()).expect("scan");
    let mut session = CorrectionSession::new(dataset, references);
    let before = session.dataset.clone();

    let context = PreviewContext::new().with_blank(10.0).with_scale(2.0);
    let corrected = apply_blank_scale(&mut session, &context, &element(), None);
    assert_eq!(corrected, 2);
    // (100 - 10) * 2, reference rows untouched.
    assert_eq!(session.dataset.value(1, &element()), Some(180.0));
    assert_eq!(session.dataset.value(0, &element()), Some(100.0));
    assert_eq!(session.change_log.len(), 2);

    assert!(session.undo());
    assert_eq!(session.dataset, before);
    assert!(session.change_log.is_empty());
}
