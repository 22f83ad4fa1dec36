//! Blank/scale correction previews and their committed batches.

use tracing::info;

use oes_model::{
    CorrectionBasis, CorrectionRecord, ElementName, FilePartition, PreviewContext,
};

use oes_core::CorrectionSession;

/// Corrected value for a sample under the preview context, or None when
/// the row is excluded from automatic correction.
///
/// A value is corrected as `(value - blank) * scale` only when the label
/// is not excluded, the value sits inside the configured scale range (if
/// any), and the "only above 50" gate (if set) passes.
pub fn preview_value(value: f64, solution_label: &str, context: &PreviewContext) -> Option<f64> {
    if context.exclude_set.contains(solution_label) {
        return None;
    }
    if let Some((min, max)) = context.scale_range
        && !(min..=max).contains(&value)
    {
        return None;
    }
    if context.only_above_50 && value <= 50.0 {
        return None;
    }
    Some((value - context.blank) * context.scale)
}

/// Commit a blank/scale correction batch over the sample rows of one
/// partition (or the whole run), recording each corrected cell.
///
/// Reference rows are never touched. The batch is one undoable commit:
/// a snapshot is pushed before any mutation. Returns the number of
/// corrected rows.
pub fn apply_blank_scale(
    session: &mut CorrectionSession,
    context: &PreviewContext,
    element: &ElementName,
    partition: Option<&FilePartition>,
) -> usize {
    session.push_snapshot();
    let reference_rows = session.references.original_indices();

    let selected: Vec<(usize, String, f64)> = session
        .dataset
        .rows()
        .iter()
        .filter(|row| {
            !reference_rows.contains(&row.original_index)
                && partition.is_none_or(|p| p.contains(row.original_index))
        })
        .filter_map(|row| {
            row.value(element)
                .map(|value| (row.pivot_index, row.solution_label.clone(), value))
        })
        .collect();

    let mut corrected_rows = 0usize;
    for (pivot, label, value) in selected {
        let Some(corrected) = preview_value(value, &label, context) else {
            continue;
        };
        session.dataset.set_value(pivot, element, corrected);
        session.change_log.upsert(CorrectionRecord {
            solution_label: label,
            element: element.clone(),
            basis: CorrectionBasis::ScaleBlank {
                scale: context.scale,
                blank: context.blank,
            },
            original_value: value,
            new_value: corrected,
        });
        corrected_rows += 1;
    }

    if corrected_rows == 0 {
        // Nothing was touched; drop the snapshot so undo depth reflects
        // actual commits.
        session.undo();
    } else {
        info!(
            element = %element,
            corrected_rows,
            blank = context.blank,
            scale = context.scale,
            "blank/scale batch applied"
        );
    }
    corrected_rows
}
