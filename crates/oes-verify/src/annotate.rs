//! Verification annotations: the analytical report payload.

use tracing::warn;

use oes_model::{
    BlankStatus, ElementName, PreviewContext, ScalingAdvice, ScalingDirection, ToleranceBands,
    VerificationAnnotation,
};

use crate::blank::CrmGroup;
use crate::tolerance::{acceptable_range, in_range};

/// Required-scaling warning threshold, in percent.
pub const EXCESSIVE_SCALING_PERCENT: f64 = 32.0;

/// Scaling needed to bring an out-of-range corrected value inside the
/// band. None when the value is already in range or is exactly zero.
pub fn scaling_advice(corrected: f64, range_low: f64, range_high: f64) -> Option<ScalingAdvice> {
    if corrected == 0.0 || (corrected > range_low && corrected < range_high) {
        return None;
    }
    let (factor, direction) = if corrected <= range_low {
        (range_low / corrected, ScalingDirection::Increase)
    } else {
        (range_high / corrected, ScalingDirection::Decrease)
    };
    let required_percent = (factor - 1.0).abs() * 100.0;
    Some(ScalingAdvice {
        factor,
        direction,
        required_percent,
        excessive: required_percent > EXCESSIVE_SCALING_PERCENT,
    })
}

/// Build one annotation per CRM reading not manually excluded from the
/// verification display.
pub fn build_annotations(
    element: &ElementName,
    groups: &[CrmGroup],
    context: &PreviewContext,
    bands: &ToleranceBands,
) -> Vec<VerificationAnnotation> {
    let blank = context.blank;
    let status = BlankStatus::from_blank(blank);
    let mut annotations = Vec::new();

    for group in groups {
        if context.excluded_outliers.contains(&group.solution_label) {
            continue;
        }
        let (range_low, range_high) = acceptable_range(group.certified_value, bands);
        let in_before = in_range(group.measured_value, group.certified_value, bands);
        let corrected = group.measured_value - blank;
        let in_after = in_range(corrected, group.certified_value, bands);
        let scaling = if in_after {
            None
        } else {
            scaling_advice(corrected, range_low, range_high)
        };
        if let Some(advice) = &scaling
            && advice.excessive
        {
            warn!(
                label = %group.solution_label,
                element = %element,
                required_percent = advice.required_percent,
                "excessive scaling required"
            );
        }
        annotations.push(VerificationAnnotation {
            solution_label: group.solution_label.clone(),
            element: element.clone(),
            certified_value: group.certified_value,
            measured_value: group.measured_value,
            range_low,
            range_high,
            in_range_before_blank: in_before,
            in_range_after_blank: in_after,
            blank,
            blank_status: status,
            scaling,
        });
    }
    annotations
}
