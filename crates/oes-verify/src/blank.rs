//! Blank selection heuristics.
//!
//! A blank is a zero-analyte control whose measured value is subtracted
//! from CRM readings before checking them against the certificate band.
//! Candidates are tried in label order; the first one that brings a CRM
//! group into band wins, with a nearest-fit fallback when none does.

use tracing::debug;

use oes_model::{BlankStatus, ToleranceBands};

use crate::tolerance::in_range;

/// One CRM reading group for an element.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmGroup {
    pub solution_label: String,
    pub certified_value: f64,
    pub measured_value: f64,
}

/// One blank row candidate for an element.
#[derive(Debug, Clone, PartialEq)]
pub struct BlankCandidate {
    pub solution_label: String,
    pub value: f64,
}

/// The chosen blank and how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct BlankSelection {
    pub candidate: BlankCandidate,
    pub status: BlankStatus,
    /// False when the candidate came from the nearest-fit fallback rather
    /// than an in-band match.
    pub in_band: bool,
}

/// Select the best blank for an element.
///
/// Candidates are considered in label order. A candidate qualifies when
/// subtracting it puts at least one included CRM group inside its
/// certified band; the first qualifying candidate wins. When none
/// qualifies, the candidate minimizing the summed `|corrected - certified|`
/// distance across groups is chosen instead.
pub fn select_blank(
    groups: &[CrmGroup],
    candidates: &[BlankCandidate],
    bands: &ToleranceBands,
) -> Option<BlankSelection> {
    if groups.is_empty() || candidates.is_empty() {
        return None;
    }
    let mut ordered: Vec<&BlankCandidate> = candidates.iter().collect();
    ordered.sort_by(|a, b| a.solution_label.cmp(&b.solution_label));

    for candidate in &ordered {
        let hits = groups
            .iter()
            .filter(|group| {
                in_range(
                    group.measured_value - candidate.value,
                    group.certified_value,
                    bands,
                )
            })
            .count();
        if hits > 0 {
            debug!(
                blank = %candidate.solution_label,
                value = candidate.value,
                hits,
                "blank selected in band"
            );
            return Some(BlankSelection {
                candidate: (*candidate).clone(),
                status: BlankStatus::from_blank(candidate.value),
                in_band: true,
            });
        }
    }

    // Nearest fit: no candidate lands any group in band.
    let best = ordered.into_iter().min_by(|a, b| {
        let distance_a = summed_distance(groups, a.value);
        let distance_b = summed_distance(groups, b.value);
        distance_a
            .partial_cmp(&distance_b)
            .unwrap_or(std::cmp::Ordering::Equal)
    })?;
    debug!(
        blank = %best.solution_label,
        value = best.value,
        "blank selected by nearest fit"
    );
    Some(BlankSelection {
        candidate: best.clone(),
        status: BlankStatus::from_blank(best.value),
        in_band: false,
    })
}

fn summed_distance(groups: &[CrmGroup], blank: f64) -> f64 {
    groups
        .iter()
        .map(|group| ((group.measured_value - blank) - group.certified_value).abs())
        .sum()
}
