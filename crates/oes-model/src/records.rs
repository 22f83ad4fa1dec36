//! Change-log and verification report records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{CorrectionKey, ElementName};

/// How a corrected value was derived from the original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionBasis {
    /// Multiplicative drift ratio.
    Ratio(f64),
    /// Blank subtraction followed by scaling.
    ScaleBlank { scale: f64, blank: f64 },
}

/// One corrected cell: the record appended to the change-log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub solution_label: String,
    pub element: ElementName,
    pub basis: CorrectionBasis,
    pub original_value: f64,
    pub new_value: f64,
}

impl CorrectionRecord {
    pub fn key(&self) -> CorrectionKey {
        CorrectionKey::new(self.solution_label.clone(), self.element.clone())
    }
}

/// Accumulated correction records, one per (solution label, element) pair.
///
/// Re-applying a correction replaces the prior entry for the same key; the
/// log therefore reflects the latest applied state, not a history.
/// Serializes as the ordered record sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLog {
    entries: BTreeMap<CorrectionKey, CorrectionRecord>,
}

impl Serialize for ChangeLog {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de> Deserialize<'de> for ChangeLog {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<CorrectionRecord>::deserialize(deserializer)?;
        let mut log = Self::new();
        for record in records {
            log.upsert(record);
        }
        Ok(log)
    }
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any prior record for the same key.
    pub fn upsert(&mut self, record: CorrectionRecord) {
        self.entries.insert(record.key(), record);
    }

    pub fn get(&self, key: &CorrectionKey) -> Option<&CorrectionRecord> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorrectionRecord> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether blank subtraction was in effect for a verification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlankStatus {
    Applied,
    NotApplied,
}

impl BlankStatus {
    pub fn from_blank(blank: f64) -> Self {
        if blank == 0.0 {
            Self::NotApplied
        } else {
            Self::Applied
        }
    }
}

/// Direction a sample value must move to land inside the certified band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingDirection {
    Increase,
    Decrease,
}

/// Recommended scaling for an out-of-range CRM reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingAdvice {
    pub factor: f64,
    pub direction: ScalingDirection,
    /// `|factor - 1| * 100`.
    pub required_percent: f64,
    /// Set when the required scaling exceeds the warning threshold (32%).
    pub excessive: bool,
}

/// One verification annotation: the analytical report payload for a single
/// CRM reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationAnnotation {
    pub solution_label: String,
    pub element: ElementName,
    pub certified_value: f64,
    pub measured_value: f64,
    /// Acceptable range derived from the tolerance bands.
    pub range_low: f64,
    pub range_high: f64,
    pub in_range_before_blank: bool,
    pub in_range_after_blank: bool,
    pub blank: f64,
    pub blank_status: BlankStatus,
    pub scaling: Option<ScalingAdvice>,
}

impl VerificationAnnotation {
    /// Render the annotation as a single report line.
    pub fn display_line(&self) -> String {
        let status = if self.in_range_after_blank {
            "in range"
        } else {
            "OUT OF RANGE"
        };
        let mut line = format!(
            "{} [{}]: measured {:.4}, certified {:.4}, acceptable [{:.4}, {:.4}], {}",
            self.solution_label,
            self.element,
            self.measured_value,
            self.certified_value,
            self.range_low,
            self.range_high,
            status,
        );
        if self.blank_status == BlankStatus::Applied {
            line.push_str(&format!(", blank {:.4} applied", self.blank));
        }
        if let Some(advice) = &self.scaling {
            let direction = match advice.direction {
                ScalingDirection::Increase => "increase",
                ScalingDirection::Decrease => "decrease",
            };
            line.push_str(&format!(
                ", requires {direction} by {:.2}%",
                advice.required_percent
            ));
            if advice.excessive {
                line.push_str(" (EXCESSIVE)");
            }
        }
        line
    }
}
