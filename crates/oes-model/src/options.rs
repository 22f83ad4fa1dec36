//! Configuration options for scanning, correction and verification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Options for the reference-point scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Keyword identifying reference rows by label prefix.
    pub keyword: String,
    /// How many non-matching labels to report when no reference is found.
    pub observed_label_sample: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            keyword: "RM".to_string(),
            observed_label_sample: 10,
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }
}

/// Options controlling how drift corrections are optimized and applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectionOptions {
    /// Interpolate the ratio linearly across each interval instead of
    /// applying it as a step function.
    pub stepwise: bool,
    /// Optimize over the whole run instead of per segment.
    pub global_optimize: bool,
    /// Scope optimization to each source-file partition.
    pub per_file_reference: bool,
}

/// Certificate tolerance parameters for the dynamic acceptable range.
///
/// The half-width of the acceptable band depends on the magnitude of the
/// certified value: an absolute floor below 10, percentage bands above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBands {
    /// Absolute half-width for |v| < 10.
    pub range_low: f64,
    /// Percent half-width for 10 <= |v| < 100.
    pub range_mid: f64,
    /// Percent half-width for 100 <= |v| < 1000.
    pub range_high1: f64,
    /// Percent half-width for 1000 <= |v| < 10000.
    pub range_high2: f64,
    /// Percent half-width for 10000 <= |v| < 100000.
    pub range_high3: f64,
    /// Percent half-width for |v| >= 100000.
    pub range_high4: f64,
}

impl Default for ToleranceBands {
    fn default() -> Self {
        Self {
            range_low: 2.0,
            range_mid: 20.0,
            range_high1: 10.0,
            range_high2: 8.0,
            range_high3: 5.0,
            range_high4: 3.0,
        }
    }
}

/// A contiguous slice of the concatenated dataset that came from one
/// source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePartition {
    pub name: String,
    /// First original index of the partition, inclusive.
    pub start: i64,
    /// Last original index of the partition, inclusive.
    pub end: i64,
}

impl FilePartition {
    pub fn new(name: impl Into<String>, start: i64, end: i64) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidPartition { start, end });
        }
        Ok(Self {
            name: name.into(),
            start,
            end,
        })
    }

    pub fn contains(&self, original_index: i64) -> bool {
        (self.start..=self.end).contains(&original_index)
    }
}

/// Per-partition preview/correction parameters for CRM verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewContext {
    /// Blank value subtracted before scaling.
    pub blank: f64,
    /// Multiplicative scale applied after blank subtraction.
    pub scale: f64,
    /// When set, only values inside this range are scaled.
    pub scale_range: Option<(f64, f64)>,
    /// Only correct values above 50.
    pub only_above_50: bool,
    /// Labels excluded from automatic correction.
    pub exclude_set: BTreeSet<String>,
    /// Labels excluded from aggregated/plotted verification only.
    pub excluded_outliers: BTreeSet<String>,
}

impl Default for PreviewContext {
    fn default() -> Self {
        Self {
            blank: 0.0,
            scale: 1.0,
            scale_range: None,
            only_above_50: false,
            exclude_set: BTreeSet::new(),
            excluded_outliers: BTreeSet::new(),
        }
    }
}

impl PreviewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blank(mut self, blank: f64) -> Self {
        self.blank = blank;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_scale_range(mut self, min: f64, max: f64) -> Self {
        self.scale_range = Some((min, max));
        self
    }

    /// True when blank subtraction is in effect.
    pub fn blank_applied(&self) -> bool {
        self.blank != 0.0
    }
}
