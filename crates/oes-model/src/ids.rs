#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Name of a measured chemical element column (e.g. "Fe", "Cu 327.395").
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementName(String);

impl ElementName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidElementName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite key of the change-log: one entry per corrected
/// (solution label, element) pair, replace-on-conflict.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CorrectionKey {
    pub solution_label: String,
    pub element: ElementName,
}

impl CorrectionKey {
    pub fn new(solution_label: impl Into<String>, element: ElementName) -> Self {
        Self {
            solution_label: solution_label.into(),
            element,
        }
    }
}

impl fmt::Display for CorrectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.solution_label, self.element)
    }
}
