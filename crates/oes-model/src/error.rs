use thiserror::Error;

/// Fatal failures of the reference scan.
///
/// Data-quality problems (non-numeric cells, zero original values, groups
/// with too few points) are never errors; they degrade locally to missing
/// values or no-op operations.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A required column is absent from the input table.
    #[error("required column missing: {0}")]
    MissingColumn(String),
    /// No row label matched the reference keyword. Carries a sample of the
    /// labels that were seen, to aid diagnosis.
    #[error("no reference rows matched keyword {keyword:?} (observed labels: {observed:?})")]
    NoReferenceFound {
        keyword: String,
        observed: Vec<String>,
    },
    /// The scan was cancelled before completion. No state was mutated.
    #[error("scan cancelled")]
    Cancelled,
}

/// Construction failures for validated model types.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid element name: {0:?}")]
    InvalidElementName(String),
    #[error("invalid file partition: start {start} > end {end}")]
    InvalidPartition { start: i64, end: i64 },
}

pub type Result<T> = std::result::Result<T, ScanError>;
