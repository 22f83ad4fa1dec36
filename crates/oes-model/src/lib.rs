pub mod error;
pub mod ids;
pub mod options;
pub mod records;
pub mod reference;

pub use error::{ModelError, Result, ScanError};
pub use ids::{CorrectionKey, ElementName};
pub use options::{
    CorrectionOptions, FilePartition, PreviewContext, ScanOptions, ToleranceBands,
};
pub use records::{
    BlankStatus, ChangeLog, CorrectionBasis, CorrectionRecord, ScalingAdvice, ScalingDirection,
    VerificationAnnotation,
};
pub use reference::{ReferenceKind, ReferencePoint};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_log_replaces_on_same_key() {
        let element = ElementName::new("Fe").expect("element name");
        let mut log = ChangeLog::new();
        log.upsert(CorrectionRecord {
            solution_label: "Sample 1".to_string(),
            element: element.clone(),
            basis: CorrectionBasis::Ratio(1.1),
            original_value: 50.0,
            new_value: 55.0,
        });
        log.upsert(CorrectionRecord {
            solution_label: "Sample 1".to_string(),
            element: element.clone(),
            basis: CorrectionBasis::Ratio(1.2),
            original_value: 50.0,
            new_value: 60.0,
        });
        assert_eq!(log.len(), 1);
        let key = CorrectionKey::new("Sample 1", element);
        let record = log.get(&key).expect("record");
        assert_eq!(record.new_value, 60.0);
    }

    #[test]
    fn element_name_rejects_blank() {
        assert!(ElementName::new("   ").is_err());
        assert_eq!(ElementName::new(" Cu ").expect("name").as_str(), "Cu");
    }

    #[test]
    fn annotation_serializes() {
        let annotation = VerificationAnnotation {
            solution_label: "CRM 10".to_string(),
            element: ElementName::new("Zn").expect("element name"),
            certified_value: 10.0,
            measured_value: 13.0,
            range_low: 8.0,
            range_high: 12.0,
            in_range_before_blank: false,
            in_range_after_blank: true,
            blank: 3.0,
            blank_status: BlankStatus::Applied,
            scaling: None,
        };
        let json = serde_json::to_string(&annotation).expect("serialize annotation");
        let round: VerificationAnnotation =
            serde_json::from_str(&json).expect("deserialize annotation");
        assert_eq!(round, annotation);
        assert!(round.display_line().contains("in range"));
    }

    #[test]
    fn blank_status_from_value() {
        assert_eq!(BlankStatus::from_blank(0.0), BlankStatus::NotApplied);
        assert_eq!(BlankStatus::from_blank(0.5), BlankStatus::Applied);
    }
}
