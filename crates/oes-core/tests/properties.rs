//! Property tests for label parsing and segmentation.

use oes_core::{TaggedReference, parse_reference_label, position_references};
use oes_model::ReferenceKind;
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = ReferenceKind> {
    prop_oneof![
        Just(ReferenceKind::Base),
        Just(ReferenceKind::Check),
        Just(ReferenceKind::Cone),
    ]
}

proptest! {
    /// Identical labels always parse identically.
    #[test]
    fn parsing_is_deterministic(label in "\\PC{0,24}") {
        let first = parse_reference_label(&label, "RM");
        let second = parse_reference_label(&label, "RM");
        prop_assert_eq!(first, second);
    }

    /// Constructed labels round-trip number and kind.
    #[test]
    fn constructed_labels_round_trip(
        number in 0i64..10_000,
        separator in prop_oneof![Just(""), Just("-"), Just("_")],
        suffix in prop_oneof![Just(""), Just(" check"), Just(" chek"), Just(" cone")],
    ) {
        let label = format!("RM{separator}{number}{suffix}");
        let parsed = parse_reference_label(&label, "RM").expect("constructed reference");
        prop_assert_eq!(parsed.reference_number, number);
        let expected = match suffix.trim() {
            "check" | "chek" => ReferenceKind::Check,
            "cone" => ReferenceKind::Cone,
            _ => ReferenceKind::Base,
        };
        prop_assert_eq!(parsed.kind, expected);
    }

    /// Every reference row lands in exactly one segment, segment ids never
    /// decrease, and every Cone row starts a new segment.
    #[test]
    fn segmentation_invariants(kinds in prop::collection::vec(kind_strategy(), 0..40)) {
        let tagged: Vec<TaggedReference> = kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| TaggedReference {
                pivot_index: index,
                original_index: index as i64,
                solution_label: "RM-1".to_string(),
                reference_number: 1,
                kind: *kind,
            })
            .collect();
        let positioned = position_references(&tagged);
        prop_assert_eq!(positioned.len(), tagged.len());

        let mut previous_segment = 0u32;
        for (index, point) in positioned.iter().enumerate() {
            prop_assert!(point.segment_id >= previous_segment);
            if point.kind == ReferenceKind::Cone {
                prop_assert_eq!(point.segment_id, previous_segment + 1);
            }
            if index == 0 {
                prop_assert_eq!(point.span_min, -1);
            } else {
                prop_assert_eq!(point.span_min, positioned[index - 1].original_index);
            }
            prop_assert_eq!(point.span_max, point.original_index);
            previous_segment = point.segment_id;
        }
    }
}
