//! Reference-label parsing.
//!
//! Labels like `RM-2`, `rm_3 check` or `RM cone` identify reference
//! material rows. Parsing is an explicit scan rather than a regex so the
//! edge cases (numbers before vs. after the type token, missing numbers)
//! stay individually testable: strip the keyword prefix, locate the type
//! token, then take the last integer seen before it.

use oes_model::ReferenceKind;

/// Outcome of parsing one label against the reference keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedReference {
    pub reference_number: i64,
    pub kind: ReferenceKind,
}

/// Parse a solution label. Returns None when the label does not start with
/// the keyword; such rows stay ordinary sample rows. Identical labels
/// always parse identically.
pub fn parse_reference_label(label: &str, keyword: &str) -> Option<ParsedReference> {
    let remainder = strip_keyword_prefix(label.trim(), keyword)?;
    let lower = remainder.to_ascii_lowercase();
    let (kind, token_start) = find_type_token(&lower);
    let search_region = match token_start {
        Some(start) => &lower[..start],
        None => lower.as_str(),
    };
    let reference_number = last_integer(search_region).unwrap_or(0);
    Some(ParsedReference {
        reference_number,
        kind,
    })
}

/// True when the label identifies any reference row for the keyword.
pub fn is_reference_label(label: &str, keyword: &str) -> bool {
    parse_reference_label(label, keyword).is_some()
}

/// Strip a case-insensitive `keyword` prefix plus an optional single `-`
/// or `_` separator. Returns the remainder, or None when the label does
/// not start with the keyword.
fn strip_keyword_prefix<'a>(label: &'a str, keyword: &str) -> Option<&'a str> {
    if keyword.is_empty() {
        return None;
    }
    // get() rather than split_at: byte keyword.len() may fall inside a
    // multibyte character, and such labels are ordinary sample rows.
    let head = label.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = &label[keyword.len()..];
    let rest = rest.strip_prefix(['-', '_']).unwrap_or(rest);
    Some(rest)
}

/// Locate the earliest type token in the lowercased remainder. `chek` and
/// `check` both mean Check (the misspelling appears in real exports);
/// absence of a token means Base.
fn find_type_token(lower: &str) -> (ReferenceKind, Option<usize>) {
    let mut best: Option<(usize, ReferenceKind)> = None;
    for (token, kind) in [
        ("check", ReferenceKind::Check),
        ("chek", ReferenceKind::Check),
        ("cone", ReferenceKind::Cone),
    ] {
        if let Some(position) = lower.find(token) {
            let better = match best {
                Some((existing, _)) => position < existing,
                None => true,
            };
            if better {
                best = Some((position, kind));
            }
        }
    }
    match best {
        Some((position, kind)) => (kind, Some(position)),
        None => (ReferenceKind::Base, None),
    }
}

/// Last run of ASCII digits in `text`, parsed as i64. Runs too long for
/// i64 are skipped rather than truncated.
fn last_integer(text: &str) -> Option<i64> {
    let mut result = None;
    let mut current = String::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            if let Ok(value) = current.parse::<i64>() {
                result = Some(value);
            }
            current.clear();
        }
    }
    if !current.is_empty()
        && let Ok(value) = current.parse::<i64>()
    {
        result = Some(value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keyword_is_base_zero() {
        let parsed = parse_reference_label("RM", "RM").expect("reference");
        assert_eq!(parsed.kind, ReferenceKind::Base);
        assert_eq!(parsed.reference_number, 0);
    }

    #[test]
    fn number_after_separator() {
        let parsed = parse_reference_label("RM-2", "RM").expect("reference");
        assert_eq!(parsed.kind, ReferenceKind::Base);
        assert_eq!(parsed.reference_number, 2);
    }

    #[test]
    fn check_token_with_number_before() {
        for label in ["RM 3 check", "rm_3 CHEK", "RM-3check"] {
            let parsed = parse_reference_label(label, "RM").expect("reference");
            assert_eq!(parsed.kind, ReferenceKind::Check, "label {label:?}");
            assert_eq!(parsed.reference_number, 3, "label {label:?}");
        }
    }

    #[test]
    fn number_after_type_token_is_ignored() {
        let parsed = parse_reference_label("RM check 7", "RM").expect("reference");
        assert_eq!(parsed.kind, ReferenceKind::Check);
        assert_eq!(parsed.reference_number, 0);
    }

    #[test]
    fn cone_marker() {
        let parsed = parse_reference_label("RM 2 cone", "RM").expect("reference");
        assert_eq!(parsed.kind, ReferenceKind::Cone);
        assert_eq!(parsed.reference_number, 2);
    }

    #[test]
    fn last_number_wins() {
        let parsed = parse_reference_label("RM 1 batch 12", "RM").expect("reference");
        assert_eq!(parsed.reference_number, 12);
    }

    #[test]
    fn non_matching_labels_are_samples() {
        assert!(parse_reference_label("Sample 4", "RM").is_none());
        assert!(parse_reference_label("CRM-1", "RM").is_none());
        assert!(parse_reference_label("", "RM").is_none());
    }

    #[test]
    fn multibyte_labels_are_samples() {
        // Byte 2 of "Sémple 1" falls inside 'é'; the label must be
        // rejected, not panic the scan.
        assert!(parse_reference_label("Sémple 1", "RM").is_none());
        assert!(parse_reference_label("é", "RM").is_none());
        assert!(parse_reference_label("RÉF-1", "RM").is_none());
    }

    #[test]
    fn multibyte_remainder_still_parses() {
        let parsed = parse_reference_label("RM-2 étalon", "RM").expect("reference");
        assert_eq!(parsed.kind, ReferenceKind::Base);
        assert_eq!(parsed.reference_number, 2);
    }
}
