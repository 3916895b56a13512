//! Property-based tests for the Content Validator
//!
//! Tests invariants:
//! - Payloads carrying an HTML document marker are never accepted
//! - Payloads below the length floor are never accepted
//! - Long plain text is always accepted by the lenient validator
//! - Results are consistent for the same input

use proptest::prelude::*;

use crate::core::rulebook::validator::{LENIENT_MIN_LENGTH, STRICT_MIN_LENGTH};
use crate::core::rulebook::ContentValidator;

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

/// Plain rulebook-like text without angle brackets
fn arb_plain_text(min: usize, max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-zA-Z0-9 .,;:'()-]{1,60}",
            Just("\n".to_string()),
            Just("\r\n".to_string()),
        ],
        60..250,
    )
    .prop_map(|chunks| chunks.concat())
    .prop_filter("length in range", move |text| {
        let len = text.chars().count();
        len >= min && len < max
    })
}

fn arb_html_marker() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("<!DOCTYPE html>".to_string()),
        Just("<!doctype html>".to_string()),
        Just("<html>".to_string()),
        Just("<HTML lang=\"en\">".to_string()),
        Just("<Html>".to_string()),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: An HTML marker anywhere in the payload is rejected
    #[test]
    fn prop_never_accepts_html(
        body in "[a-z \n]{1000,3000}",
        marker in arb_html_marker(),
        position in 0usize..3000,
    ) {
        let split = position.min(body.len());
        let payload = format!("{}{}{}", &body[..split], marker, &body[split..]);

        prop_assert!(!ContentValidator::lenient().is_valid(Some(payload.as_str())));
        prop_assert!(!ContentValidator::strict().is_valid(Some(payload.as_str())));
    }

    /// Property: Anything shorter than the floor is rejected
    #[test]
    fn prop_never_accepts_short_text(text in "[a-zA-Z0-9 .\n]{0,999}") {
        prop_assert!(text.chars().count() < LENIENT_MIN_LENGTH);
        prop_assert!(!ContentValidator::lenient().is_valid(Some(text.as_str())));
    }

    /// Property: Long plain text passes the lenient floor but not the strict one
    #[test]
    fn prop_accepts_long_plain_text(text in arb_plain_text(LENIENT_MIN_LENGTH, 10_000)) {
        prop_assert!(ContentValidator::lenient().is_valid(Some(text.as_str())));
        prop_assert!(text.chars().count() < STRICT_MIN_LENGTH);
        prop_assert!(!ContentValidator::strict().is_valid(Some(text.as_str())));
    }

    /// Property: Validation is deterministic
    #[test]
    fn prop_consistent_results(text in "[a-z<>!A-Z \n]{0,1500}") {
        let validator = ContentValidator::default();
        prop_assert_eq!(validator.is_valid(Some(text.as_str())), validator.is_valid(Some(text.as_str())));
        prop_assert_eq!(validator.is_valid(Some(text.as_str())), validator.validate(&text).is_ok());
    }
}
