//! Property-based tests for the Rule Parser
//!
//! Tests invariants:
//! - Every emitted id is unique and every name non-empty
//! - Parsing the re-serialized output yields the same entries
//! - Entries written back as source text round-trip exactly
//! - Wrapped continuation lines extend the previous paragraph
//! - Lines after a later top-level section never reach an entry

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use crate::core::rulebook::{parse_rules, Category, EntryFilter, RuleEntry, RuleParser};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::KeywordActions), Just(Category::KeywordAbilities)]
}

/// Keyword-ish names: capitalized words, never blank
fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}( [a-z]{2,8}){0,2}"
}

/// One trimmed paragraph that cannot be mistaken for a numbered line
fn arb_paragraph() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z ,']{0,60}[a-z.]"
}

/// Well-formed entries keyed by (category, number) so ids are unique.
/// Numbers start at 2 so the bootstrap filter keeps everything.
fn arb_entries() -> impl Strategy<Value = Vec<RuleEntry>> {
    prop::collection::btree_map(
        (arb_category(), 2u16..400),
        (arb_name(), prop::collection::vec(arb_paragraph(), 0..5)),
        1..12,
    )
    .prop_map(|map: BTreeMap<(Category, u16), (String, Vec<String>)>| {
        map.into_iter()
            .map(|((category, number), (name, paragraphs))| {
                RuleEntry::new(format!("{}.{}", category.code(), number), category, name)
                    .with_text(paragraphs)
            })
            .collect()
    })
}

/// Arbitrary mixture of headers, sub-rules, prose and foreign numbered lines
fn arb_line_soup() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        "70[12]\\.[0-9]{1,3}\\.? [A-Za-z ]{1,20}",
        "70[12]\\.[0-9]{1,3}[a-z]{1,2} [A-Za-z ,.()]{0,40}",
        "70[12]\\.[0-9]{1,3}[a-z]\\([A-Za-z ]{0,10}\\)",
        "[A-Za-z ,.()]{1,40}",
        "[1-6][0-9][0-9]\\.[0-9]{1,2} [a-z ]{1,20}",
        Just(String::new()),
    ];
    prop::collection::vec(line, 0..60).prop_map(|lines| lines.join("\n"))
}

fn source_text(entries: &[RuleEntry]) -> String {
    entries.iter().map(RuleEntry::to_source_text).collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: Ids are unique and no entry has a blank id or name
    #[test]
    fn prop_unique_ids_and_names(soup in arb_line_soup()) {
        let entries = parse_rules(&soup);
        let mut seen = HashSet::new();

        for entry in &entries {
            prop_assert!(!entry.id.is_empty());
            prop_assert!(!entry.name.trim().is_empty());
            prop_assert!(seen.insert(entry.id.clone()), "duplicate id {}", entry.id);
            prop_assert!(entry.full_text.iter().all(|p| !p.is_empty()));
        }
    }

    /// Property: Parsing is stable under re-serialization of its own output
    #[test]
    fn prop_reparse_is_stable(soup in arb_line_soup()) {
        let first = parse_rules(&soup);
        let second = parse_rules(&source_text(&first));
        prop_assert_eq!(first, second);
    }

    /// Property: Well-formed entries written as source text parse back exactly
    #[test]
    fn prop_source_text_round_trips(entries in arb_entries()) {
        let text = source_text(&entries);
        let parsed = RuleParser::with_filter(EntryFilter::BootstrapId).parse(&text);
        prop_assert_eq!(parsed, entries);
    }

    /// Property: Splitting a paragraph over two lines keeps one paragraph
    #[test]
    fn prop_wrapped_lines_join(
        first in "[A-Z][a-z ]{0,30}[a-z]",
        second in "[a-z][a-z ]{0,30}[a-z.]",
    ) {
        let text = format!("702.9. Flying\n702.9a {first}\n{second}\n");
        let entries = parse_rules(&text);

        prop_assert_eq!(entries.len(), 1);
        prop_assert_eq!(&entries[0].full_text, &vec![format!("{first} {second}")]);
    }

    /// Property: Nothing after a later section boundary reaches any entry
    #[test]
    fn prop_stops_after_last_section(
        soup in arb_line_soup(),
        section in 703u16..999,
    ) {
        let text = format!(
            "702.2. Deathtouch\n{soup}\n{section}.1. Appendix marker\nAppendix trailing prose\n702.999. Late keyword\n"
        );
        let entries = parse_rules(&text);

        prop_assert!(entries.iter().all(|e| e.id != "702.999"));
        prop_assert!(entries
            .iter()
            .flat_map(|e| e.full_text.iter())
            .all(|p| !p.contains("Appendix")));
    }
}
