//! Parser Scenario Tests
//!
//! Line classification on small hand-written documents.

use rstest::rstest;

use crate::core::rulebook::{parse_rules, Category, EntryFilter, RuleEntry, RuleParser};
use crate::tests::common::*;

fn ids(entries: &[RuleEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.id.as_str()).collect()
}

// =============================================================================
// Headers
// =============================================================================

#[rstest]
#[case("702.19. Trample", "702.19", "Trample")]
#[case("702.19 Trample", "702.19", "Trample")]
#[case("701.34. Proliferate", "701.34", "Proliferate")]
#[case("702.2.   Deathtouch  ", "702.2", "Deathtouch")]
#[case("702.111. Partner with", "702.111", "Partner with")]
fn test_header_forms(#[case] header: &str, #[case] id: &str, #[case] name: &str) {
    let text = format!("{header}\n{id}a Body text.\n");
    let entries = parse_rules(&text);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, id);
    assert_eq!(entries[0].name, name);
    assert_eq!(entries[0].full_text, vec!["Body text."]);
}

#[rstest]
#[case("700.2. Not a keyword section")]
#[case("704.5a State-based actions")]
#[case("702. Keyword Abilities")]
#[case("702.19a Sub-rules are not headers")]
fn test_non_headers_do_not_open_entries(#[case] line: &str) {
    assert!(parse_rules(line).is_empty());
}

#[rstest]
#[case("701.2. Activate", Category::KeywordActions)]
#[case("702.9. Flying", Category::KeywordAbilities)]
fn test_category_follows_section(#[case] header: &str, #[case] category: Category) {
    let entries = parse_rules(header);
    assert_eq!(entries[0].category, category);
}

// =============================================================================
// Bodies
// =============================================================================

#[test]
fn test_header_without_body_yields_empty_text() {
    let entries = parse_rules("702.200. Placeholder\n702.201. Another\n");
    assert_eq!(ids(&entries), vec!["702.200", "702.201"]);
    assert!(entries.iter().all(|e| e.full_text.is_empty()));
}

#[test]
fn test_neighbouring_id_space_is_not_absorbed() {
    // 702.10a belongs to 702.10.
    let text = "702.1. Deathtouch\n702.1a Own text.\n702.10a Stray sub-rule.\n";
    let entries = parse_rules(text);
    assert_eq!(entries[0].full_text, vec!["Own text."]);
}

#[test]
fn test_sub_rule_without_separator_is_appended() {
    let text = "702.9. Flying\n702.9a Flying is an evasion ability.\n702.9b(See rule 509.)\n";
    let entries = parse_rules(text);
    assert_eq!(
        entries[0].full_text,
        vec!["Flying is an evasion ability. (See rule 509.)"]
    );
}

#[test]
fn test_bom_and_mixed_line_endings() {
    let text = "\u{feff}702.9. Flying\r\n702.9a Evasion.\r702.19. Trample\n702.19a Excess damage.";
    let entries = parse_rules(text);
    assert_eq!(ids(&entries), vec!["702.9", "702.19"]);
    assert_eq!(entries[1].full_text, vec!["Excess damage."]);
}

#[test]
fn test_duplicate_header_keeps_first_occurrence() {
    let text = "702.2. Deathtouch\n702.2a First.\n702.2. Deathtouch\n702.2a Second.\n702.3. Defender\n702.3a Third.\n";
    let entries = parse_rules(text);
    assert_eq!(ids(&entries), vec!["702.2", "702.3"]);
    assert_eq!(entries[0].full_text, vec!["First."]);
    assert_eq!(entries[1].full_text, vec!["Third."]);
}

#[rstest]
#[case("702.19 Unlettered note.", "Unlettered note.")]
#[case("702.19 Trample", "Trample")]
fn test_own_id_without_letter_is_a_paragraph(#[case] line: &str, #[case] paragraph: &str) {
    let text = format!("702.19. Trample\n702.19a First.\n{line}\n702.19b Second.\n702.19c Third.\n");
    let entries = parse_rules(&text);

    assert_eq!(ids(&entries), vec!["702.19"]);
    assert_eq!(entries[0].full_text, vec!["First.", paragraph, "Second.", "Third."]);
}

#[test]
fn test_other_numbered_lines_are_ignored() {
    let text = "702.2. Deathtouch\n702.2a Body.\n702. Keyword Abilities\n";
    let entries = parse_rules(text);
    assert_eq!(entries[0].full_text, vec!["Body."]);
}

// =============================================================================
// Filters
// =============================================================================

#[rstest]
#[case(EntryFilter::GenericLabel, vec!["702.2", "702.9"])]
#[case(EntryFilter::BootstrapId, vec!["702.2", "702.9"])]
fn test_filters_drop_prefaces(#[case] filter: EntryFilter, #[case] expected: Vec<&str>) {
    let text = "702.1. General\n702.1a Intro.\n702.2. Deathtouch\n702.9. Flying\n";
    let entries = RuleParser::with_filter(filter).parse(text);
    assert_eq!(ids(&entries), expected);
}

#[test]
fn test_filters_differ_on_general_named_keyword() {
    let text = "702.1. Introduction\n702.50. General's Orders\n";

    let by_label = RuleParser::with_filter(EntryFilter::GenericLabel).parse(text);
    assert_eq!(ids(&by_label), vec!["702.1"]);

    let by_id = RuleParser::with_filter(EntryFilter::BootstrapId).parse(text);
    assert_eq!(ids(&by_id), vec!["702.50"]);
}

// =============================================================================
// Full document
// =============================================================================

#[test]
fn test_sample_rulebook_ids() {
    let entries = parse_rules(&sample_rulebook());
    assert_eq!(ids(&entries), SAMPLE_IDS.to_vec());
}

#[test]
fn test_sectionless_document_parses_empty() {
    assert!(parse_rules(&sectionless_document()).is_empty());
    assert!(parse_rules(&html_error_page()).is_empty());
}
