//! Test Fixtures
//!
//! Abbreviated Comprehensive Rules documents shaped like the real file:
//! preamble, table of contents, earlier sections, sections 701/702 and the
//! trailing sections and glossary that must never leak into an entry.

/// Version tag used by pipeline tests.
pub const TEST_VERSION: &str = "2025-09-19";

/// A rulebook large enough to pass the lenient validator.
pub fn sample_rulebook() -> String {
    [
        "Magic: The Gathering Comprehensive Rules",
        "",
        "These rules are effective as of September 19, 2025.",
        "",
        "Introduction",
        "This document is the ultimate authority for Magic: The Gathering competitive game play.",
        "It consists of a series of numbered rules followed by a glossary.",
        "",
        "Contents",
        "1. Game Concepts",
        "700. General",
        "701. Keyword Actions",
        "702. Keyword Abilities",
        "703. Turn-Based Actions",
        "Glossary",
        "Credits",
        "",
        "700. General",
        "",
        "700.1. Anything that happens in a game is an event.",
        "",
        "701. Keyword Actions",
        "",
        "701.1. General",
        "",
        "701.1a Most actions described in a card's rules text use the standard English definitions of the verbs within.",
        "",
        "701.2. Activate",
        "",
        "701.2a To activate an activated ability is to put it onto the stack and pay its costs,",
        "so that it will eventually resolve and have its effect.",
        "",
        "701.3. Attach",
        "",
        "701.3a To attach an Aura, Equipment, or Fortification to an object means to take it from where it currently is and put it onto that object.",
        "",
        "701.3b If an effect tries to attach an Aura, Equipment, or Fortification to an object it can't be attached to, the Aura, Equipment, or Fortification doesn't move.",
        "",
        "702. Keyword Abilities",
        "",
        "702.1. General",
        "",
        "702.1a Most abilities describe exactly what they do in the card's rules text.",
        "",
        "702.2. Deathtouch",
        "",
        "702.2a Deathtouch is a static ability.",
        "",
        "702.2b A creature with toughness greater than 0 that's been dealt damage by a source with deathtouch since the last time state-based actions were checked is destroyed as a state-based action.",
        "",
        "702.9. Flying",
        "",
        "702.9a Flying is an evasion ability.",
        "",
        "702.9b A creature with flying can't be blocked except by creatures with flying and/or reach.",
        "A creature with flying can block a creature with or without flying.",
        "",
        "702.19. Trample",
        "",
        "702.19a Trample is a static ability that modifies the rules for assigning an attacking creature's combat damage.",
        "",
        "702.19b The controller of an attacking creature with trample first assigns damage to the creature(s) blocking it.",
        "",
        "703. Turn-Based Actions",
        "",
        "703.1. Turn-based actions are game actions that happen automatically when certain steps or phases begin.",
        "",
        "Glossary",
        "",
        "Trample",
        "A keyword ability that modifies how a creature assigns combat damage. See rule 702.19.",
        "",
        "Credits",
        "Magic: The Gathering Original Game Design: Richard Garfield",
        "",
    ]
    .join("\r\n")
}

/// Ids parsed from [`sample_rulebook`] with the default filter, in order.
pub const SAMPLE_IDS: [&str; 5] = ["701.2", "701.3", "702.2", "702.9", "702.19"];

/// A document that validates but contains no keyword sections.
pub fn sectionless_document() -> String {
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n".repeat(40)
}

/// A proxy error page large enough to pass the length check.
pub fn html_error_page() -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><title>502 Bad Gateway</title></head><body>{}</body></html>",
        "upstream unavailable ".repeat(100)
    )
}
