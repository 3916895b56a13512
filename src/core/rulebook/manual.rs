//! Curated supplemental entries.
//!
//! Abilities that are missing from sections 701/702 of the published text or
//! come from sets newer than the current rules revision.

use super::models::{Category, RuleEntry};

/// The curated entries, appended after the parsed ones.
pub fn manual_entries() -> Vec<RuleEntry> {
    vec![
        RuleEntry::new("702.VIVID", Category::KeywordAbilities, "Vivid").with_text([
            "Vivid is an ability word that highlights abilities that care in some way about the number of colors among permanents you control. This number will be between zero and five.",
        ]),
        RuleEntry::new("702.BLIGHT", Category::KeywordAbilities, "Blight").with_text([
            "To blight N, put N -1/-1 counters on a creature you control. That creature is not targeted, so you choose which creature will get the -1/-1 counters as you are taking the blight action. Importantly, you can put more -1/-1 counters on a creature than it would take to get rid of it.",
        ]),
        RuleEntry::new("702.KINDRED", Category::KeywordAbilities, "Kindred").with_text([
            "\"Kindred\" is a card type (formerly known as \"Tribal\"). It allows non-creature cards to have creature types.",
        ]),
        RuleEntry::new("712.DFC", Category::KeywordAbilities, "Double-Faced Cards").with_text([
            "Double-faced cards have a Magic card face on each side. They have no Magic card back. They can be Transforming Double-Faced Cards (TDFC) or Modal Double-Faced Cards (MDFC).",
        ]),
    ]
}
