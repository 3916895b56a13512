//! Rulebook data model.

use serde::{Deserialize, Serialize};

// ============================================================================
// Category
// ============================================================================

/// Rulebook section an entry was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Section 701, Keyword Actions
    #[serde(rename = "701")]
    KeywordActions,
    /// Section 702, Keyword Abilities
    #[serde(rename = "702")]
    KeywordAbilities,
}

impl Category {
    /// All recognized sections, in document order.
    pub const ALL: [Category; 2] = [Category::KeywordActions, Category::KeywordAbilities];

    /// The 3-digit section code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::KeywordActions => "701",
            Self::KeywordAbilities => "702",
        }
    }

    /// Numeric section number.
    pub fn section_number(&self) -> u16 {
        match self {
            Self::KeywordActions => 701,
            Self::KeywordAbilities => 702,
        }
    }

    /// Human-readable section title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::KeywordActions => "Keyword Actions",
            Self::KeywordAbilities => "Keyword Abilities",
        }
    }

    /// Parse a section code such as `"702"`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "701" => Some(Self::KeywordActions),
            "702" => Some(Self::KeywordAbilities),
            _ => None,
        }
    }

    /// Highest recognized section number. Anything above ends the relevant
    /// part of the document.
    pub fn last_section_number() -> u16 {
        Self::ALL
            .iter()
            .map(Category::section_number)
            .max()
            .unwrap_or(702)
    }
}

// ============================================================================
// RuleEntry
// ============================================================================

/// A single addressable keyword definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Dotted id (`"702.19"`) or synthetic id for curated entries (`"702.VIVID"`)
    pub id: String,
    pub category: Category,
    /// Trimmed title
    pub name: String,
    /// Ordered paragraphs, each trimmed and non-empty
    #[serde(rename = "fullText")]
    pub full_text: Vec<String>,
}

impl RuleEntry {
    /// Create an entry without body text.
    pub fn new(id: impl Into<String>, category: Category, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category,
            name: name.into().trim().to_string(),
            full_text: Vec::new(),
        }
    }

    /// Builder-style paragraph list; blank paragraphs are dropped.
    pub fn with_text<I, S>(mut self, paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.full_text = paragraphs
            .into_iter()
            .map(|p| p.into().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Whether the entry carries any body text.
    pub fn has_text(&self) -> bool {
        !self.full_text.is_empty()
    }

    /// Paragraphs joined by newlines; this is what the explanation
    /// collaborator receives.
    pub fn joined_text(&self) -> String {
        self.full_text.join("\n")
    }

    /// Render the entry back into rulebook lines: a `<id>. <name>` header
    /// followed by one lettered sub-rule per paragraph.
    pub fn to_source_text(&self) -> String {
        let mut out = format!("{}. {}\n", self.id, self.name);
        for (idx, paragraph) in self.full_text.iter().enumerate() {
            out.push_str(&self.id);
            out.push_str(&sub_rule_suffix(idx));
            out.push(' ');
            out.push_str(paragraph);
            out.push('\n');
        }
        out
    }
}

/// Sub-rule letters: a..z, then aa, ab, ...
pub(crate) fn sub_rule_suffix(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
