//! Contract with the "explain this rule" text-generation collaborator.
//!
//! The pipeline only hands over a rule's name and its joined body text and
//! passes the returned prose through. Prose may carry `[[Card Name]]`
//! markers, which [`card_markers`] pulls out for link-ification downstream.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::models::RuleEntry;

static CARD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("Invalid card marker regex"));

/// Input for the collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRequest {
    pub rule_name: String,
    pub rule_text: String,
}

impl ExplainRequest {
    /// Name and newline-joined paragraphs, unmodified.
    pub fn from_entry(entry: &RuleEntry) -> Self {
        Self {
            rule_name: entry.name.clone(),
            rule_text: entry.joined_text(),
        }
    }
}

/// Something that can produce explanatory prose for a rule.
#[async_trait]
pub trait RuleExplainer: Send + Sync {
    async fn explain(&self, request: &ExplainRequest) -> Result<String, String>;
}

/// Card names referenced as `[[Card Name]]`, in order of appearance.
pub fn card_markers(prose: &str) -> Vec<String> {
    CARD_MARKER
        .captures_iter(prose)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
