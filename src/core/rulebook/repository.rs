//! Rule Repository
//!
//! Final collection handed to consumers: parsed entries followed by the
//! curated supplements. Entries are not deduplicated by id; when a curated
//! entry shares an id with a parsed one, both are present and [`RuleRepository::get`]
//! returns the parsed one.

use serde::Serialize;

use super::models::{Category, RuleEntry};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleRepository {
    entries: Vec<RuleEntry>,
}

impl RuleRepository {
    /// Concatenate `manual` after `parsed`.
    pub fn merge(parsed: Vec<RuleEntry>, manual: Vec<RuleEntry>) -> Self {
        let mut entries = parsed;
        entries.extend(manual);
        Self { entries }
    }

    /// Entries in merge order.
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RuleEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with `id`.
    pub fn get(&self, id: &str) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries ordered by name, case-insensitively, for selection lists.
    pub fn sorted_by_name(&self) -> Vec<&RuleEntry> {
        let mut sorted: Vec<&RuleEntry> = self.entries.iter().collect();
        sorted.sort_by_cached_key(|e| (e.name.to_lowercase(), e.id.clone()));
        sorted
    }

    /// Entries whose name contains `query`, case-insensitively.
    pub fn search(&self, query: &str) -> Vec<&RuleEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &RuleEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }
}
