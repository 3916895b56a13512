//! Rule Parser
//!
//! Single pass over the normalized lines of the Comprehensive Rules text.
//! The parser state is a plain value folded over the line sequence, so each
//! transition can be exercised on its own:
//!
//! ```text
//! Seeking ──header──▶ Collecting ──header──▶ Collecting ...
//!                        │   ▲
//!                        │   └─ sub-rule / continuation lines
//!                        └──section > 702──▶ Stopped
//! ```
//!
//! Headers look like `702.19. Trample` (trailing dot optional), sub-rules like
//! `702.19a <body>`. Wrapped lines without a rule number are joined onto the
//! previous paragraph.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::models::{Category, RuleEntry};

// ============================================================================
// Patterns
// ============================================================================

fn section_alternation() -> String {
    Category::ALL
        .iter()
        .map(Category::code)
        .collect::<Vec<_>>()
        .join("|")
}

/// `702.19. Trample` / `702.19 Trample`
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({})\.(\d+)\.?\s+(.+)$", section_alternation()))
        .expect("Invalid header regex")
});

/// `702.19a ...`: a lettered sub-rule, never a header.
static SUB_RULE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({})\.\d+[a-z]", section_alternation()))
        .expect("Invalid sub-rule regex")
});

/// Any line opening with a top-level section number, e.g. `703.` or `100.1`.
static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3})\.").expect("Invalid numbered-line regex"));

/// Section prefaces such as "General".
static GENERIC_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bgeneral\b").expect("Invalid generic label regex"));

// ============================================================================
// Entry filter
// ============================================================================

/// Post-processing rule that removes section prefaces from the output.
///
/// Exactly one strategy is applied per parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryFilter {
    /// Drop entries whose name contains the word "general" (any case).
    #[default]
    GenericLabel,
    /// Drop each section's introductory rule (`701.1`, `702.1`).
    BootstrapId,
}

impl EntryFilter {
    /// Whether `entry` survives the filter.
    pub fn keeps(&self, entry: &RuleEntry) -> bool {
        match self {
            Self::GenericLabel => !GENERIC_LABEL.is_match(&entry.name),
            Self::BootstrapId => !Category::ALL
                .iter()
                .any(|c| entry.id == format!("{}.1", c.code())),
        }
    }
}

// ============================================================================
// Line normalization
// ============================================================================

/// Split on any line-ending convention, trim, and drop blank lines.
pub fn normalized_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r'])
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty())
}

// ============================================================================
// State machine
// ============================================================================

/// Phase of the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePhase {
    /// No header seen yet; preamble and table of contents are skipped.
    Seeking,
    /// Accumulating body text for the current entry.
    Collecting(RuleEntry),
    /// Skipping the body of a header whose id was already emitted.
    Discarding(String),
    /// Passed the last recognized section; remaining lines are ignored.
    Stopped,
}

/// Fold accumulator: current phase plus finished entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseState {
    phase: ParsePhase,
    completed: Vec<RuleEntry>,
    seen: HashSet<String>,
}

impl Default for ParseState {
    fn default() -> Self {
        Self {
            phase: ParsePhase::Seeking,
            completed: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl ParseState {
    pub fn phase(&self) -> &ParsePhase {
        &self.phase
    }

    pub fn completed(&self) -> &[RuleEntry] {
        &self.completed
    }

    /// Advance the state machine by one normalized (trimmed, non-blank) line.
    pub fn step(mut self, line: &str) -> Self {
        let phase = std::mem::replace(&mut self.phase, ParsePhase::Stopped);
        self.phase = match phase {
            ParsePhase::Stopped => ParsePhase::Stopped,
            ParsePhase::Seeking => self.on_seeking(line),
            ParsePhase::Collecting(entry) => self.on_collecting(entry, line),
            ParsePhase::Discarding(id) => self.on_discarding(id, line),
        };
        self
    }

    /// Commit any in-progress entry and return the entries in encounter order.
    pub fn finish(mut self) -> Vec<RuleEntry> {
        if let ParsePhase::Collecting(entry) =
            std::mem::replace(&mut self.phase, ParsePhase::Stopped)
        {
            self.commit(entry);
        }
        self.completed
    }

    fn on_seeking(&mut self, line: &str) -> ParsePhase {
        match parse_header(line) {
            Some(entry) => self.open(entry),
            None => ParsePhase::Seeking,
        }
    }

    fn on_collecting(&mut self, mut entry: RuleEntry, line: &str) -> ParsePhase {
        if is_past_last_section(line) {
            debug!(line, "Reached end of keyword sections");
            self.commit(entry);
            return ParsePhase::Stopped;
        }

        let header = parse_header(line);

        // `<id>. Name` repeats the header; `<id> text` is an unlettered sub-rule.
        let own_rest = strip_own_id(line, &entry.id)
            .filter(|rest| header.is_none() || !rest.starts_with('.'));

        if let Some(rest) = own_rest {
            let suffix_end = rest
                .find(|c: char| !c.is_ascii_lowercase())
                .unwrap_or(rest.len());
            let (_, body) = rest.split_at(suffix_end);
            if body.starts_with(char::is_whitespace) {
                push_paragraph(&mut entry, body.trim());
            } else {
                // Irregular formatting inside our own id-space: keep the text.
                append_continuation(&mut entry, body.trim());
            }
            return ParsePhase::Collecting(entry);
        }

        if let Some(next) = header {
            self.commit(entry);
            return self.open(next);
        }

        if !NUMBERED.is_match(line) {
            append_continuation(&mut entry, line);
        }
        ParsePhase::Collecting(entry)
    }

    fn on_discarding(&mut self, id: String, line: &str) -> ParsePhase {
        if is_past_last_section(line) {
            return ParsePhase::Stopped;
        }
        match parse_header(line) {
            Some(entry) => self.open(entry),
            None => ParsePhase::Discarding(id),
        }
    }

    fn open(&mut self, entry: RuleEntry) -> ParsePhase {
        if self.seen.contains(&entry.id) {
            warn!(id = %entry.id, "Duplicate rule header, skipping its body");
            return ParsePhase::Discarding(entry.id);
        }
        self.seen.insert(entry.id.clone());
        ParsePhase::Collecting(entry)
    }

    fn commit(&mut self, entry: RuleEntry) {
        self.completed.push(entry);
    }
}

fn parse_header(line: &str) -> Option<RuleEntry> {
    if SUB_RULE_ID.is_match(line) {
        return None;
    }
    let caps = HEADER.captures(line)?;
    let category = Category::from_code(&caps[1])?;
    let id = format!("{}.{}", &caps[1], &caps[2]);
    Some(RuleEntry::new(id, category, caps[3].trim()))
}

fn is_past_last_section(line: &str) -> bool {
    NUMBERED
        .captures(line)
        .and_then(|caps| caps[1].parse::<u16>().ok())
        .is_some_and(|section| section > Category::last_section_number())
}

/// `Some(rest)` when `line` lies in the id-space of `id` (`702.1` owns
/// `702.1a` but not `702.10a`).
fn strip_own_id<'a>(line: &'a str, id: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(id)?;
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        None
    } else {
        Some(rest)
    }
}

fn push_paragraph(entry: &mut RuleEntry, text: &str) {
    if !text.is_empty() {
        entry.full_text.push(text.to_string());
    }
}

fn append_continuation(entry: &mut RuleEntry, text: &str) {
    if text.is_empty() {
        return;
    }
    match entry.full_text.last_mut() {
        Some(last) => {
            last.push(' ');
            last.push_str(text);
        }
        None => entry.full_text.push(text.to_string()),
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Converts raw rulebook text into keyword entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleParser {
    filter: EntryFilter,
}

impl RuleParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: EntryFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> EntryFilter {
        self.filter
    }

    /// Parse `text` into entries in source order, with section prefaces removed.
    pub fn parse(&self, text: &str) -> Vec<RuleEntry> {
        let raw = normalized_lines(text)
            .fold(ParseState::default(), ParseState::step)
            .finish();
        let raw_count = raw.len();

        let entries: Vec<RuleEntry> = raw.into_iter().filter(|e| self.filter.keeps(e)).collect();
        debug!(
            parsed = raw_count,
            kept = entries.len(),
            filter = ?self.filter,
            "Parsed rules text"
        );
        entries
    }
}

/// Parse with the default [`EntryFilter`].
pub fn parse_rules(text: &str) -> Vec<RuleEntry> {
    RuleParser::new().parse(text)
}
