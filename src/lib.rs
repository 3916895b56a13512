//! MTG Rules - Comprehensive Rules keyword compendium
//!
//! Fetches the Magic: The Gathering Comprehensive Rules text from a local
//! copy or the web, caches it per revision, and parses the keyword action
//! and keyword ability sections into addressable entries.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub use crate::core::rulebook::{RuleEntry, RuleRepository, RulebookError, RulebookLoader};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
