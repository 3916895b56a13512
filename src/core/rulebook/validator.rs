//! Content Validator
//!
//! Cheap structural sanity check run on both cached and freshly fetched
//! rulebook text. Proxies that fail tend to hand back an HTML error page
//! with a 200 status, so length alone is not enough.

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{RulebookError, RulebookResult};

/// Matches the start of an HTML document anywhere in the payload.
static HTML_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<!DOCTYPE|<html").expect("Invalid HTML marker regex"));

/// Floor that keeps error pages out but lets abbreviated fixtures through.
pub const LENIENT_MIN_LENGTH: usize = 1_000;

/// Floor matching the real Comprehensive Rules document.
pub const STRICT_MIN_LENGTH: usize = 50_000;

/// Structural validator for raw rulebook text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentValidator {
    min_length: usize,
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::lenient()
    }
}

impl ContentValidator {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn lenient() -> Self {
        Self::new(LENIENT_MIN_LENGTH)
    }

    pub fn strict() -> Self {
        Self::new(STRICT_MIN_LENGTH)
    }

    /// Minimum accepted length in characters.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Accept or reject a possibly-absent payload.
    pub fn is_valid(&self, text: Option<&str>) -> bool {
        text.is_some_and(|t| self.validate(t).is_ok())
    }

    /// Validate text, returning the rejection reason on failure.
    pub fn validate(&self, text: &str) -> RulebookResult<()> {
        if HTML_MARKER.is_match(text) {
            return Err(RulebookError::validation(
                "payload contains an HTML document marker",
            ));
        }

        // Count characters only as far as the floor requires.
        let length = text.chars().take(self.min_length).count();
        if length < self.min_length {
            return Err(RulebookError::validation(format!(
                "payload too short ({length} chars, minimum {})",
                self.min_length
            )));
        }

        Ok(())
    }
}
