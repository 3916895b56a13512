//! Error types for the rulebook pipeline.
//!
//! Retrieval-level failures (`Timeout`, `HttpStatus`, `NetworkFailure`,
//! `ValidationFailure`) are recovered inside the pipeline and only show up
//! in diagnostics. `AllSourcesExhausted` and `EmptyParseResult` are the two
//! terminal failures a caller ever sees.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Unified error type for rulebook retrieval, caching and parsing.
#[derive(Debug, Error)]
pub enum RulebookError {
    /// Fetched or cached text failed the structural sanity check.
    #[error("Validation failed: {0}")]
    ValidationFailure(String),

    /// A retrieval attempt exceeded its time bound.
    #[error("Timed out after {}ms", elapsed.as_millis())]
    Timeout { elapsed: Duration },

    /// The remote answered with a non-success status code.
    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    /// Transport or connection failure (also used for unreadable local copies).
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Every retrieval strategy failed or returned invalid content.
    #[error("All rule sources exhausted after {} attempt(s); last error: {last_error}", attempts.len())]
    AllSourcesExhausted {
        attempts: Vec<AttemptFailure>,
        last_error: String,
    },

    /// Parsing finished without producing a single entry.
    #[error("Rules text parsed to zero entries; the source format may have changed")]
    EmptyParseResult,

    /// Cache persistence error.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error for file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RulebookError {
    /// Create a validation failure with the given reason.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailure(msg.into())
    }

    /// Create a network failure with the given reason.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkFailure(msg.into())
    }

    /// Create a cache error with the given message.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    /// Create a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error ends a load cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::AllSourcesExhausted { .. } | Self::EmptyParseResult | Self::Config(_)
        )
    }

    /// Whether this error comes from a single retrieval attempt and should
    /// trigger fallback to the next strategy.
    pub fn is_retrieval_failure(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailure(_)
                | Self::Timeout { .. }
                | Self::HttpStatus { .. }
                | Self::NetworkFailure(_)
        )
    }
}

impl From<reqwest::Error> for RulebookError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

/// One failed retrieval attempt, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    /// Name of the strategy that failed.
    pub strategy: String,
    /// Rendered error description.
    pub error: String,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.error)
    }
}

/// Result type alias for rulebook operations.
pub type RulebookResult<T> = Result<T, RulebookError>;
