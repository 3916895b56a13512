//! Comprehensive Rules ingestion.
//!
//! Fetches the rulebook text (local copy, proxies, direct), validates it,
//! caches it per document revision and parses sections 701/702 into
//! [`RuleEntry`] values.
//!
//! - [`validator`]: structural sanity check on raw text
//! - [`cache`]: versioned persistence of the raw text
//! - [`source`]: ordered retrieval strategies with per-attempt timeouts
//! - [`parser`]: line-oriented state machine producing entries
//! - [`repository`]: merged collection with curated supplements
//! - [`pipeline`]: cache → fetch → validate → parse → merge

pub mod cache;
pub mod error;
pub mod explain;
pub mod manual;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod repository;
pub mod source;
pub mod validator;

pub use cache::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use error::{AttemptFailure, RulebookError, RulebookResult};
pub use explain::{card_markers, ExplainRequest, RuleExplainer};
pub use models::{Category, RuleEntry};
pub use parser::{parse_rules, EntryFilter, RuleParser};
pub use pipeline::{LoadOrigin, LoadOutcome, LoadStage, RulebookLoader};
pub use repository::RuleRepository;
pub use source::{
    HttpStrategy, LocalFileStrategy, ProxyTemplate, RetrievalStrategy, SourceResolver,
    StrategySpec,
};
pub use validator::ContentValidator;
