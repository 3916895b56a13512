//! Rulebook load orchestration.
//!
//! ```text
//! CacheCheck ─hit──────────────────────────────▶ Success
//!     │ miss / stale / parses empty
//!     ▼
//! Fetching ─exhausted──▶ Failed(AllSourcesExhausted)
//!     │ valid text
//!     ▼
//! ParseAndStore ─empty──▶ Failed(EmptyParseResult)
//!     │ entries (cache written, best-effort)
//!     ▼
//! Success
//! ```
//!
//! A cycle is all-or-nothing: callers get the full merged collection or a
//! single terminal error.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::cache::{CacheStore, FileCacheStore};
use super::error::{AttemptFailure, RulebookError, RulebookResult};
use super::manual::manual_entries;
use super::models::RuleEntry;
use super::parser::RuleParser;
use super::repository::RuleRepository;
use super::source::SourceResolver;
use super::validator::ContentValidator;
use crate::config::AppConfig;

/// Orchestrator states, recorded in order for each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    CacheCheck,
    CacheHit,
    CacheMiss,
    Fetching,
    ParseAndStore,
    Success,
    Failed,
}

/// Where the returned entries came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    Cache,
    Source { strategy: String },
}

impl fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Source { strategy } => write!(f, "source '{strategy}'"),
        }
    }
}

/// Result of a successful cycle.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub repository: RuleRepository,
    pub origin: LoadOrigin,
    /// Retrieval failures recovered along the way
    pub attempts: Vec<AttemptFailure>,
    pub stages: Vec<LoadStage>,
}

#[derive(Debug, Default)]
struct StageTrace(Vec<LoadStage>);

impl StageTrace {
    fn enter(&mut self, stage: LoadStage) {
        debug!(?stage, "Rulebook load stage");
        self.0.push(stage);
    }
}

/// Drives cache check, retrieval, validation, parsing and merging.
pub struct RulebookLoader {
    resolver: SourceResolver,
    cache: Option<Arc<dyn CacheStore>>,
    version: String,
    parser: RuleParser,
    manual: Vec<RuleEntry>,
}

impl fmt::Debug for RulebookLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulebookLoader")
            .field("resolver", &self.resolver)
            .field("cache", &self.cache.as_ref().map(|c| c.name().to_string()))
            .field("version", &self.version)
            .field("parser", &self.parser)
            .field("manual", &self.manual.len())
            .finish()
    }
}

impl RulebookLoader {
    /// Loader without a cache, default parser and the curated supplements.
    pub fn new(resolver: SourceResolver, version: impl Into<String>) -> Self {
        Self {
            resolver,
            cache: None,
            version: version.into(),
            parser: RuleParser::default(),
            manual: manual_entries(),
        }
    }

    /// Assemble the loader described by `config`.
    pub fn from_config(config: &AppConfig) -> RulebookResult<Self> {
        let rules = &config.rules;
        let validator = ContentValidator::new(rules.min_length);
        let resolver = SourceResolver::from_specs(
            &rules.strategies,
            &rules.url,
            rules.attempt_timeout(),
            validator,
        )?;

        let mut loader = Self::new(resolver, rules.version.clone())
            .with_parser(RuleParser::with_filter(rules.entry_filter));

        if config.cache.enabled {
            let store = FileCacheStore::new(config.cache_dir(), config.cache.key.clone(), validator);
            loader = loader.with_cache(Arc::new(store));
        }
        Ok(loader)
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_parser(mut self, parser: RuleParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_manual_entries(mut self, manual: Vec<RuleEntry>) -> Self {
        self.manual = manual;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Cached entries if available, otherwise fetch.
    #[instrument(skip(self), fields(version = %self.version))]
    pub async fn load(&self) -> RulebookResult<LoadOutcome> {
        let mut trace = StageTrace::default();
        trace.enter(LoadStage::CacheCheck);

        if let Some(cache) = &self.cache {
            if let Some(text) = cache.get(&self.version).await {
                let parsed = self.parser.parse(&text);
                if !parsed.is_empty() {
                    trace.enter(LoadStage::CacheHit);
                    return Ok(self.succeed(parsed, LoadOrigin::Cache, Vec::new(), trace));
                }
                warn!(cache = cache.name(), "Cached rules text parsed to nothing, evicting");
                if let Err(e) = cache.clear().await {
                    warn!(error = %e, "Failed to evict cached rules text");
                }
            }
        }

        trace.enter(LoadStage::CacheMiss);
        self.fetch_and_parse(trace).await
    }

    /// Skip the cache read and fetch from the sources.
    #[instrument(skip(self), fields(version = %self.version))]
    pub async fn refresh(&self) -> RulebookResult<LoadOutcome> {
        self.fetch_and_parse(StageTrace::default()).await
    }

    /// Drop the cached text, if a cache is configured.
    pub async fn clear_cache(&self) -> RulebookResult<()> {
        match &self.cache {
            Some(cache) => cache.clear().await,
            None => Ok(()),
        }
    }

    async fn fetch_and_parse(&self, mut trace: StageTrace) -> RulebookResult<LoadOutcome> {
        trace.enter(LoadStage::Fetching);
        let resolved = match self.resolver.resolve().await {
            Ok(resolved) => resolved,
            Err(e) => {
                trace.enter(LoadStage::Failed);
                error!(error = %e, "Could not retrieve rules text");
                return Err(e);
            }
        };

        trace.enter(LoadStage::ParseAndStore);
        let parsed = self.parser.parse(&resolved.text);
        if parsed.is_empty() {
            trace.enter(LoadStage::Failed);
            error!(strategy = %resolved.strategy, "Rules text parsed to zero entries");
            return Err(RulebookError::EmptyParseResult);
        }

        if let Some(cache) = &self.cache {
            // Best-effort: a failed write never fails the cycle.
            if let Err(e) = cache.put(&resolved.text, &self.version).await {
                warn!(cache = cache.name(), error = %e, "Failed to cache rules text, continuing");
            }
        }

        let origin = LoadOrigin::Source {
            strategy: resolved.strategy,
        };
        Ok(self.succeed(parsed, origin, resolved.attempts, trace))
    }

    fn succeed(
        &self,
        parsed: Vec<RuleEntry>,
        origin: LoadOrigin,
        attempts: Vec<AttemptFailure>,
        mut trace: StageTrace,
    ) -> LoadOutcome {
        let parsed_count = parsed.len();
        let repository = RuleRepository::merge(parsed, self.manual.clone());
        trace.enter(LoadStage::Success);
        info!(
            %origin,
            parsed = parsed_count,
            total = repository.len(),
            "Rulebook loaded"
        );
        LoadOutcome {
            repository,
            origin,
            attempts,
            stages: trace.0,
        }
    }
}
