//! Source Resolver
//!
//! Retrieves the rulebook text by trying an ordered list of strategies
//! (bundled local copy, CORS pass-through proxies, direct fetch). Attempts run
//! strictly one after another; each one is bounded by a timeout and is never
//! retried. The first payload that passes the [`ContentValidator`] wins.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::{AttemptFailure, RulebookError, RulebookResult};
use super::validator::ContentValidator;

/// Canonical location of the Comprehensive Rules text.
///
/// The space in the filename is intentional; proxies receive the
/// percent-encoded form exactly once.
pub const DEFAULT_RULES_URL: &str =
    "https://media.wizards.com/2025/downloads/MagicCompRules 20250919.txt";

/// Bundled copy of the rulebook. Relative paths resolve against the working
/// directory; set `rules.strategies` to an absolute path to pin it.
pub const DEFAULT_LOCAL_PATH: &str = "rules/MagicCompRules 20250919.txt";

/// Per-attempt time bound.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

/// `corsproxy.io` takes the encoded target as the whole query string.
pub const CORSPROXY_TEMPLATE: &str = "https://corsproxy.io/?{url}";

/// `allorigins.win` raw pass-through.
pub const ALLORIGINS_TEMPLATE: &str = "https://api.allorigins.win/raw?url={url}";

// ============================================================================
// Strategy trait
// ============================================================================

/// One way of obtaining the rulebook text.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    /// Name used in logs and in [`AttemptFailure`] records.
    fn name(&self) -> &str;

    /// Fetch the raw text. Time bounds are enforced by the resolver.
    async fn retrieve(&self) -> RulebookResult<String>;
}

// ============================================================================
// Local file
// ============================================================================

/// Reads a bundled copy of the rulebook from disk.
#[derive(Debug, Clone)]
pub struct LocalFileStrategy {
    path: PathBuf,
}

impl LocalFileStrategy {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RetrievalStrategy for LocalFileStrategy {
    fn name(&self) -> &str {
        "local"
    }

    async fn retrieve(&self) -> RulebookResult<String> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            RulebookError::network(format!(
                "local copy '{}' unavailable: {}",
                self.path.display(),
                e
            ))
        })?;
        // The published file is not always clean UTF-8.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// ============================================================================
// HTTP (direct or via proxy)
// ============================================================================

/// Pass-through proxy URL template with a `{url}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTemplate(String);

impl ProxyTemplate {
    pub fn new(template: impl Into<String>) -> RulebookResult<Self> {
        let template = template.into();
        if !template.contains("{url}") {
            return Err(RulebookError::config(format!(
                "proxy template '{template}' has no {{url}} placeholder"
            )));
        }
        Ok(Self(template))
    }

    pub fn corsproxy() -> Self {
        Self(CORSPROXY_TEMPLATE.to_string())
    }

    pub fn allorigins() -> Self {
        Self(ALLORIGINS_TEMPLATE.to_string())
    }

    /// Substitute the percent-encoded `target`.
    pub fn wrap(&self, target: &str) -> String {
        self.0.replace("{url}", &urlencoding::encode(target))
    }
}

/// GETs the rulebook over HTTP, optionally through a pass-through proxy.
#[derive(Debug, Clone)]
pub struct HttpStrategy {
    name: String,
    url: Url,
    timeout: Duration,
    client: Client,
}

impl HttpStrategy {
    /// Fetch `target` directly.
    pub fn direct(target: &str, timeout: Duration) -> RulebookResult<Self> {
        Self::build("direct", target.to_string(), timeout)
    }

    /// Fetch `target` through `proxy`.
    pub fn proxied(
        name: impl Into<String>,
        proxy: &ProxyTemplate,
        target: &str,
        timeout: Duration,
    ) -> RulebookResult<Self> {
        Self::build(name, proxy.wrap(target), timeout)
    }

    fn build(name: impl Into<String>, raw_url: String, timeout: Duration) -> RulebookResult<Self> {
        let name = name.into();
        let url = Url::parse(&raw_url).map_err(|e| {
            RulebookError::config(format!("strategy '{name}' has invalid URL '{raw_url}': {e}"))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RulebookError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            name,
            url,
            timeout,
            client,
        })
    }

    /// Final request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> RulebookError {
        if err.is_timeout() {
            RulebookError::Timeout {
                elapsed: self.timeout,
            }
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl RetrievalStrategy for HttpStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(strategy = %self.name, url = %self.url))]
    async fn retrieve(&self) -> RulebookResult<String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RulebookError::HttpStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }
}

// ============================================================================
// Strategy configuration
// ============================================================================

/// Serializable description of a strategy, kept as ordered config data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    /// Bundled copy on disk.
    Local { path: PathBuf },
    /// Remote fetch through a pass-through proxy.
    Proxy { name: String, template: String },
    /// Remote fetch without a proxy.
    Direct,
}

impl StrategySpec {
    /// Default order: local copy, two proxies, direct.
    pub fn defaults() -> Vec<StrategySpec> {
        vec![
            StrategySpec::Local {
                path: PathBuf::from(DEFAULT_LOCAL_PATH),
            },
            StrategySpec::Proxy {
                name: "corsproxy".to_string(),
                template: CORSPROXY_TEMPLATE.to_string(),
            },
            StrategySpec::Proxy {
                name: "allorigins".to_string(),
                template: ALLORIGINS_TEMPLATE.to_string(),
            },
            StrategySpec::Direct,
        ]
    }

    /// Instantiate the strategy for `target`.
    pub fn build(
        &self,
        target: &str,
        timeout: Duration,
    ) -> RulebookResult<Box<dyn RetrievalStrategy>> {
        Ok(match self {
            Self::Local { path } => Box::new(LocalFileStrategy::new(path.clone())),
            Self::Proxy { name, template } => Box::new(HttpStrategy::proxied(
                name.clone(),
                &ProxyTemplate::new(template.clone())?,
                target,
                timeout,
            )?),
            Self::Direct => Box::new(HttpStrategy::direct(target, timeout)?),
        })
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Text accepted from one strategy.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    /// Name of the strategy that produced the text
    pub strategy: String,
    pub text: String,
    /// Failures recorded before the winning strategy
    pub attempts: Vec<AttemptFailure>,
}

/// Runs strategies in priority order until one yields valid text.
pub struct SourceResolver {
    strategies: Vec<Box<dyn RetrievalStrategy>>,
    validator: ContentValidator,
    attempt_timeout: Duration,
}

impl std::fmt::Debug for SourceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceResolver")
            .field("strategies", &self.strategy_names())
            .field("validator", &self.validator)
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}

impl SourceResolver {
    pub fn new(validator: ContentValidator) -> Self {
        Self {
            strategies: Vec::new(),
            validator,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Build the strategy list from config data.
    pub fn from_specs(
        specs: &[StrategySpec],
        target: &str,
        attempt_timeout: Duration,
        validator: ContentValidator,
    ) -> RulebookResult<Self> {
        let strategies = specs
            .iter()
            .map(|spec| spec.build(target, attempt_timeout))
            .collect::<RulebookResult<Vec<_>>>()?;

        Ok(Self {
            strategies,
            validator,
            attempt_timeout,
        })
    }

    /// Append a strategy at the lowest priority.
    pub fn with_strategy(mut self, strategy: impl RetrievalStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn with_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn validator(&self) -> &ContentValidator {
        &self.validator
    }

    /// Try every strategy in order; return the first valid payload.
    ///
    /// Individual failures are logged and recorded. Only when every strategy
    /// fails does this return [`RulebookError::AllSourcesExhausted`].
    pub async fn resolve(&self) -> RulebookResult<ResolvedSource> {
        let mut attempts = Vec::new();

        for strategy in &self.strategies {
            let name = strategy.name();
            let started = Instant::now();
            debug!(strategy = name, "Trying rules source");

            match self.attempt(strategy.as_ref()).await {
                Ok(text) => {
                    info!(
                        strategy = name,
                        bytes = text.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Rules source accepted"
                    );
                    return Ok(ResolvedSource {
                        strategy: name.to_string(),
                        text,
                        attempts,
                    });
                }
                Err(e) => {
                    warn!(strategy = name, error = %e, "Rules source failed, falling back");
                    attempts.push(AttemptFailure {
                        strategy: name.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let last_error = attempts
            .last()
            .map(|a| a.error.clone())
            .unwrap_or_else(|| "no retrieval strategies configured".to_string());
        Err(RulebookError::AllSourcesExhausted {
            attempts,
            last_error,
        })
    }

    /// One bounded attempt. On timeout the in-flight future is dropped.
    async fn attempt(&self, strategy: &dyn RetrievalStrategy) -> RulebookResult<String> {
        let text = tokio::time::timeout(self.attempt_timeout, strategy.retrieve())
            .await
            .map_err(|_| RulebookError::Timeout {
                elapsed: self.attempt_timeout,
            })??;
        self.validator.validate(&text)?;
        Ok(text)
    }
}
