//! Rulebook cache store.
//!
//! Holds the last validated raw rulebook text together with the version tag
//! it was fetched for. Two entries live under one fixed key:
//!
//! - `<key>.txt`: raw text
//! - `<key>_ver`: version string
//!
//! Reads are best-effort: a mismatched version, unreadable file or text that
//! no longer validates counts as a miss and the stale entry is evicted.
//! Writes return a [`RulebookResult`] that callers log and ignore.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::error::{RulebookError, RulebookResult};
use super::validator::ContentValidator;

/// Default storage key for the Comprehensive Rules text.
pub const DEFAULT_CACHE_KEY: &str = "mtg_rules_cache";

/// Suffix of the derived key that holds the version tag.
pub const VERSION_KEY_SUFFIX: &str = "_ver";

/// Raw text plus the version it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPayload {
    pub text: String,
    pub version: String,
    pub stored_at: DateTime<Utc>,
}

/// Persistence backend for the rulebook text.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Cached text for exactly `version`, if present and still valid.
    ///
    /// Anything else evicts the stored entry and returns `None`.
    async fn get(&self, version: &str) -> Option<String>;

    /// Overwrite the stored entry with `text` tagged as `version`.
    async fn put(&self, text: &str, version: &str) -> RulebookResult<()>;

    /// Remove the stored entry. Succeeds when nothing is stored.
    async fn clear(&self) -> RulebookResult<()>;

    /// Backend name used in logs.
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    async fn get(&self, version: &str) -> Option<String> {
        (**self).get(version).await
    }

    async fn put(&self, text: &str, version: &str) -> RulebookResult<()> {
        (**self).put(text, version).await
    }

    async fn clear(&self) -> RulebookResult<()> {
        (**self).clear().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Shared hit/evict decision for all backends.
fn accept_cached(
    validator: &ContentValidator,
    stored_version: &str,
    text: &str,
    requested: &str,
) -> Result<(), String> {
    if stored_version != requested {
        return Err(format!(
            "version mismatch (stored {stored_version:?}, requested {requested:?})"
        ));
    }
    validator.validate(text).map_err(|e| e.to_string())
}

// ============================================================================
// File-backed store
// ============================================================================

/// Durable cache under a directory, surviving process restarts.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
    key: String,
    validator: ContentValidator,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>, validator: ContentValidator) -> Self {
        Self {
            dir: dir.into(),
            key: key.into(),
            validator,
        }
    }

    /// Path of the raw text entry.
    pub fn text_path(&self) -> PathBuf {
        self.dir.join(format!("{}.txt", self.key))
    }

    /// Path of the version tag entry.
    pub fn version_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.key, VERSION_KEY_SUFFIX))
    }

    /// Read the stored payload without validating it.
    pub async fn read_payload(&self) -> RulebookResult<Option<CachedPayload>> {
        let version = match read_optional(&self.version_path()).await? {
            Some(v) => v.trim().to_string(),
            None => return Ok(None),
        };
        let text_path = self.text_path();
        let text = match read_optional(&text_path).await? {
            Some(t) => t,
            None => return Ok(None),
        };
        let stored_at = tokio::fs::metadata(&text_path)
            .await
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Some(CachedPayload {
            text,
            version,
            stored_at,
        }))
    }

    async fn write_atomic(&self, path: &Path, content: &str) -> RulebookResult<()> {
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, content).await.map_err(|e| {
            RulebookError::cache(format!(
                "Failed to write temp file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(RulebookError::cache(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                path.display(),
                e
            )));
        }
        Ok(())
    }
}

async fn read_optional(path: &Path) -> RulebookResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RulebookError::cache(format!(
            "Failed to read '{}': {}",
            path.display(),
            e
        ))),
    }
}

async fn remove_optional(path: &Path) -> RulebookResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RulebookError::cache(format!(
            "Failed to remove '{}': {}",
            path.display(),
            e
        ))),
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    #[instrument(skip(self), fields(key = %self.key))]
    async fn get(&self, version: &str) -> Option<String> {
        let payload = match self.read_payload().await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!("Cache empty");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Cache unreadable, evicting");
                let _ = self.clear().await;
                return None;
            }
        };

        match accept_cached(&self.validator, &payload.version, &payload.text, version) {
            Ok(()) => {
                debug!(
                    stored_at = %payload.stored_at.to_rfc3339(),
                    age_secs = (Utc::now() - payload.stored_at).num_seconds(),
                    "Cache hit"
                );
                Some(payload.text)
            }
            Err(reason) => {
                debug!(%reason, "Evicting stale cache entry");
                if let Err(e) = self.clear().await {
                    warn!(error = %e, "Failed to evict stale cache entry");
                }
                None
            }
        }
    }

    #[instrument(skip(self, text), fields(key = %self.key, len = text.len()))]
    async fn put(&self, text: &str, version: &str) -> RulebookResult<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            RulebookError::cache(format!(
                "Failed to create cache directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        // Drop the old tag first so a failed text write can never pair
        // new text with a stale tag or old text with a new one.
        remove_optional(&self.version_path()).await?;
        self.write_atomic(&self.text_path(), text).await?;
        self.write_atomic(&self.version_path(), version).await?;
        debug!("Cached rules text");
        Ok(())
    }

    async fn clear(&self) -> RulebookResult<()> {
        remove_optional(&self.version_path()).await?;
        remove_optional(&self.text_path()).await
    }

    fn name(&self) -> &str {
        "file"
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory cache for tests and ephemeral runs.
///
/// Clones share the same storage. [`MemoryCacheStore::fail_writes`] makes
/// every `put` fail, which is how a full storage quota looks to the pipeline.
#[derive(Debug, Clone)]
pub struct MemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
    key: String,
    validator: ContentValidator,
    fail_writes: Arc<AtomicBool>,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new(ContentValidator::default())
    }
}

impl MemoryCacheStore {
    pub fn new(validator: ContentValidator) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            key: DEFAULT_CACHE_KEY.to_string(),
            validator,
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pre-populate with `text` tagged as `version`.
    pub fn with_payload(validator: ContentValidator, text: &str, version: &str) -> Self {
        let store = Self::new(validator);
        let mut map = HashMap::new();
        map.insert(store.key.clone(), text.to_string());
        map.insert(store.version_key(), version.to_string());
        Self {
            entries: Arc::new(RwLock::new(map)),
            ..store
        }
    }

    /// Toggle simulated write failures.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stored payload, bypassing version and validity checks.
    pub async fn snapshot(&self) -> Option<(String, String)> {
        let entries = self.entries.read().await;
        let text = entries.get(&self.key)?.clone();
        let version = entries.get(&self.version_key())?.clone();
        Some((text, version))
    }

    fn version_key(&self) -> String {
        format!("{}{}", self.key, VERSION_KEY_SUFFIX)
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, version: &str) -> Option<String> {
        let (text, stored_version) = self.snapshot().await?;
        match accept_cached(&self.validator, &stored_version, &text, version) {
            Ok(()) => Some(text),
            Err(reason) => {
                debug!(%reason, "Evicting stale cache entry");
                let _ = self.clear().await;
                None
            }
        }
    }

    async fn put(&self, text: &str, version: &str) -> RulebookResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RulebookError::cache("storage quota exceeded"));
        }
        let mut entries = self.entries.write().await;
        entries.insert(self.key.clone(), text.to_string());
        entries.insert(self.version_key(), version.to_string());
        Ok(())
    }

    async fn clear(&self) -> RulebookResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(&self.key);
        entries.remove(&self.version_key());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
