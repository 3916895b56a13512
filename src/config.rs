use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::rulebook::cache::DEFAULT_CACHE_KEY;
use crate::core::rulebook::parser::EntryFilter;
use crate::core::rulebook::source::{StrategySpec, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_RULES_URL};
use crate::core::rulebook::validator::LENIENT_MIN_LENGTH;

/// Revision of the Comprehensive Rules the bundled sources point at.
pub const DEFAULT_RULES_VERSION: &str = "2025-09-19";

/// Prefix for environment overrides, e.g. `MTG_RULES_CACHE__ENABLED=false`.
pub const ENV_PREFIX: &str = "MTG_RULES_";

const APP_DIR: &str = "mtg-rules";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rules: RulesConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

/// Where and how the rulebook is fetched and parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Canonical remote location of the rules text.
    pub url: String,
    /// Document revision; a change invalidates the cache.
    pub version: String,
    /// Retrieval strategies in priority order.
    pub strategies: Vec<StrategySpec>,
    /// Time bound for each retrieval attempt, in seconds.
    pub attempt_timeout_secs: u64,
    /// Minimum accepted text length, in characters.
    pub min_length: usize,
    pub entry_filter: EntryFilter,
}

/// Local cache of the raw rules text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Override the default cache directory.
    pub dir: Option<PathBuf>,
    /// Storage key; the version tag lives under `<key>_ver`.
    pub key: String,
}

/// Log output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Also write JSON logs to a daily rolling file.
    pub file: bool,
    /// Override the default log directory.
    pub dir: Option<PathBuf>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RULES_URL.to_string(),
            version: DEFAULT_RULES_VERSION.to_string(),
            strategies: StrategySpec::defaults(),
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT.as_secs(),
            min_length: LENIENT_MIN_LENGTH,
            entry_filter: EntryFilter::default(),
        }
    }
}

impl RulesConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            key: DEFAULT_CACHE_KEY.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: false,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/mtg-rules/config.toml` plus
    /// `MTG_RULES_*` environment overrides.
    /// Returns `Default` if loading fails.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::try_load_from(&config_path) {
            Ok(config) => {
                log::debug!("Loaded config (file: {})", config_path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config at {}: {e}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Defaults, then `path` if it exists, then environment overrides.
    pub fn try_load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rules.url.trim().is_empty() {
            return Err(ConfigError::Invalid("rules.url is empty".to_string()));
        }
        if self.rules.version.trim().is_empty() {
            return Err(ConfigError::Invalid("rules.version is empty".to_string()));
        }
        if self.rules.attempt_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "rules.attempt_timeout_secs must be positive".to_string(),
            ));
        }
        if self.cache.key.trim().is_empty() {
            return Err(ConfigError::Invalid("cache.key is empty".to_string()));
        }
        Ok(())
    }

    /// Resolved cache directory (override or XDG default).
    pub fn cache_dir(&self) -> PathBuf {
        self.cache.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|d| d.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("cache"))
        })
    }

    /// Resolved log directory (override or XDG data default).
    pub fn log_dir(&self) -> PathBuf {
        self.logging.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR).join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
