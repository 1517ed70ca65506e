//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WIKICACHE_*)
//! 2. TOML config file (if WIKICACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WIKICACHE_*), nested keys split on `__`
/// 2. TOML config file (if WIKICACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Origin segment of every storage key (`sources/<origin_name>/raw/...`).
    ///
    /// Set via WIKICACHE_ORIGIN_NAME environment variable.
    #[serde(default = "default_origin_name")]
    pub origin_name: String,

    /// MediaWiki Action API endpoint, used for template expansion.
    ///
    /// Set via WIKICACHE_API_URL environment variable.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// MediaWiki REST API base, used for revision metadata.
    ///
    /// Set via WIKICACHE_REST_API_URL environment variable.
    #[serde(default = "default_rest_api_url")]
    pub rest_api_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via WIKICACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via WIKICACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for transient origin failures (timeouts, 429, 5xx).
    ///
    /// Set via WIKICACHE_MAX_RETRIES environment variable.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Minimum spacing between requests to the origin in milliseconds.
    ///
    /// Set via WIKICACHE_MIN_REQUEST_INTERVAL_MS environment variable.
    #[serde(default)]
    pub min_request_interval_ms: u64,

    /// File extension of stored content blobs.
    ///
    /// Set via WIKICACHE_EXTENSION environment variable.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Object store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Which object store implementation backs the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// S3 or an S3-compatible service (MinIO, RustFS).
    #[default]
    S3,
    /// A directory on the local filesystem.
    Local,
    /// Process-local memory; contents vanish on exit.
    Memory,
}

/// Object store settings, scoped to one bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Set via WIKICACHE_STORE__BACKEND (`s3`, `local`, `memory`).
    #[serde(default)]
    pub backend: StoreBackend,

    /// Bucket name. Required for the `s3` backend.
    ///
    /// Set via WIKICACHE_STORE__BUCKET environment variable.
    #[serde(default)]
    pub bucket: Option<String>,

    /// Endpoint URL for S3-compatible services.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Permit plain-HTTP endpoints (local MinIO and friends).
    #[serde(default)]
    pub allow_http: bool,

    /// Root directory for the `local` backend.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Maximum keys returned by a single listing. Listings are not paginated past this.
    #[serde(default = "default_list_page_cap")]
    pub list_page_cap: usize,
}

fn default_origin_name() -> String {
    "bulbapedia".into()
}

fn default_api_url() -> String {
    "https://bulbapedia.bulbagarden.net/w/api.php".into()
}

fn default_rest_api_url() -> String {
    "https://bulbapedia.bulbagarden.net/w/rest.php/v1".into()
}

fn default_user_agent() -> String {
    "wikicache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_extension() -> String {
    "wikitext".into()
}

fn default_list_page_cap() -> usize {
    1000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            bucket: None,
            endpoint: None,
            region: None,
            allow_http: false,
            root: None,
            list_page_cap: default_list_page_cap(),
        }
    }
}

impl StoreConfig {
    /// In-memory store settings, for tests and dry runs.
    pub fn memory() -> Self {
        Self { backend: StoreBackend::Memory, ..Default::default() }
    }

    /// Bucket name, or a description of how to set it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no bucket is configured.
    pub fn require_bucket(&self) -> Result<&str, ConfigError> {
        self.bucket.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "store.bucket".into(),
            hint: "Set WIKICACHE_STORE__BUCKET environment variable".into(),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin_name: default_origin_name(),
            api_url: default_api_url(),
            rest_api_url: default_rest_api_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            min_request_interval_ms: 0,
            extension: default_extension(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Minimum request spacing as Duration.
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WIKICACHE_`
    /// 2. TOML file from `WIKICACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WIKICACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WIKICACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
