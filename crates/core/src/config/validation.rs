//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, StoreBackend};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// The S3 bucket is checked later, when the store is opened.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_retries` exceeds 10
    /// - `origin_name` is empty or contains `/`
    /// - `user_agent` or `extension` is empty
    /// - `store.list_page_cap` is outside 1..=1000
    /// - `store.root` is unset for the local backend
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_retries > 10 {
            return Err(ConfigError::Invalid { field: "max_retries".into(), reason: "must not exceed 10".into() });
        }

        if self.origin_name.is_empty() || self.origin_name.contains('/') {
            return Err(ConfigError::Invalid {
                field: "origin_name".into(),
                reason: "must be a single non-empty path segment".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.extension.is_empty() || self.extension.contains(['/', '.']) {
            return Err(ConfigError::Invalid {
                field: "extension".into(),
                reason: "must be non-empty without '/' or '.'".into(),
            });
        }

        if !(1..=1000).contains(&self.store.list_page_cap) {
            return Err(ConfigError::Invalid {
                field: "store.list_page_cap".into(),
                reason: "must be between 1 and 1000".into(),
            });
        }

        if self.store.backend == StoreBackend::Local && self.store.root.is_none() {
            return Err(ConfigError::Invalid {
                field: "store.root".into(),
                reason: "required for the local backend".into(),
            });
        }

        if self.store.backend != StoreBackend::S3 && self.store.endpoint.is_some() {
            tracing::warn!(
                backend = ?self.store.backend,
                "store.endpoint is set but only used by the s3 backend"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_too_many_retries() {
        let config = AppConfig { max_retries: 11, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_retries"));
    }

    #[test]
    fn test_validate_origin_name_with_slash() {
        let config = AppConfig { origin_name: "a/b".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "origin_name"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_extension_with_dot() {
        let config = AppConfig { extension: "wiki.text".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "extension"));
    }

    #[test]
    fn test_validate_list_page_cap_bounds() {
        for cap in [0, 1001] {
            let config =
                AppConfig { store: StoreConfig { list_page_cap: cap, ..Default::default() }, ..Default::default() };
            let result = config.validate();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "store.list_page_cap"));
        }
    }

    #[test]
    fn test_validate_local_backend_requires_root() {
        let mut config = AppConfig {
            store: StoreConfig { backend: StoreBackend::Local, ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "store.root"));

        config.store.root = Some(PathBuf::from("/tmp/wikicache"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            timeout_ms: 100,
            max_retries: 10,
            store: StoreConfig { list_page_cap: 1, ..Default::default() },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
