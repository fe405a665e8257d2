//! Configuration validation rules.

use crate::config::AppConfig;
use thiserror::Error;

/// Longest accepted cache TTL: 30 days.
const MAX_TTL_SECS: i64 = 30 * 24 * 60 * 60;

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

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `api_base_url` is empty, and
    /// `ConfigError::Invalid` if:
    /// - `api_base_url` is not an http(s) URL
    /// - `cache_ttl_secs` is below 1 second or above 30 days
    /// - `debounce_ms` exceeds 60 seconds
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `signature_chars` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "api_base_url".into(),
                hint: "Set DEALSCOUT_API_BASE_URL environment variable".into(),
            });
        }
        match url::Url::parse(&self.api_base_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            Ok(_) => return Err(invalid("api_base_url", "scheme must be http or https")),
            Err(e) => return Err(invalid("api_base_url", &e.to_string())),
        }

        if self.cache_ttl_secs < 1 {
            return Err(invalid("cache_ttl_secs", "must be at least 1 second"));
        }
        if self.cache_ttl_secs > MAX_TTL_SECS {
            return Err(invalid("cache_ttl_secs", "must not exceed 30 days"));
        }

        if self.debounce_ms > 60_000 {
            return Err(invalid("debounce_ms", "must not exceed 60 seconds (60000ms)"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.signature_chars == 0 {
            return Err(invalid("signature_chars", "must be greater than 0"));
        }

        if self.debounce_ms == 0 {
            tracing::warn!("debounce_ms is 0; bursts of triggers will not be collapsed");
        }

        Ok(())
    }
}
