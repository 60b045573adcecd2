//! Configuration validation.
//!
//! Every section reports all of its problems so a misconfigured deployment
//! fails at startup with the complete list, not the first entry.

use crate::{AppConfig, CacheConfig, DatabaseConfig, ObservabilityConfig, ServerConfig};
use thiserror::Error;
use url::Url;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("server.port must be between 1 and 65535")]
    ZeroPort,

    #[error("database.min_connections ({min}) exceeds database.max_connections ({max})")]
    PoolBounds { min: u32, max: u32 },

    #[error("database.max_connections ({value}) exceeds the limit of {limit}")]
    PoolTooLarge { value: u32, limit: u32 },

    #[error("database.url is not a usable PostgreSQL URL: {reason}")]
    DatabaseUrl { reason: String },

    #[error("{field} must be greater than zero")]
    MustBePositive { field: &'static str },

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.metrics_path '{0}' must start with '/'")]
    MetricsPath(String),
}

/// A configuration section that can check itself.
trait Validate {
    fn validate_into(&self, errors: &mut Vec<ConfigValidationError>);
}

fn require_positive(errors: &mut Vec<ConfigValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ConfigValidationError::MustBePositive { field });
    }
}

impl Validate for ServerConfig {
    fn validate_into(&self, errors: &mut Vec<ConfigValidationError>) {
        if self.port == 0 {
            errors.push(ConfigValidationError::ZeroPort);
        }
        require_positive(errors, "server.request_timeout_secs", self.request_timeout_secs);
    }
}

/// Largest pool a single instance may open.
const POOL_LIMIT: u32 = 1000;

fn check_database_url(raw: &str) -> Result<(), String> {
    if raw.trim().is_empty() {
        return Err("empty".to_string());
    }
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "postgres" | "postgresql" => Ok(()),
        other => Err(format!("scheme '{}' is not postgres", other)),
    }
}

impl Validate for DatabaseConfig {
    fn validate_into(&self, errors: &mut Vec<ConfigValidationError>) {
        if let Err(reason) = check_database_url(&self.url) {
            errors.push(ConfigValidationError::DatabaseUrl { reason });
        }

        if self.min_connections > self.max_connections {
            errors.push(ConfigValidationError::PoolBounds {
                min: self.min_connections,
                max: self.max_connections,
            });
        }
        if self.max_connections > POOL_LIMIT {
            errors.push(ConfigValidationError::PoolTooLarge {
                value: self.max_connections,
                limit: POOL_LIMIT,
            });
        }

        require_positive(errors, "database.connect_timeout_secs", self.connect_timeout_secs);
        require_positive(errors, "database.idle_timeout_secs", self.idle_timeout_secs);
    }
}

impl Validate for CacheConfig {
    // Checked even when the cache is disabled.
    fn validate_into(&self, errors: &mut Vec<ConfigValidationError>) {
        require_positive(errors, "cache.ttl_secs", self.ttl_secs);
        require_positive(errors, "cache.sweep_interval_secs", self.sweep_interval_secs);
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Validate for ObservabilityConfig {
    fn validate_into(&self, errors: &mut Vec<ConfigValidationError>) {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(ConfigValidationError::LogLevel(self.log_level.clone()));
        }
        if self.metrics_enabled && !self.metrics_path.starts_with('/') {
            errors.push(ConfigValidationError::MetricsPath(self.metrics_path.clone()));
        }
    }
}

/// Validates a loaded [`AppConfig`].
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks every section, returning all problems found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();
        config.server.validate_into(&mut errors);
        config.database.validate_into(&mut errors);
        config.cache.validate_into(&mut errors);
        config.observability.validate_into(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Renders a numbered list of problems for the startup error.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .fold(String::from("invalid configuration:"), |mut out, (i, e)| {
            out.push_str(&format!("\n  {}. {}", i + 1, e));
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_for(mutate: impl FnOnce(&mut AppConfig)) -> Vec<ConfigValidationError> {
        let mut config = AppConfig::default();
        mutate(&mut config);
        ConfigValidator::validate(&config).err().unwrap_or_default()
    }

    #[test]
    fn test_default_config_passes() {
        assert!(ConfigValidator::validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_database_url() {
        let errors = errors_for(|c| c.database.url = String::new());
        assert!(matches!(errors.as_slice(), [ConfigValidationError::DatabaseUrl { .. }]));
    }

    #[test]
    fn test_non_postgres_database_url() {
        let errors = errors_for(|c| c.database.url = "mysql://root@localhost/game".to_string());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("mysql"));
    }

    #[test]
    fn test_postgresql_scheme_accepted() {
        let errors = errors_for(|c| c.database.url = "postgresql://user:pw@db:5432/game".to_string());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_zero_cache_durations_rejected() {
        let errors = errors_for(|c| {
            c.cache.ttl_secs = 0;
            c.cache.sweep_interval_secs = 0;
        });
        assert_eq!(
            errors,
            vec![
                ConfigValidationError::MustBePositive { field: "cache.ttl_secs" },
                ConfigValidationError::MustBePositive { field: "cache.sweep_interval_secs" },
            ]
        );
    }

    #[test]
    fn test_disabled_cache_still_checked() {
        let errors = errors_for(|c| {
            c.cache.enabled = false;
            c.cache.ttl_secs = 0;
        });
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_pool_bounds() {
        let errors = errors_for(|c| {
            c.database.min_connections = 20;
            c.database.max_connections = 10;
        });
        assert_eq!(errors, vec![ConfigValidationError::PoolBounds { min: 20, max: 10 }]);

        let errors = errors_for(|c| c.database.max_connections = 5000);
        assert!(matches!(errors[0], ConfigValidationError::PoolTooLarge { value: 5000, .. }));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        assert!(errors_for(|c| c.observability.log_level = "DEBUG".to_string()).is_empty());

        let errors = errors_for(|c| c.observability.log_level = "verbose".to_string());
        assert_eq!(errors, vec![ConfigValidationError::LogLevel("verbose".to_string())]);
    }

    #[test]
    fn test_relative_metrics_path() {
        let errors = errors_for(|c| c.observability.metrics_path = "metrics".to_string());
        assert!(matches!(errors.as_slice(), [ConfigValidationError::MetricsPath(_)]));

        let ignored = errors_for(|c| {
            c.observability.metrics_enabled = false;
            c.observability.metrics_path = "metrics".to_string();
        });
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_all_problems_reported() {
        let errors = errors_for(|c| {
            c.server.port = 0;
            c.cache.ttl_secs = 0;
            c.database.url = String::new();
        });
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_format_validation_errors() {
        let output = format_validation_errors(&[
            ConfigValidationError::ZeroPort,
            ConfigValidationError::MustBePositive { field: "cache.ttl_secs" },
        ]);
        assert!(output.starts_with("invalid configuration:"));
        assert!(output.contains("1. server.port must be between 1 and 65535"));
        assert!(output.contains("2. cache.ttl_secs must be greater than zero"));
    }
}
