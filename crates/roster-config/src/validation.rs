//! Configuration validation module.
//!
//! Collects every problem in a configuration instead of stopping at the
//! first one, so a broken deployment reports all of them at startup.

use crate::{AppConfig, CacheBackend};
use std::fmt;
use url::Url;

/// Upper bound on `cache.ttl_secs`: thirty days.
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL is empty or malformed.
    InvalidUrl { url_type: String, message: String },
    /// A duration that must be positive is zero.
    NonPositiveTimeout { name: String },
    /// Cache TTL must be at least one second.
    ZeroTtl,
    /// Cache TTL is longer than [`MAX_CACHE_TTL_SECS`].
    TtlTooLarge { value: u64 },
    /// At least one invalidation attempt is required.
    ZeroInvalidationAttempts,
    /// The Redis backend was selected while Redis is disabled.
    RedisBackendDisabled,
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Metrics path must be absolute.
    InvalidMetricsPath { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name } => {
                write!(f, "Timeout '{}' must be positive", name)
            }
            Self::ZeroTtl => write!(f, "cache.ttl_secs must be at least 1"),
            Self::TtlTooLarge { value } => write!(
                f,
                "cache.ttl_secs is {} but may be at most {}",
                value, MAX_CACHE_TTL_SECS
            ),
            Self::ZeroInvalidationAttempts => {
                write!(f, "cache.invalidation_attempts must be at least 1")
            }
            Self::RedisBackendDisabled => {
                write!(f, "cache.backend is 'redis' but redis.enabled is false")
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidMetricsPath { value } => {
                write!(f, "Metrics path must start with '/': '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(config, &mut errors);
        Self::validate_database(config, &mut errors);
        Self::validate_cache(config, &mut errors);
        Self::validate_observability(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let server = &config.server;
        if server.port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: server.port,
            });
        }
        if server.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
            });
        }
    }

    fn validate_database(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let database = &config.database;

        if database.url.trim().is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else {
            match Url::parse(&database.url) {
                Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => {}
                Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: format!("unsupported scheme '{}'", url.scheme()),
                }),
                Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: e.to_string(),
                }),
            }
        }

        if database.min_connections > database.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: database.min_connections,
                max: database.max_connections,
            });
        }
        if database.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: database.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
        if database.acquire_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.acquire_timeout_secs".to_string(),
            });
        }
        if database.statement_timeout_ms == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.statement_timeout_ms".to_string(),
            });
        }
    }

    fn validate_cache(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let cache = &config.cache;

        if cache.ttl_secs == 0 {
            errors.push(ConfigValidationError::ZeroTtl);
        } else if cache.ttl_secs > MAX_CACHE_TTL_SECS {
            errors.push(ConfigValidationError::TtlTooLarge {
                value: cache.ttl_secs,
            });
        }
        if cache.invalidation_attempts == 0 {
            errors.push(ConfigValidationError::ZeroInvalidationAttempts);
        }

        if cache.backend != CacheBackend::Redis {
            return;
        }
        if !config.redis.enabled {
            errors.push(ConfigValidationError::RedisBackendDisabled);
            return;
        }
        match Url::parse(&config.redis.url) {
            Ok(url) if matches!(url.scheme(), "redis" | "rediss") => {}
            _ => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            }),
        }
        if config.redis.operation_timeout_ms == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "redis.operation_timeout_ms".to_string(),
            });
        }
    }

    fn validate_observability(config: &AppConfig, errors: &mut Vec<ConfigValidationError>) {
        let observability = &config.observability;

        let level = observability.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: observability.log_level.clone(),
            });
        }
        if observability.metrics_enabled && !observability.metrics_path.starts_with('/') {
            errors.push(ConfigValidationError::InvalidMetricsPath {
                value: observability.metrics_path.clone(),
            });
        }
    }
}

/// Formats validation errors into a single message.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
