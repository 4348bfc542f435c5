//! Coordinator tuning.

use crate::InvalidationPolicy;
use roster_config::AppConfig;
use std::time::Duration;

/// Deadlines and cache behaviour for [`UserCoordinator`](crate::UserCoordinator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Lifetime of a cached record.
    pub ttl: Duration,
    /// Deadline for each store call; expiry is a `Timeout` error.
    pub store_timeout: Duration,
    /// Deadline for each cache call; expiry counts as unavailable.
    pub cache_timeout: Duration,
    /// Retry policy for post-write invalidation.
    pub invalidation: InvalidationPolicy,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_millis(500),
            invalidation: InvalidationPolicy::default(),
        }
    }
}

impl CoordinatorOptions {
    /// Derives options from application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ttl: config.cache.ttl(),
            store_timeout: config.database.statement_timeout(),
            cache_timeout: config.redis.operation_timeout(),
            invalidation: InvalidationPolicy::new(
                config.cache.invalidation_attempts,
                config.cache.invalidation_delay(),
            ),
        }
    }

    /// Replaces the cache TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replaces the invalidation policy.
    #[must_use]
    pub fn with_invalidation(mut self, invalidation: InvalidationPolicy) -> Self {
        self.invalidation = invalidation;
        self
    }
}
