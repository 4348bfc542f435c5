//! Redis-based cache implementation.

use super::CacheLayer;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Pool, PoolConfig, Runtime};
use roster_config::RedisConfig;
use roster_core::{RosterError, RosterResult};
use std::time::Duration;
use tracing::{debug, info};

/// Redis-based cache.
///
/// Every transport or pool failure is reported as `Unavailable(Cache)`.
#[derive(Clone)]
pub struct RedisCache {
    /// Redis connection pool; `None` when caching is disabled.
    pool: Option<Pool>,
}

impl RedisCache {
    /// Creates a cache over an existing pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Builds a connection pool from configuration.
    ///
    /// No connection is opened until first use; call [`ping`](CacheLayer::ping)
    /// to check reachability.
    pub fn from_config(config: &RedisConfig) -> RosterResult<Self> {
        if !config.enabled {
            info!("Redis disabled by configuration, caching is off");
            return Ok(Self::disabled());
        }

        let mut cfg = Config::from_url(config.url.clone());
        cfg.pool = Some(PoolConfig::new(config.pool_size));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| RosterError::Configuration(format!("Invalid Redis configuration: {}", e)))?;

        info!(pool_size = config.pool_size, "Redis connection pool created");
        Ok(Self::new(pool))
    }

    /// Creates a cache that never holds anything.
    ///
    /// Gets miss, puts and deletes succeed, counters are unavailable.
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Returns true when backed by a real pool.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    /// Closes the pool; later calls fail as unavailable.
    pub fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close();
            info!("Redis connection pool closed");
        }
    }

    async fn get_conn(&self) -> RosterResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                RosterError::cache_unavailable(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(RosterError::cache_unavailable("Cache is disabled")),
        }
    }
}

#[async_trait]
impl CacheLayer for RedisCache {
    async fn get(&self, key: &str) -> RosterResult<Option<Vec<u8>>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(|e| {
            RosterError::cache_unavailable(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn put(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| {
                RosterError::cache_unavailable(format!("Failed to set key '{}': {}", key, e))
            })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            RosterError::cache_unavailable(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(())
    }

    async fn increment(&self, key: &str) -> RosterResult<i64> {
        let mut conn = self.get_conn().await?;
        conn.incr(key, 1_i64).await.map_err(|e| {
            RosterError::cache_unavailable(format!("Failed to increment key '{}': {}", key, e))
        })
    }

    async fn ping(&self) -> RosterResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        deadpool_redis::redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map_err(|e| RosterError::cache_unavailable(format!("PING failed: {}", e)))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        if self.is_enabled() {
            "redis"
        } else {
            "disabled"
        }
    }
}
