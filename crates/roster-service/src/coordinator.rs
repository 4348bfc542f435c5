//! Data-access coordinator.
//!
//! ```text
//! get_user:    cache ──hit──> return
//!                │ miss / unavailable / undecodable
//!                └──> store ──ok──> populate cache (best effort) ──> return
//!
//! create/update/delete: store ──ok──> invalidate cache (best effort) ──> return
//! ```

use crate::cache::{cache_keys, CacheExt, CacheLayer};
use crate::metrics::{CacheMetrics, CacheOperation};
use crate::{with_timeout, CoordinatorOptions, HealthReport, UserRepository};
use async_trait::async_trait;
use roster_core::{
    ErrorKind, HealthCheck, HealthStatus, ListRequest, RosterError, RosterResult, User,
    UserFields, UserId,
};
use roster_repository::RecordStore;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Composes a [`RecordStore`] and a [`CacheLayer`] behind [`UserRepository`].
///
/// Holds no mutable state of its own; share it behind an `Arc`.
pub struct UserCoordinator {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn CacheLayer>,
    options: CoordinatorOptions,
}

impl UserCoordinator {
    /// Creates a coordinator over the given backends.
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn CacheLayer>,
        options: CoordinatorOptions,
    ) -> Self {
        Self {
            store,
            cache,
            options,
        }
    }

    /// Returns the coordinator options.
    #[must_use]
    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    /// Runs a store call under the store deadline and tags failures.
    async fn store_call<T, Fut>(
        &self,
        operation: &'static str,
        target: impl Display,
        call: Fut,
    ) -> RosterResult<T>
    where
        Fut: Future<Output = RosterResult<T>>,
    {
        with_timeout(self.options.store_timeout, || call)
            .await
            .map_err(|e| {
                if matches!(
                    e.kind(),
                    ErrorKind::Unavailable(_) | ErrorKind::Timeout | ErrorKind::Internal
                ) {
                    CacheMetrics::store_error(operation);
                }
                e.context(operation, target)
            })
    }

    /// Runs a cache call under the cache deadline; expiry counts as unavailable.
    async fn cache_call<T, Fut>(&self, call: Fut) -> RosterResult<T>
    where
        Fut: Future<Output = RosterResult<T>>,
    {
        with_timeout(self.options.cache_timeout, || call)
            .await
            .map_err(|e| match e {
                RosterError::Timeout(message) => RosterError::cache_unavailable(message),
                other => other,
            })
    }

    /// Looks up a cached record. Every failure degrades to a miss.
    async fn cached(&self, key: &str) -> Option<User> {
        match self.cache_call(self.cache.get_json::<User>(key)).await {
            Ok(Some(user)) => {
                CacheMetrics::hit();
                debug!("Cache hit for '{}'", key);
                Some(user)
            }
            Ok(None) => {
                CacheMetrics::miss();
                debug!("Cache miss for '{}'", key);
                None
            }
            Err(e) if e.kind() == ErrorKind::Internal => {
                CacheMetrics::error(CacheOperation::Decode);
                CacheMetrics::miss();
                warn!("Discarding undecodable cache entry '{}': {}", key, e);
                None
            }
            Err(e) => {
                CacheMetrics::error(CacheOperation::Get);
                CacheMetrics::miss();
                warn!("Cache lookup for '{}' failed, reading from store: {}", key, e);
                None
            }
        }
    }

    /// Stores a record read from the store. Failure is logged, not returned.
    async fn populate(&self, key: &str, user: &User) {
        let ttl = self.options.ttl;
        if let Err(e) = self.cache_call(self.cache.put_json(key, user, ttl)).await {
            CacheMetrics::error(CacheOperation::Populate);
            warn!("Failed to populate cache entry '{}': {}", key, e);
        }
    }

    /// Removes the cache entry for `id` after a successful write.
    ///
    /// Failure is logged and counted; the write has already committed.
    async fn invalidate(&self, operation: &'static str, id: UserId) {
        let key = cache_keys::user_by_id(id);
        let result = self
            .options
            .invalidation
            .execute(|| self.cache_call(self.cache.delete(&key)))
            .await;

        match result {
            Ok(()) => debug!("Invalidated '{}' after {}", key, operation),
            Err(e) => {
                CacheMetrics::error(CacheOperation::Invalidate);
                warn!(
                    operation,
                    user_id = %id,
                    "Cache invalidation failed, entry may be stale until TTL expiry: {}",
                    e
                );
            }
        }
    }
}

#[async_trait]
impl UserRepository for UserCoordinator {
    async fn get_user(&self, id: UserId) -> RosterResult<User> {
        debug!("Getting user: {}", id);

        let key = cache_keys::user_by_id(id);
        if let Some(user) = self.cached(&key).await {
            return Ok(user);
        }

        let user = self.store_call("get_user", id, self.store.get(id)).await?;
        self.populate(&key, &user).await;
        Ok(user)
    }

    async fn get_user_fresh(&self, id: UserId) -> RosterResult<User> {
        debug!("Getting user from store: {}", id);
        self.store_call("get_user", id, self.store.get(id)).await
    }

    async fn list_users(&self, request: ListRequest) -> RosterResult<Vec<User>> {
        debug!(
            "Listing users, limit: {}, offset: {}",
            request.limit, request.offset
        );

        self.store_call(
            "list_users",
            format!("limit={} offset={}", request.limit, request.offset),
            self.store.list(request),
        )
        .await
    }

    async fn create_user(&self, fields: UserFields) -> RosterResult<User> {
        debug!("Creating user: {}", fields.username);

        let user = self
            .store_call("create_user", &fields.username, self.store.create(&fields))
            .await?;
        self.invalidate("create_user", user.id).await;

        info!("User created: {}", user.id);
        Ok(user)
    }

    async fn update_user(&self, id: UserId, fields: UserFields) -> RosterResult<User> {
        debug!("Updating user: {}", id);

        let user = self
            .store_call("update_user", id, self.store.update(id, &fields))
            .await?;
        self.invalidate("update_user", id).await;

        info!("User updated: {}", id);
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> RosterResult<()> {
        debug!("Deleting user: {}", id);

        self.store_call("delete_user", id, self.store.delete(id))
            .await?;
        self.invalidate("delete_user", id).await;

        info!("User deleted: {}", id);
        Ok(())
    }

    async fn count_users(&self) -> RosterResult<u64> {
        self.store_call("count_users", "all", self.store.count())
            .await
    }

    async fn health(&self) -> HealthReport {
        let store = match self
            .store_call("health_check", "store", self.store.health_check())
            .await
        {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        };

        let cache = match self.cache_call(self.cache.ping()).await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!(
                "{} cache: {}",
                self.cache.backend_name(),
                e
            )),
        };

        HealthReport::new(store, cache)
    }
}

#[async_trait]
impl HealthCheck for UserCoordinator {
    fn name(&self) -> &str {
        "users"
    }

    async fn check(&self) -> HealthStatus {
        self.health().await.status
    }
}
