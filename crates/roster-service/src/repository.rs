//! The repository contract callers program against.

use async_trait::async_trait;
use roster_core::{HealthStatus, ListRequest, RosterResult, User, UserFields, UserId};
use serde::Serialize;

/// User CRUD with a cache in front of the store.
///
/// Inputs are assumed to be validated. Every error carries the operation
/// name and the identity (or username) it failed for.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetches a user, from cache when possible.
    async fn get_user(&self, id: UserId) -> RosterResult<User>;

    /// Fetches a user from the store, bypassing the cache.
    ///
    /// Read-modify-write callers use this so a stale cache entry is never
    /// written back.
    async fn get_user_fresh(&self, id: UserId) -> RosterResult<User>;

    /// Lists users in identity order. Never cached.
    async fn list_users(&self, request: ListRequest) -> RosterResult<Vec<User>>;

    /// Creates a user.
    async fn create_user(&self, fields: UserFields) -> RosterResult<User>;

    /// Replaces a user's username and email.
    async fn update_user(&self, id: UserId, fields: UserFields) -> RosterResult<User>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> RosterResult<()>;

    /// Total number of users. Never cached.
    async fn count_users(&self) -> RosterResult<u64>;

    /// Reports the state of both backends.
    async fn health(&self) -> HealthReport;
}

/// Combined backend health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Overall status: unhealthy if the store is, degraded if only the cache is.
    pub status: HealthStatus,
    /// Record store status.
    pub store: HealthStatus,
    /// Cache status.
    pub cache: HealthStatus,
}

impl HealthReport {
    /// Combines per-backend statuses.
    #[must_use]
    pub fn new(store: HealthStatus, cache: HealthStatus) -> Self {
        let status = match (&store, &cache) {
            (HealthStatus::Unhealthy(reason), _) => HealthStatus::Unhealthy(reason.clone()),
            (_, HealthStatus::Unhealthy(reason) | HealthStatus::Degraded(reason)) => {
                HealthStatus::Degraded(reason.clone())
            }
            (HealthStatus::Degraded(reason), HealthStatus::Healthy) => {
                HealthStatus::Degraded(reason.clone())
            }
            (HealthStatus::Healthy, HealthStatus::Healthy) => HealthStatus::Healthy,
        };

        Self { status, store, cache }
    }
}
