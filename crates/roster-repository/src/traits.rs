//! Record store contract.

use async_trait::async_trait;
use roster_core::{ListRequest, RosterResult, User, UserFields, UserId};

/// Durable storage of user records.
///
/// Every mutation is a single atomic statement. Identities are assigned on
/// create and never reused; `updated_at` is always set by the store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches a record, or `NotFound`.
    async fn get(&self, id: UserId) -> RosterResult<User>;

    /// Returns a window of records ordered by identity ascending.
    ///
    /// An offset past the end yields an empty vector.
    async fn list(&self, request: ListRequest) -> RosterResult<Vec<User>>;

    /// Inserts a record. Duplicate username or email yields `Conflict`.
    async fn create(&self, fields: &UserFields) -> RosterResult<User>;

    /// Replaces username and email. Yields `NotFound` or `Conflict`.
    async fn update(&self, id: UserId, fields: &UserFields) -> RosterResult<User>;

    /// Removes a record, or `NotFound` if nothing was deleted.
    async fn delete(&self, id: UserId) -> RosterResult<()>;

    /// Returns the total number of records.
    async fn count(&self) -> RosterResult<u64>;

    /// Checks that the store is reachable.
    async fn health_check(&self) -> RosterResult<()>;
}
