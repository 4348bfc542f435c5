//! Cache layer trait for abstracted caching operations.

use async_trait::async_trait;
use roster_core::RosterResult;
use std::time::Duration;

/// Key-value store with a per-entry TTL, used as a side cache.
///
/// Values are opaque bytes. A missing or expired key is `Ok(None)`; a
/// transport failure is `Err` with kind `Unavailable(Cache)`. The two must
/// never be conflated.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get(&self, key: &str) -> RosterResult<Option<Vec<u8>>>;

    /// Store a value with a TTL, replacing any previous value.
    async fn put(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()>;

    /// Delete a value. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> RosterResult<()>;

    /// Atomically increment an integer counter and return its new value.
    async fn increment(&self, key: &str) -> RosterResult<i64>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> RosterResult<()>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}

/// Extension trait with typed JSON methods.
///
/// Encoding or decoding failures surface as `Internal`, distinct from the
/// `Unavailable` errors of the underlying layer.
#[async_trait]
pub trait CacheExt: CacheLayer {
    /// Get a typed value from the cache.
    async fn get_json<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> RosterResult<Option<T>> {
        match self.get(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn put_json<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> RosterResult<()> {
        let bytes = serde_json::to_vec(value)?;
        self.put(key, &bytes, ttl).await
    }
}

impl<T: CacheLayer + ?Sized> CacheExt for T {}
