//! Test doubles for coordinator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use roster_core::{Email, ListRequest, RosterError, RosterResult, User, UserFields, UserId};
use roster_repository::{MemoryUserStore, RecordStore};
use roster_service::{CacheLayer, CoordinatorOptions, MemoryCache, UserCoordinator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn fields(username: &str, email: &str) -> UserFields {
    UserFields::new(username, Email::parse(email).expect("valid email"))
}

/// Record store that counts calls before delegating to an in-memory store.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryUserStore,
    gets: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingStore {
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for CountingStore {
    async fn get(&self, id: UserId) -> RosterResult<User> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn list(&self, request: ListRequest) -> RosterResult<Vec<User>> {
        self.inner.list(request).await
    }

    async fn create(&self, fields: &UserFields) -> RosterResult<User> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.create(fields).await
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> RosterResult<User> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, fields).await
    }

    async fn delete(&self, id: UserId) -> RosterResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    async fn count(&self) -> RosterResult<u64> {
        self.inner.count().await
    }

    async fn health_check(&self) -> RosterResult<()> {
        Ok(())
    }
}

/// Cache whose every operation fails as unavailable.
#[derive(Default)]
pub struct UnavailableCache {
    calls: AtomicUsize,
}

impl UnavailableCache {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> RosterResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RosterError::cache_unavailable("connection refused"))
    }
}

#[async_trait]
impl CacheLayer for UnavailableCache {
    async fn get(&self, _key: &str) -> RosterResult<Option<Vec<u8>>> {
        self.fail()
    }

    async fn put(&self, _key: &str, _value: &[u8], _ttl: Duration) -> RosterResult<()> {
        self.fail()
    }

    async fn delete(&self, _key: &str) -> RosterResult<()> {
        self.fail()
    }

    async fn increment(&self, _key: &str) -> RosterResult<i64> {
        self.fail()
    }

    async fn ping(&self) -> RosterResult<()> {
        self.fail()
    }

    fn backend_name(&self) -> &'static str {
        "unavailable"
    }
}

/// Memory cache that records every write and can fail deletes on demand.
#[derive(Default)]
pub struct RecordingCache {
    pub inner: MemoryCache,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    failing_deletes: AtomicUsize,
}

impl RecordingCache {
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    /// Makes the next `n` deletes fail as unavailable.
    pub fn fail_next_deletes(&self, n: usize) {
        self.failing_deletes.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheLayer for RecordingCache {
    async fn get(&self, key: &str) -> RosterResult<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> RosterResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_deletes.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_deletes.store(failing - 1, Ordering::SeqCst);
            return Err(RosterError::cache_unavailable("delete refused"));
        }
        self.inner.delete(key).await
    }

    async fn increment(&self, key: &str) -> RosterResult<i64> {
        self.inner.increment(key).await
    }

    async fn ping(&self) -> RosterResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl RecordStore for Store {
        async fn get(&self, id: UserId) -> RosterResult<User>;
        async fn list(&self, request: ListRequest) -> RosterResult<Vec<User>>;
        async fn create(&self, fields: &UserFields) -> RosterResult<User>;
        async fn update(&self, id: UserId, fields: &UserFields) -> RosterResult<User>;
        async fn delete(&self, id: UserId) -> RosterResult<()>;
        async fn count(&self) -> RosterResult<u64>;
        async fn health_check(&self) -> RosterResult<()>;
    }
}

pub fn coordinator(
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn CacheLayer>,
) -> UserCoordinator {
    UserCoordinator::new(store, cache, CoordinatorOptions::default())
}

/// Store whose every call sleeps before answering from memory.
pub struct SlowStore {
    inner: MemoryUserStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryUserStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl RecordStore for SlowStore {
    async fn get(&self, id: UserId) -> RosterResult<User> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(id).await
    }

    async fn list(&self, request: ListRequest) -> RosterResult<Vec<User>> {
        tokio::time::sleep(self.delay).await;
        self.inner.list(request).await
    }

    async fn create(&self, fields: &UserFields) -> RosterResult<User> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(fields).await
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> RosterResult<User> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(id, fields).await
    }

    async fn delete(&self, id: UserId) -> RosterResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(id).await
    }

    async fn count(&self) -> RosterResult<u64> {
        tokio::time::sleep(self.delay).await;
        self.inner.count().await
    }

    async fn health_check(&self) -> RosterResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Cache whose every call sleeps before answering from memory.
pub struct SlowCache {
    inner: MemoryCache,
    delay: Duration,
}

impl SlowCache {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryCache::new(),
            delay,
        }
    }
}

#[async_trait]
impl CacheLayer for SlowCache {
    async fn get(&self, key: &str) -> RosterResult<Option<Vec<u8>>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.put(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> RosterResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(key).await
    }

    async fn increment(&self, key: &str) -> RosterResult<i64> {
        tokio::time::sleep(self.delay).await;
        self.inner.increment(key).await
    }

    async fn ping(&self) -> RosterResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "slow"
    }
}
