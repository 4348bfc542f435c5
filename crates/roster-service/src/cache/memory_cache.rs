//! In-process cache backed by `moka`.

use super::CacheLayer;
use async_trait::async_trait;
use moka::{future::Cache, ops::compute::Op, Expiry};
use roster_core::{RosterError, RosterResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest lifetime an entry may be given; longer TTLs are clamped to it.
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Clone)]
struct Entry {
    value: Arc<[u8]>,
    /// `None` on a counter bump: keep whatever lifetime the key already had.
    ttl: Option<Duration>,
}

/// Reads each entry's own TTL. Counters created from nothing never expire.
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        remaining: Option<Duration>,
    ) -> Option<Duration> {
        entry.ttl.or(remaining)
    }
}

/// Cache held in process memory.
///
/// Expired entries are evicted by moka's housekeeping, not only when read.
/// Counters created by [`increment`](CacheLayer::increment) never expire.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, Entry>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self {
            entries: Cache::builder().expire_after(EntryTtl).build(),
        }
    }
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of entries; the least recently used go first.
    #[must_use]
    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_entries)
                .expire_after(EntryTtl)
                .build(),
        }
    }

    /// Entries currently held, after pending evictions have run.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

#[async_trait]
impl CacheLayer for MemoryCache {
    async fn get(&self, key: &str) -> RosterResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).await.map(|entry| entry.value.to_vec()))
    }

    async fn put(&self, key: &str, value: &[u8], ttl: Duration) -> RosterResult<()> {
        let entry = Entry {
            value: Arc::from(value),
            ttl: Some(ttl.min(MAX_ENTRY_TTL)),
        };
        self.entries.insert(key.to_owned(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> RosterResult<()> {
        self.entries.invalidate(key).await;
        Ok(())
    }

    async fn increment(&self, key: &str) -> RosterResult<i64> {
        let mut outcome = Ok(0);
        self.entries
            .entry(key.to_owned())
            .and_compute_with(|current| {
                let current = current
                    .map_or(Ok(0), |entry| parse_counter(key, &entry.into_value().value));
                outcome = current.and_then(|n| {
                    n.checked_add(1).ok_or_else(|| {
                        RosterError::invalid_input(format!("counter '{}' overflowed", key))
                    })
                });
                let op = match &outcome {
                    Ok(next) => Op::Put(Entry {
                        value: Arc::from(next.to_string().into_bytes()),
                        ttl: None,
                    }),
                    Err(_) => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        outcome
    }

    async fn ping(&self) -> RosterResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn parse_counter(key: &str, raw: &[u8]) -> RosterResult<i64> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| RosterError::invalid_input(format!("value at '{}' is not an integer", key)))
}
