//! Caching infrastructure for the data-access core.
//!
//! A [`CacheLayer`] stores opaque bytes with a per-entry TTL. Two backends are
//! provided: Redis for shared deployments and an in-process map for
//! development and tests.

mod cache_layer;
pub mod cache_keys;
mod memory_cache;
mod redis_cache;

pub use cache_layer::{CacheExt, CacheLayer};
pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
