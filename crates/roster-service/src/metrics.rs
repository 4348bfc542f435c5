//! Prometheus metrics for the data-access core.
//!
//! Cache failures are tolerated, so these counters are the only way an
//! operator can tell a degraded cache from a healthy one.

use metrics::{counter, describe_counter};

/// Metric names.
pub mod names {
    /// Reads served from the cache.
    pub const CACHE_HITS_TOTAL: &str = "roster_cache_hits_total";
    /// Reads that fell through to the store.
    pub const CACHE_MISSES_TOTAL: &str = "roster_cache_misses_total";
    /// Tolerated cache failures, labelled by `operation`.
    pub const CACHE_ERRORS_TOTAL: &str = "roster_cache_errors_total";
    /// Store failures surfaced to callers, labelled by `operation`.
    pub const STORE_ERRORS_TOTAL: &str = "roster_store_errors_total";
}

/// Cache operations that can fail without failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOperation {
    /// Lookup before a read.
    Get,
    /// Refill after a read miss.
    Populate,
    /// Delete after a write.
    Invalidate,
    /// Cached bytes that did not decode as a record.
    Decode,
}

impl CacheOperation {
    /// Label value used on the error counter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Populate => "populate",
            Self::Invalidate => "invalidate",
            Self::Decode => "decode",
        }
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of record reads served from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of record reads that fell through to the store"
    );
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of tolerated cache failures"
    );
    describe_counter!(
        names::STORE_ERRORS_TOTAL,
        "Total number of store failures surfaced to callers"
    );
}

/// Data-access metrics recorder.
#[derive(Clone, Copy)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a cache hit.
    pub fn hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    /// Record a cache miss.
    pub fn miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record a tolerated cache failure.
    pub fn error(operation: CacheOperation) {
        counter!(names::CACHE_ERRORS_TOTAL, "operation" => operation.as_str()).increment(1);
    }

    /// Record a store failure.
    pub fn store_error(operation: &'static str) {
        counter!(names::STORE_ERRORS_TOTAL, "operation" => operation).increment(1);
    }
}
