//! # Roster Service
//!
//! The data-access core: a TTL cache layer in front of the record store,
//! composed by [`UserCoordinator`] behind the [`UserRepository`] contract.
//!
//! Reads are cache-aside; writes go to the store and then invalidate the
//! cached entry. Cache failures never fail a request.

pub mod cache;
pub mod coordinator;
pub mod metrics;
pub mod options;
pub mod repository;
pub mod resilience;

pub use cache::*;
pub use coordinator::UserCoordinator;
pub use options::CoordinatorOptions;
pub use repository::*;
pub use resilience::{with_timeout, InvalidationPolicy};
