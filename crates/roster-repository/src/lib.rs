//! # Roster Repository
//!
//! Durable storage of user records.
//!
//! ```text
//! Coordinator
//!   ↓  Arc<dyn RecordStore>
//! PgUserStore          MemoryUserStore
//!   ↓
//! DatabasePool (sqlx / Postgres)
//! ```
//!
//! The store owns identity assignment and both timestamps; callers only ever
//! hand it a [`UserFields`](roster_core::UserFields).

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::MemoryUserStore;
pub use pool::*;
pub use postgres::*;
pub use traits::*;
