//! PostgreSQL record store.

mod user_store;

pub use user_store::PgUserStore;
