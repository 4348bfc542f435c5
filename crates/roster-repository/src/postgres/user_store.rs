//! PostgreSQL user store implementation.

use crate::{DatabasePool, RecordStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::{Email, ListRequest, RosterError, RosterResult, User, UserFields, UserId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const USER_COLUMNS: &str = "id, username, email, created_at, updated_at";

/// PostgreSQL user store implementation.
#[derive(Clone)]
pub struct PgUserStore {
    pool: Arc<DatabasePool>,
}

impl PgUserStore {
    /// Creates a new PostgreSQL user store.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: Email::from_trusted(row.email),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl RecordStore for PgUserStore {
    async fn get(&self, id: UserId) -> RosterResult<User> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::from)
            .ok_or_else(|| RosterError::not_found("User", id))
    }

    async fn list(&self, request: ListRequest) -> RosterResult<Vec<User>> {
        debug!(
            "Listing users, limit: {}, offset: {}",
            request.limit, request.offset
        );

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(request.limit_i64())
        .bind(request.offset_i64())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create(&self, fields: &UserFields) -> RosterResult<User> {
        debug!("Creating user: {}", fields.username);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        ))
        .bind(&fields.username)
        .bind(fields.email.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> RosterResult<User> {
        debug!("Updating user: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET username = $2, email = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id.get())
        .bind(&fields.username)
        .bind(fields.email.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::from)
            .ok_or_else(|| RosterError::not_found("User", id))
    }

    async fn delete(&self, id: UserId) -> RosterResult<()> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.get())
            .execute(self.pool.inner())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RosterError::not_found("User", id));
        }
        Ok(())
    }

    async fn count(&self) -> RosterResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn health_check(&self) -> RosterResult<()> {
        self.pool.health_check().await
    }
}
