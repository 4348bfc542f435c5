//! User record.

use super::super::value_objects::Email;
use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record as persisted by the record store.
///
/// `id`, `created_at` and `updated_at` are assigned by the store; callers
/// never construct them. This is also the exact field set written to the
/// cache, so adding a field here changes the cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identity, immutable.
    pub id: UserId,

    /// Unique username.
    pub username: String,

    /// Unique email address.
    pub email: Email,

    /// Set once on insert.
    pub created_at: DateTime<Utc>,

    /// Set by the store on every mutation.
    pub updated_at: DateTime<Utc>,
}

/// The caller-supplied fields of a user record, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub username: String,
    pub email: Email,
}

impl UserFields {
    /// Creates a new field set.
    #[must_use]
    pub fn new(username: impl Into<String>, email: Email) -> Self {
        Self {
            username: username.into(),
            email,
        }
    }
}
