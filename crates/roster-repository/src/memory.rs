//! In-process record store.
//!
//! Mirrors the Postgres store's observable behaviour (monotonic identities,
//! uniqueness conflicts, store-assigned timestamps) without a database. Used
//! as a test double by the service and HTTP adapter suites.

use crate::RecordStore;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use roster_core::{ListRequest, RosterError, RosterResult, User, UserFields, UserId};
use std::collections::BTreeMap;

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, User>,
    last_id: i64,
}

impl State {
    fn check_unique(&self, fields: &UserFields, except: Option<UserId>) -> RosterResult<()> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.username == fields.username {
                return Err(RosterError::conflict(format!(
                    "username '{}' is already taken",
                    fields.username
                )));
            }
            if user.email == fields.email {
                return Err(RosterError::conflict(format!(
                    "email '{}' is already registered",
                    fields.email
                )));
            }
        }
        Ok(())
    }
}

fn check_fields(fields: &UserFields) -> RosterResult<()> {
    if fields.username.trim().is_empty() {
        return Err(RosterError::invalid_input("username must not be empty"));
    }
    Ok(())
}

/// In-memory user store.
#[derive(Default)]
pub struct MemoryUserStore {
    state: Mutex<State>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryUserStore {
    async fn get(&self, id: UserId) -> RosterResult<User> {
        self.state
            .lock()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| RosterError::not_found("User", id))
    }

    async fn list(&self, request: ListRequest) -> RosterResult<Vec<User>> {
        Ok(self
            .state
            .lock()
            .users
            .values()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect())
    }

    async fn create(&self, fields: &UserFields) -> RosterResult<User> {
        check_fields(fields)?;

        let mut state = self.state.lock();
        state.check_unique(fields, None)?;

        state.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: UserId::new(state.last_id),
            username: fields.username.clone(),
            email: fields.email.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> RosterResult<User> {
        check_fields(fields)?;

        let mut state = self.state.lock();
        if !state.users.contains_key(&id) {
            return Err(RosterError::not_found("User", id));
        }
        state.check_unique(fields, Some(id))?;

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| RosterError::not_found("User", id))?;
        user.username.clone_from(&fields.username);
        user.email = fields.email.clone();
        user.updated_at = Utc::now().max(user.updated_at);
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> RosterResult<()> {
        self.state
            .lock()
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RosterError::not_found("User", id))
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.state.lock().users.len() as u64)
    }

    async fn health_check(&self) -> RosterResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{Email, ErrorKind};

    fn fields(username: &str, email: &str) -> UserFields {
        UserFields::new(username, Email::parse(email).unwrap())
    }

    async fn seeded(n: usize) -> MemoryUserStore {
        let store = MemoryUserStore::new();
        for i in 1..=n {
            store
                .create(&fields(&format!("user{i}"), &format!("user{i}@example.com")))
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_create_assigns_identity_and_timestamps() {
        let store = MemoryUserStore::new();
        let user = store.create(&fields("alice", "alice@example.com")).await.unwrap();

        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(store.get(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = seeded(1).await;
        let err = store
            .create(&fields("user1", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = seeded(1).await;
        let err = store
            .create(&fields("someone", "user1@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_blank_username_is_invalid() {
        let store = MemoryUserStore::new();
        let err = store.create(&fields("  ", "a@example.com")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_windowed() {
        let store = seeded(5).await;

        let first: Vec<i64> = store
            .list(ListRequest::new(2, 0))
            .await
            .unwrap()
            .iter()
            .map(|u| u.id.get())
            .collect();
        let second: Vec<i64> = store
            .list(ListRequest::new(2, 2))
            .await
            .unwrap()
            .iter()
            .map(|u| u.id.get())
            .collect();

        assert_eq!(first, [1, 2]);
        assert_eq!(second, [3, 4]);
        assert!(store.list(ListRequest::new(2, 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = seeded(1).await;
        let before = store.get(UserId::new(1)).await.unwrap();

        let after = store
            .update(UserId::new(1), &fields("renamed", "renamed@example.com"))
            .await
            .unwrap();

        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.username, "renamed");
    }

    #[tokio::test]
    async fn test_update_to_own_values_is_not_a_conflict() {
        let store = seeded(1).await;
        assert!(store
            .update(UserId::new(1), &fields("user1", "user1@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryUserStore::new();
        let err = store
            .update(UserId::new(9), &fields("ghost", "ghost@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_identities_are_never_reused() {
        let store = seeded(2).await;
        store.delete(UserId::new(2)).await.unwrap();

        let next = store.create(&fields("carol", "carol@example.com")).await.unwrap();
        assert_eq!(next.id, UserId::new(3));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryUserStore::new();
        assert!(store.delete(UserId::new(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_count() {
        let store = seeded(3).await;
        assert_eq!(store.count().await.unwrap(), 3);
    }
}
