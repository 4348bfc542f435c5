//! Integration tests for `PgUserStore`.
//!
//! These tests run against a real PostgreSQL database using testcontainers.
//! Requires Docker to be available on the system.

mod common;

use common::TestDatabase;
use roster_core::{Email, ErrorKind, ListRequest, UserFields, UserId};
use roster_repository::{PgUserStore, RecordStore};

fn fields(username: &str, email: &str) -> UserFields {
    UserFields::new(username, Email::parse(email).expect("valid email"))
}

#[tokio::test]
async fn test_create_and_get() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    let created = store
        .create(&fields("alice", "alice@example.com"))
        .await
        .expect("Failed to create user");
    assert_eq!(created.username, "alice");
    assert_eq!(created.created_at, created.updated_at);

    let found = store.get(created.id).await.expect("Failed to get user");
    assert_eq!(found, created);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    let err = store.get(UserId::new(4242)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    store
        .create(&fields("alice", "alice@example.com"))
        .await
        .expect("Failed to create user");
    let err = store
        .create(&fields("alice", "other@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    store
        .create(&fields("alice", "alice@example.com"))
        .await
        .expect("Failed to create user");
    let err = store
        .create(&fields("bob", "alice@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_list_pages_in_identity_order() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    for i in 1..=5 {
        store
            .create(&fields(&format!("user{i}"), &format!("user{i}@example.com")))
            .await
            .expect("Failed to create user");
    }

    let first = store.list(ListRequest::new(2, 0)).await.unwrap();
    let second = store.list(ListRequest::new(2, 2)).await.unwrap();
    let past_end = store.list(ListRequest::new(2, 50)).await.unwrap();

    let names = |users: &[roster_core::User]| {
        users.iter().map(|u| u.username.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&first), ["user1", "user2"]);
    assert_eq!(names(&second), ["user3", "user4"]);
    assert!(past_end.is_empty());
    assert_eq!(store.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_update_sets_updated_at_only() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    let created = store
        .create(&fields("alice", "alice@example.com"))
        .await
        .expect("Failed to create user");
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let updated = store
        .update(created.id, &fields("alicia", "alicia@example.com"))
        .await
        .expect("Failed to update user");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.username, "alicia");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    let err = store
        .update(UserId::new(99), &fields("ghost", "ghost@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_and_identity_not_reused() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    let first = store
        .create(&fields("alice", "alice@example.com"))
        .await
        .expect("Failed to create user");
    store.delete(first.id).await.expect("Failed to delete user");

    assert!(store.get(first.id).await.unwrap_err().is_not_found());
    assert!(store.delete(first.id).await.unwrap_err().is_not_found());

    let second = store
        .create(&fields("alice", "alice@example.com"))
        .await
        .expect("Failed to recreate user");
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_health_check() {
    let db = TestDatabase::new().await;
    let store = PgUserStore::new(db.pool());

    store.health_check().await.expect("Health check failed");

    db.pool().close().await;
    assert!(store.health_check().await.is_err());
}
