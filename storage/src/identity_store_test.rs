//! Unit tests for IdentityStore.
//!
//! Covers first-insert, username reconciliation, and the sync policies.

use tempfile::TempDir;

use crate::history_store::HistoryStore;
use crate::identity_store::IdentitySyncPolicy;
use crate::models::IdentitySnapshot;

async fn open_store() -> (TempDir, HistoryStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("chronicle.db");
    let store = HistoryStore::connect(path.to_str().expect("utf-8 path"))
        .await
        .expect("Failed to connect store");
    (dir, store)
}

fn snapshot(user_id: i64, username: Option<&str>) -> IdentitySnapshot {
    IdentitySnapshot {
        user_id,
        username: username.map(|u| u.to_string()),
        full_name: None,
        first_name: None,
        last_name: None,
    }
}

#[tokio::test]
async fn test_upsert_creates_user_on_first_sight() {
    let (_dir, store) = open_store().await;
    let identity = store.identity();

    let mut snap = snapshot(42, Some("alice"));
    snap.first_name = Some("Alice".to_string());

    let user = identity.upsert(&snap).await.expect("Failed to upsert");
    assert_eq!(user.user_id, 42);
    assert_eq!(user.username.as_deref(), Some("alice"));
    assert_eq!(user.first_name.as_deref(), Some("Alice"));

    let stored = identity
        .find_by_user_id(42)
        .await
        .expect("Failed to query")
        .expect("User should exist");
    assert_eq!(stored.username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_upsert_overwrites_changed_username_without_duplicating() {
    let (_dir, store) = open_store().await;
    let identity = store.identity();

    identity
        .upsert(&snapshot(7, Some("old_name")))
        .await
        .expect("Failed to upsert");
    let updated = identity
        .upsert(&snapshot(7, Some("new_name")))
        .await
        .expect("Failed to upsert");
    assert_eq!(updated.username.as_deref(), Some("new_name"));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE user_id = 7")
        .fetch_one(store.pool_manager().pool())
        .await
        .expect("Failed to count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_upsert_keeps_username_when_snapshot_has_none() {
    let (_dir, store) = open_store().await;
    let identity = store.identity();

    identity
        .upsert(&snapshot(9, Some("kept")))
        .await
        .expect("Failed to upsert");
    let after_none = identity
        .upsert(&snapshot(9, None))
        .await
        .expect("Failed to upsert");
    assert_eq!(after_none.username.as_deref(), Some("kept"));

    let after_empty = identity
        .upsert(&snapshot(9, Some("")))
        .await
        .expect("Failed to upsert");
    assert_eq!(after_empty.username.as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_username_only_policy_freezes_name_fields() {
    let (_dir, store) = open_store().await;
    let identity = store.identity();

    let mut first = snapshot(11, Some("user11"));
    first.first_name = Some("First".to_string());
    identity.upsert(&first).await.expect("Failed to upsert");

    let mut second = snapshot(11, Some("user11"));
    second.first_name = Some("Changed".to_string());
    identity.upsert(&second).await.expect("Failed to upsert");

    let stored = identity
        .find_by_user_id(11)
        .await
        .expect("Failed to query")
        .expect("User should exist");
    assert_eq!(stored.first_name.as_deref(), Some("First"));
}

#[tokio::test]
async fn test_full_profile_policy_refreshes_name_fields() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("chronicle.db");
    let store = HistoryStore::connect_with_policy(
        path.to_str().expect("utf-8 path"),
        IdentitySyncPolicy::FullProfile,
    )
    .await
    .expect("Failed to connect store");
    let identity = store.identity();

    let mut first = snapshot(12, Some("user12"));
    first.first_name = Some("First".to_string());
    identity.upsert(&first).await.expect("Failed to upsert");

    let mut second = snapshot(12, None);
    second.first_name = Some("Changed".to_string());
    second.last_name = Some("Name".to_string());
    identity.upsert(&second).await.expect("Failed to upsert");

    let stored = identity
        .find_by_user_id(12)
        .await
        .expect("Failed to query")
        .expect("User should exist");
    // Username survives an empty snapshot even under full sync.
    assert_eq!(stored.username.as_deref(), Some("user12"));
    assert_eq!(stored.first_name.as_deref(), Some("Changed"));
    assert_eq!(stored.last_name.as_deref(), Some("Name"));
}

#[tokio::test]
async fn test_find_by_user_id_not_found() {
    let (_dir, store) = open_store().await;

    let missing = store
        .identity()
        .find_by_user_id(404)
        .await
        .expect("Failed to query");
    assert!(missing.is_none());
}
