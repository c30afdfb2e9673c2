//! Unit tests for AuditQuery.
//!
//! Covers original-vs-version hits, author resolution, chat scoping, and
//! soft-delete visibility.

use chrono::Utc;
use tempfile::TempDir;

use crate::history_store::HistoryStore;
use crate::migrations;
use crate::models::IdentitySnapshot;

async fn open_store() -> (TempDir, HistoryStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("chronicle.db");
    let store = HistoryStore::connect(path.to_str().expect("utf-8 path"))
        .await
        .expect("Failed to connect store");
    (dir, store)
}

fn named_author(user_id: i64, username: &str) -> IdentitySnapshot {
    IdentitySnapshot {
        user_id,
        username: Some(username.to_string()),
        full_name: None,
        first_name: None,
        last_name: None,
    }
}

#[tokio::test]
async fn test_record_then_search_round_trip() {
    let (_dir, store) = open_store().await;

    store
        .ledger()
        .record_new_message(1, &named_author(100, "alice"), "hello #tag", Some(5))
        .await
        .expect("Failed to record message");

    let hits = store
        .audit()
        .search_by_hashtag(1, "#tag")
        .await
        .expect("Failed to search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "hello #tag");
    assert_eq!(hits[0].author, "alice");
}

#[tokio::test]
async fn test_edit_history_surfaces_independently() {
    let (_dir, store) = open_store().await;
    let ledger = store.ledger();
    let audit = store.audit();

    ledger
        .record_new_message(1, &named_author(100, "alice"), "hello #tag", Some(5))
        .await
        .expect("Failed to record message");
    ledger
        .record_edit(1, 100, Some(5), "bye #tag2", Utc::now())
        .await
        .expect("Failed to record edit");

    // The original text still matches its hashtag after the edit.
    let old_hits = audit
        .search_by_hashtag(1, "#tag")
        .await
        .expect("Failed to search");
    assert!(old_hits.iter().any(|h| h.text == "hello #tag"));

    // The edited version matches the new hashtag as its own entry.
    let new_hits = audit
        .search_by_hashtag(1, "#tag2")
        .await
        .expect("Failed to search");
    assert_eq!(new_hits.len(), 1);
    assert_eq!(new_hits[0].text, "bye #tag2");
    assert_eq!(new_hits[0].author, "alice");
}

#[tokio::test]
async fn test_original_and_version_of_same_message_both_returned() {
    let (_dir, store) = open_store().await;
    let ledger = store.ledger();

    ledger
        .record_new_message(1, &named_author(100, "alice"), "first #topic", Some(5))
        .await
        .expect("Failed to record message");
    ledger
        .record_edit(1, 100, Some(5), "second #topic", Utc::now())
        .await
        .expect("Failed to record edit");

    let hits = store
        .audit()
        .search_by_hashtag(1, "#topic")
        .await
        .expect("Failed to search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].text, "first #topic");
    assert_eq!(hits[1].text, "second #topic");
}

#[tokio::test]
async fn test_author_falls_back_to_platform_id() {
    let (_dir, store) = open_store().await;

    let nameless = IdentitySnapshot::bare(100);
    store
        .ledger()
        .record_new_message(1, &nameless, "anonymous #tag", Some(5))
        .await
        .expect("Failed to record message");

    let hits = store
        .audit()
        .search_by_hashtag(1, "#tag")
        .await
        .expect("Failed to search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].author, "100");
}

#[tokio::test]
async fn test_soft_deleted_messages_stay_searchable() {
    let (_dir, store) = open_store().await;
    let ledger = store.ledger();

    ledger
        .record_new_message(1, &named_author(100, "alice"), "evidence #tag", Some(5))
        .await
        .expect("Failed to record message");
    ledger
        .mark_deleted(1, 100, Some(5))
        .await
        .expect("Failed to mark deleted");

    let hits = store
        .audit()
        .search_by_hashtag(1, "#tag")
        .await
        .expect("Failed to search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "evidence #tag");
}

#[tokio::test]
async fn test_search_is_scoped_to_the_chat() {
    let (_dir, store) = open_store().await;
    let ledger = store.ledger();

    ledger
        .record_new_message(1, &named_author(100, "alice"), "here #tag", Some(5))
        .await
        .expect("Failed to record message");
    ledger
        .record_new_message(2, &named_author(100, "alice"), "elsewhere #tag", Some(6))
        .await
        .expect("Failed to record message");

    let hits = store
        .audit()
        .search_by_hashtag(1, "#tag")
        .await
        .expect("Failed to search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "here #tag");
}

#[tokio::test]
async fn test_no_matches_is_empty_not_an_error() {
    let (_dir, store) = open_store().await;

    let hits = store
        .audit()
        .search_by_hashtag(1, "#nothing")
        .await
        .expect("Failed to search");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let (_dir, store) = open_store().await;

    // A second run against an up-to-date database applies nothing.
    migrations::run(store.pool_manager().pool())
        .await
        .expect("Re-run should be a no-op");

    let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
        .fetch_one(store.pool_manager().pool())
        .await
        .expect("Failed to read user_version");
    assert_eq!(version, migrations::latest_version());
}
