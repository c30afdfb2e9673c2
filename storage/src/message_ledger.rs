//! Message ledger: append-only record of messages and their edit history.
//!
//! A message row is written once and afterwards only ever has its
//! `is_edited` / `is_deleted` flags flipped; every edit appends one
//! immutable version row. Deletion is a soft delete so the full history
//! stays queryable for audit.
//!
//! Every mutating call runs in one scoped transaction: commit on success,
//! rollback-on-drop on every other exit path.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::error::{is_unique_violation, StorageError};
use crate::identity_store::{upsert_on, IdentitySyncPolicy};
use crate::models::{
    IdentitySnapshot, LedgerStats, MessageHistory, MessageRecord, MessageVersionRecord,
};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct MessageLedger {
    pool_manager: SqlitePoolManager,
    sync_policy: IdentitySyncPolicy,
}

impl MessageLedger {
    pub fn new(pool_manager: SqlitePoolManager, sync_policy: IdentitySyncPolicy) -> Self {
        Self {
            pool_manager,
            sync_policy,
        }
    }

    /// Records a newly observed message, reconciling the author identity in
    /// the same transaction.
    ///
    /// `message_id` should be the platform-assigned id when the platform
    /// supplies one; replaying an already-seen `(chat_id, message_id)` pair
    /// fails with [`StorageError::DuplicateMessage`] and leaves the original
    /// row untouched. Without a platform id the row is only addressable by
    /// its generated sequential id.
    pub async fn record_new_message(
        &self,
        chat_id: i64,
        author: &IdentitySnapshot,
        text: &str,
        message_id: Option<i64>,
    ) -> Result<MessageRecord, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let user = upsert_on(&mut *tx, author, self.sync_policy).await?;
        let created_at = Utc::now();

        let inserted = sqlx::query(
            r#"
            INSERT INTO messages (chat_id, user_id, message_id, text, created_at, is_deleted, is_edited)
            VALUES (?, ?, ?, ?, ?, 0, 0)
            "#,
        )
        .bind(chat_id)
        .bind(user.user_id)
        .bind(message_id)
        .bind(text)
        .bind(created_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(done) => {
                let id = done.last_insert_rowid();
                tx.commit().await?;
                info!(chat_id, user_id = user.user_id, id, "Recorded new message");
                Ok(MessageRecord {
                    id,
                    chat_id,
                    user_id: user.user_id,
                    message_id,
                    text: text.to_string(),
                    created_at,
                    is_deleted: false,
                    is_edited: false,
                })
            }
            Err(e) if is_unique_violation(&e) => Err(StorageError::DuplicateMessage(format!(
                "chat {} already has message {:?}",
                chat_id, message_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Marks the target message as edited and appends one version row.
    ///
    /// Returns `false` (after a warning) when no matching message is
    /// tracked; edits of untracked messages are dropped, not fatal. Versions
    /// append in call order; out-of-order `edited_at` values are stored as
    /// supplied, never reordered or deduplicated.
    pub async fn record_edit(
        &self,
        chat_id: i64,
        author_id: i64,
        message_id: Option<i64>,
        new_text: &str,
        edited_at: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let Some(message) = find_target(&mut *tx, chat_id, author_id, message_id).await? else {
            warn!(chat_id, author_id, ?message_id, "Dropping edit for untracked message");
            return Ok(false);
        };

        sqlx::query("UPDATE messages SET is_edited = 1 WHERE id = ?")
            .bind(message.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO message_versions (message_id, text, edited_at) VALUES (?, ?, ?)")
            .bind(message.id)
            .bind(new_text)
            .bind(edited_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(chat_id, author_id, id = message.id, "Recorded edit version");
        Ok(true)
    }

    /// Soft-deletes the target message. Idempotent: deleting an already
    /// deleted message is a no-op. Original text and all versions remain
    /// queryable.
    pub async fn mark_deleted(
        &self,
        chat_id: i64,
        author_id: i64,
        message_id: Option<i64>,
    ) -> Result<bool, StorageError> {
        let mut tx = self.pool_manager.pool().begin().await?;

        let Some(message) = find_target(&mut *tx, chat_id, author_id, message_id).await? else {
            warn!(chat_id, author_id, ?message_id, "Dropping delete for untracked message");
            return Ok(false);
        };

        if !message.is_deleted {
            sqlx::query("UPDATE messages SET is_deleted = 1 WHERE id = ?")
                .bind(message.id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            info!(chat_id, author_id, id = message.id, "Marked message deleted");
        }
        Ok(true)
    }

    /// Returns one message's full version chain, looked up by platform id.
    pub async fn history(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<Option<MessageHistory>, StorageError> {
        let pool = self.pool_manager.pool();

        let message = sqlx::query_as::<_, MessageRecord>(
            "SELECT * FROM messages WHERE chat_id = ? AND message_id = ?",
        )
        .bind(chat_id)
        .bind(message_id)
        .fetch_optional(pool)
        .await?;

        let Some(message) = message else {
            return Ok(None);
        };

        let versions = sqlx::query_as::<_, MessageVersionRecord>(
            "SELECT * FROM message_versions WHERE message_id = ? ORDER BY id",
        )
        .bind(message.id)
        .fetch_all(pool)
        .await?;

        Ok(Some(MessageHistory { message, versions }))
    }

    /// Aggregate counts over the whole ledger.
    pub async fn stats(&self) -> Result<LedgerStats, StorageError> {
        let pool = self.pool_manager.pool();

        let total_messages: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(pool)
            .await?;

        let edited_messages: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE is_edited = 1")
                .fetch_one(pool)
                .await?;

        let deleted_messages: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM messages WHERE is_deleted = 1")
                .fetch_one(pool)
                .await?;

        let total_versions: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM message_versions")
            .fetch_one(pool)
            .await?;

        let unique_users: (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT user_id) FROM messages")
            .fetch_one(pool)
            .await?;

        let unique_chats: (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT chat_id) FROM messages")
            .fetch_one(pool)
            .await?;

        Ok(LedgerStats {
            total_messages: total_messages.0,
            edited_messages: edited_messages.0,
            deleted_messages: deleted_messages.0,
            total_versions: total_versions.0,
            unique_users: unique_users.0,
            unique_chats: unique_chats.0,
        })
    }
}

/// Resolves the message an edit or delete refers to.
///
/// With a platform id the lookup is exact. Without one it degrades to the
/// most recent non-deleted message by that author in the chat, which can
/// mis-attribute the operation when the author posted again in between;
/// callers should supply the platform id whenever they have it.
async fn find_target(
    conn: &mut SqliteConnection,
    chat_id: i64,
    author_id: i64,
    message_id: Option<i64>,
) -> Result<Option<MessageRecord>, StorageError> {
    let message = match message_id {
        Some(mid) => {
            sqlx::query_as::<_, MessageRecord>(
                "SELECT * FROM messages WHERE chat_id = ? AND user_id = ? AND message_id = ?",
            )
            .bind(chat_id)
            .bind(author_id)
            .bind(mid)
            .fetch_optional(conn)
            .await?
        }
        None => {
            sqlx::query_as::<_, MessageRecord>(
                r#"
                SELECT * FROM messages
                WHERE chat_id = ? AND user_id = ? AND is_deleted = 0
                ORDER BY id DESC LIMIT 1
                "#,
            )
            .bind(chat_id)
            .bind(author_id)
            .fetch_optional(conn)
            .await?
        }
    };
    Ok(message)
}
