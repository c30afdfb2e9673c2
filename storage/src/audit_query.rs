//! Audit queries: hashtag search over original texts and edit versions.
//!
//! Explicit joins back to the author record; results come out as flat
//! [`SearchHit`] rows, no traversal across ownership boundaries at call
//! sites.

use sqlx::FromRow;
use tracing::info;

use crate::error::StorageError;
use crate::models::SearchHit;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct AuditQuery {
    pool_manager: SqlitePoolManager,
}

/// Raw join row; author resolution happens in Rust so the precedence rule
/// (username over platform id) lives in one visible place.
#[derive(FromRow)]
struct HitRow {
    text: String,
    username: Option<String>,
    user_id: i64,
}

impl HitRow {
    fn into_hit(self) -> SearchHit {
        let author = match self.username {
            Some(name) if !name.is_empty() => name,
            _ => self.user_id.to_string(),
        };
        SearchHit {
            text: self.text,
            author,
        }
    }
}

impl AuditQuery {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Returns every original text and every edit version in the chat
    /// containing `pattern` as a substring, each as its own hit.
    ///
    /// The pattern is opaque here; hashtag validation is the caller's job.
    /// Soft-deleted messages are included. Ordering is by row id per arm
    /// (originals first), deterministic for a fixed data snapshot. No
    /// matches is an empty vec, not an error.
    pub async fn search_by_hashtag(
        &self,
        chat_id: i64,
        pattern: &str,
    ) -> Result<Vec<SearchHit>, StorageError> {
        let pool = self.pool_manager.pool();
        let like = format!("%{}%", pattern);

        let originals = sqlx::query_as::<_, HitRow>(
            r#"
            SELECT m.text AS text, u.username AS username, u.user_id AS user_id
            FROM messages m
            JOIN users u ON u.user_id = m.user_id
            WHERE m.chat_id = ? AND m.text LIKE ?
            ORDER BY m.id
            "#,
        )
        .bind(chat_id)
        .bind(&like)
        .fetch_all(pool)
        .await?;

        let versions = sqlx::query_as::<_, HitRow>(
            r#"
            SELECT v.text AS text, u.username AS username, u.user_id AS user_id
            FROM message_versions v
            JOIN messages m ON m.id = v.message_id
            JOIN users u ON u.user_id = m.user_id
            WHERE m.chat_id = ? AND v.text LIKE ?
            ORDER BY v.id
            "#,
        )
        .bind(chat_id)
        .bind(&like)
        .fetch_all(pool)
        .await?;

        let hits: Vec<SearchHit> = originals
            .into_iter()
            .chain(versions)
            .map(HitRow::into_hit)
            .collect();

        info!(chat_id, pattern, hits = hits.len(), "Hashtag search");
        Ok(hits)
    }
}
