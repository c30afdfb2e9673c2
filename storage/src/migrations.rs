//! Versioned schema migrations.
//!
//! Run once at startup by [`crate::HistoryStore::connect`]. Each migration
//! applies in its own transaction and bumps `PRAGMA user_version`, so a
//! partially applied migration never leaves the schema half-built.

use sqlx::SqlitePool;
use tracing::info;

struct Migration {
    version: i64,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: r#"
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE,
        username TEXT,
        full_name TEXT,
        first_name TEXT,
        last_name TEXT
    );

    CREATE TABLE messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        chat_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(user_id),
        message_id INTEGER,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        is_edited INTEGER NOT NULL DEFAULT 0,
        UNIQUE(chat_id, message_id)
    );

    CREATE TABLE message_versions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        message_id INTEGER NOT NULL REFERENCES messages(id),
        text TEXT NOT NULL,
        edited_at TEXT NOT NULL
    );

    CREATE INDEX idx_messages_chat_id ON messages(chat_id);
    CREATE INDEX idx_messages_user_id ON messages(user_id);
    CREATE INDEX idx_message_versions_message_id ON message_versions(message_id);
    "#,
}];

/// Applies every migration newer than the database's `user_version`.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let (current,): (i64,) = sqlx::query_as("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(version = migration.version, "Applying schema migration");
        let mut tx = pool.begin().await?;
        sqlx::query(migration.sql).execute(&mut *tx).await?;
        sqlx::query(&format!("PRAGMA user_version = {}", migration.version))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
    }

    Ok(())
}

/// The schema version a fully migrated database carries.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}
