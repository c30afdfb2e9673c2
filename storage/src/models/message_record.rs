//! Message record model for persistence.
//!
//! Maps to the `messages` table. `text` is the original text and is never
//! overwritten; the row is only ever mutated by flipping the two flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRecord {
    /// Internally generated sequential id (the table rowid).
    pub id: i64,
    pub chat_id: i64,
    pub user_id: i64,
    /// Platform-assigned message id; `None` for platforms that do not
    /// supply one, in which case edit/delete lookups degrade to
    /// latest-by-author.
    pub message_id: Option<i64>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub is_edited: bool,
}
