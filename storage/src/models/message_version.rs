//! Edit-version snapshot model.
//!
//! Maps to the `message_versions` table: one immutable row per edit event,
//! in append order. Together with the owning message's original text the
//! rows form the full version chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MessageRecord;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageVersionRecord {
    pub id: i64,
    /// Rowid of the owning message (`messages.id`, not the platform id).
    pub message_id: i64,
    pub text: String,
    pub edited_at: DateTime<Utc>,
}

/// One message's full lifecycle: the original record plus every edit
/// version in append order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHistory {
    pub message: MessageRecord,
    pub versions: Vec<MessageVersionRecord>,
}
