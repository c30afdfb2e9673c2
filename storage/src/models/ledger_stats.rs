//! Aggregate statistics over the ledger.
//!
//! Returned by MessageLedger::stats.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_messages: i64,
    pub edited_messages: i64,
    pub deleted_messages: i64,
    pub total_versions: i64,
    pub unique_users: i64,
    pub unique_chats: i64,
}
