//! Storage crate: the message ledger, identity store and audit queries.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, MessageRecord, MessageVersionRecord, SearchHit
//! - [`identity_store`] – IdentityStore (user reconciliation)
//! - [`message_ledger`] – MessageLedger (append-only message history)
//! - [`audit_query`] – AuditQuery (hashtag search over history)
//! - [`history_store`] – HistoryStore (pool + migrations + component access)
//! - [`migrations`] – versioned schema migrations
//! - [`sqlite_pool`] – SqlitePoolManager

mod audit_query;
mod error;
mod history_store;
mod identity_store;
mod message_ledger;
mod migrations;
mod models;
mod sqlite_pool;

#[cfg(test)]
mod audit_query_test;
#[cfg(test)]
mod identity_store_test;

pub use audit_query::AuditQuery;
pub use error::StorageError;
pub use history_store::HistoryStore;
pub use identity_store::{IdentityStore, IdentitySyncPolicy};
pub use message_ledger::MessageLedger;
pub use models::{
    IdentitySnapshot, LedgerStats, MessageHistory, MessageRecord, MessageVersionRecord, SearchHit,
    UserRecord,
};
pub use sqlite_pool::SqlitePoolManager;
