//! Flat record models mapping to the ledger's three relations, plus the
//! result shapes returned by queries.

mod identity_snapshot;
mod ledger_stats;
mod message_record;
mod message_version;
mod search_hit;
mod user_record;

pub use identity_snapshot::IdentitySnapshot;
pub use ledger_stats::LedgerStats;
pub use message_record::MessageRecord;
pub use message_version::{MessageHistory, MessageVersionRecord};
pub use search_hit::SearchHit;
pub use user_record::UserRecord;
