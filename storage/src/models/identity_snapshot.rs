//! Identity snapshot: what one platform event reveals about a user.
//!
//! Input to IdentityStore::upsert; reconciled into a [`crate::UserRecord`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl IdentitySnapshot {
    /// Snapshot carrying only the platform identifier.
    pub fn bare(user_id: i64) -> Self {
        Self {
            user_id,
            username: None,
            full_name: None,
            first_name: None,
            last_name: None,
        }
    }

    /// True when the snapshot carries a usable (non-empty) username.
    pub fn has_username(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}
