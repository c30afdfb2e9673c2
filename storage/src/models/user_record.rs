//! User record model for persistence.
//!
//! Maps to the `users` table; one row per platform identifier, never deleted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    /// Stable platform identifier, unique across the table.
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserRecord {
    /// Display name for audit output: username when set and non-empty,
    /// otherwise the decimal platform identifier.
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.user_id.to_string(),
        }
    }
}
