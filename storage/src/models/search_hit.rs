//! One hashtag search result.
//!
//! Returned by AuditQuery::search_by_hashtag; original texts and edit
//! versions surface as separate hits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    /// Author's username, or their decimal platform id when no username
    /// is set.
    pub author: String,
}
