//! Core types: user identity snapshots, normalized chat events, hashtag validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ChronicleError;

/// Identity of a platform user as observed on a single event.
///
/// `id` is the stable platform identifier; everything else is a snapshot
/// that may lag behind or run ahead of what is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A newly posted chat message.
///
/// `message_id` is the platform-assigned id when the platform supplies one;
/// without it, edit and delete lookups degrade to latest-by-author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessageEvent {
    pub chat_id: i64,
    pub author: UserIdentity,
    pub text: String,
    pub message_id: Option<i64>,
}

/// An edit of a previously posted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditedMessageEvent {
    pub chat_id: i64,
    pub author_id: i64,
    pub message_id: Option<i64>,
    pub new_text: String,
    pub edited_at: DateTime<Utc>,
}

/// A request to mark a message as deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedMessageEvent {
    pub chat_id: i64,
    pub author_id: i64,
    pub message_id: Option<i64>,
}

/// Direction of a chat membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipChange {
    Joined,
    Left,
}

/// A validated hashtag: non-empty and `#`-prefixed.
///
/// Validation happens at the adapter boundary; the storage layer treats the
/// tag as an opaque substring pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hashtag(String);

impl Hashtag {
    /// Parses a hashtag, rejecting anything that is not `#` followed by at
    /// least one character.
    pub fn parse(input: &str) -> Result<Self, ChronicleError> {
        let tag = input.trim();
        if !tag.starts_with('#') || tag.len() < 2 {
            return Err(ChronicleError::Validation(format!(
                "not a hashtag: {:?}",
                input
            )));
        }
        Ok(Self(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Hashtag {
    type Err = ChronicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Hashtag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
