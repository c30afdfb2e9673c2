//! # chronicle-core
//!
//! Core types for the chat history tracker: normalized chat events
//! ([`NewMessageEvent`], [`EditedMessageEvent`], [`DeletedMessageEvent`]),
//! user identity snapshots, hashtag validation, the error taxonomy, and
//! tracing initialization. Transport-agnostic; used by telegram-bot.

pub mod error;
pub mod logger;
pub mod types;

pub use error::{ChronicleError, Result};
pub use logger::init_tracing;
pub use types::{
    DeletedMessageEvent, EditedMessageEvent, Hashtag, MembershipChange, NewMessageEvent,
    UserIdentity,
};
