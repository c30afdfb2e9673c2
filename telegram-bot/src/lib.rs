//! # Telegram bot adapter
//!
//! Event ingestion boundary for the chat history tracker: converts Telegram
//! updates into normalized core events, drives the storage components, and
//! implements the admin-facing `/delete` and `/search_hashtag` commands plus
//! membership-change notifications. Config comes from env; the CLI can
//! override the bot token.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod runner;

pub use adapters::{identity_snapshot, TelegramMessageWrapper, TelegramUserWrapper};
pub use cli::{load_config, Cli, Commands};
pub use config::BaseConfig;
pub use handlers::Command;
pub use runner::run_bot;
