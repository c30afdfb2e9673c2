//! Dispatcher wiring: builds the bot, connects the store, and runs the
//! update loop with branches per update kind.

use anyhow::Result;
use storage::HistoryStore;
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use teloxide::update_listeners::Polling;
use tracing::info;

use crate::config::BaseConfig;
use crate::handlers::{
    handle_chat_member, handle_command, handle_edited_message, handle_new_message, Command,
};

/// Runs the tracker bot until the process is stopped.
///
/// Polls for message, edited-message and chat-member updates; the store is
/// injected into every handler via the dispatcher's dependency map.
pub async fn run_bot(config: BaseConfig) -> Result<()> {
    config.validate()?;

    let store = HistoryStore::connect(&config.database_url).await?;
    let bot = build_bot(&config)?;

    info!(database_url = %config.database_url, "Starting chronicle bot");

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_message().endpoint(handle_new_message))
        .branch(Update::filter_edited_message().endpoint(handle_edited_message))
        .branch(Update::filter_chat_member().endpoint(handle_chat_member));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![store])
        .enable_ctrlc_handler()
        .build();

    let listener = Polling::builder(bot)
        .allowed_updates(vec![
            AllowedUpdate::Message,
            AllowedUpdate::EditedMessage,
            AllowedUpdate::ChatMember,
        ])
        .build();

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    Ok(())
}

fn build_bot(config: &BaseConfig) -> Result<Bot> {
    let bot = Bot::new(&config.bot_token);
    let bot = match &config.telegram_api_url {
        Some(url) => bot.set_api_url(reqwest::Url::parse(url)?),
        None => bot,
    };
    Ok(bot)
}
