//! Update handlers: one async fn per update kind.
//!
//! Each handler converts the Telegram update into a normalized event and
//! drives the storage components. Storage failures are logged and never
//! crash the dispatcher; only the admin search surfaces errors back to the
//! user (told to retry), so "no matches" and "search failed" stay distinct.

use chronicle_core::{Hashtag, MembershipChange};
use storage::{HistoryStore, StorageError};
use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberUpdated, UserId};
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

use crate::adapters::{identity_snapshot, TelegramMessageWrapper};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case", description = "Chat history commands:")]
pub enum Command {
    #[command(description = "mark a message as deleted (reply to it, or your latest one is used).")]
    Delete,
    #[command(description = "search chat history for a hashtag (admins only).")]
    SearchHashtag(String),
}

pub async fn handle_new_message(msg: Message, store: HistoryStore) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if from.is_bot {
        info!(username = from.username.as_deref().unwrap_or(""), "Ignoring message from bot");
        return Ok(());
    }
    let Some(event) = TelegramMessageWrapper(&msg).to_new_message() else {
        return Ok(());
    };

    let author = identity_snapshot(&event.author);
    match store
        .ledger()
        .record_new_message(event.chat_id, &author, &event.text, event.message_id)
        .await
    {
        Ok(record) => {
            info!(chat_id = record.chat_id, user_id = record.user_id, "Saved message");
        }
        Err(StorageError::DuplicateMessage(_)) => {
            warn!(chat_id = event.chat_id, message_id = ?event.message_id, "Replayed message, original kept");
        }
        Err(e) => {
            error!(error = %e, chat_id = event.chat_id, "Error saving message");
        }
    }
    Ok(())
}

pub async fn handle_edited_message(msg: Message, store: HistoryStore) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if from.is_bot {
        info!(username = from.username.as_deref().unwrap_or(""), "Ignoring edited message from bot");
        return Ok(());
    }
    let Some(event) = TelegramMessageWrapper(&msg).to_edit() else {
        return Ok(());
    };

    match store
        .ledger()
        .record_edit(
            event.chat_id,
            event.author_id,
            event.message_id,
            &event.new_text,
            event.edited_at,
        )
        .await
    {
        Ok(true) => {
            info!(chat_id = event.chat_id, user_id = event.author_id, "Recorded message edit");
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, chat_id = event.chat_id, "Error handling edited message");
        }
    }
    Ok(())
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    store: HistoryStore,
) -> ResponseResult<()> {
    match cmd {
        Command::Delete => handle_delete(msg, store).await,
        Command::SearchHashtag(tag) => handle_search_hashtag(bot, msg, tag, store).await,
    }
}

async fn handle_delete(msg: Message, store: HistoryStore) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if from.is_bot {
        return Ok(());
    }
    let Some(event) = TelegramMessageWrapper(&msg).to_deletion() else {
        return Ok(());
    };

    match store
        .ledger()
        .mark_deleted(event.chat_id, event.author_id, event.message_id)
        .await
    {
        Ok(true) => {
            info!(chat_id = event.chat_id, user_id = event.author_id, "Message marked as deleted");
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, chat_id = event.chat_id, "Error handling deleted message");
        }
    }
    Ok(())
}

async fn handle_search_hashtag(
    bot: Bot,
    msg: Message,
    raw_tag: String,
    store: HistoryStore,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    if !is_chat_admin(&bot, chat_id, from.id).await {
        bot.send_message(chat_id, "This command is only available to chat administrators.")
            .await?;
        return Ok(());
    }

    let hashtag = match Hashtag::parse(&raw_tag) {
        Ok(tag) => tag,
        Err(_) => {
            bot.send_message(
                chat_id,
                "Provide a hashtag to search for (e.g. /search_hashtag #example).",
            )
            .await?;
            return Ok(());
        }
    };

    match store.audit().search_by_hashtag(chat_id.0, hashtag.as_str()).await {
        Ok(hits) if hits.is_empty() => {
            bot.send_message(from.id, "No messages found with that hashtag.")
                .await?;
        }
        Ok(hits) => {
            let mut reply = format!("Search results for {}:\n\n", hashtag);
            for hit in &hits {
                reply.push_str(&format!("Text: {}\nAuthor: {}\n\n", hit.text, hit.author));
            }
            // Results go to the admin's private chat, not the group.
            bot.send_message(from.id, reply).await?;
            info!(
                chat_id = chat_id.0,
                hashtag = %hashtag,
                hits = hits.len(),
                admin = from.id.0,
                "Hashtag search served"
            );
        }
        Err(e) => {
            error!(error = %e, chat_id = chat_id.0, "Hashtag search failed");
            bot.send_message(chat_id, "Search failed, please try again.")
                .await?;
        }
    }
    Ok(())
}

pub async fn handle_chat_member(bot: Bot, update: ChatMemberUpdated) -> ResponseResult<()> {
    let member = &update.new_chat_member.user;
    if member.is_bot {
        info!(username = member.username.as_deref().unwrap_or(""), "Ignoring bot member change");
        return Ok(());
    }

    let was_member = update.old_chat_member.is_present();
    let is_member = update.new_chat_member.is_present();
    let change = match (was_member, is_member) {
        (false, true) => MembershipChange::Joined,
        (true, false) => MembershipChange::Left,
        // Status changed within the chat (e.g. promoted); nothing to report.
        _ => return Ok(()),
    };

    let chat_title = update.chat.title().unwrap_or("Private Chat");
    let text = match change {
        MembershipChange::Joined => {
            format!("User {} was added to chat '{}'.", member.full_name(), chat_title)
        }
        MembershipChange::Left => {
            format!("User {} left chat '{}'.", member.full_name(), chat_title)
        }
    };
    notify_admins(&bot, update.chat.id, &text).await;
    Ok(())
}

/// Best-effort broadcast to every non-bot admin's private chat; per-admin
/// failures are logged and skipped.
async fn notify_admins(bot: &Bot, chat_id: ChatId, text: &str) {
    let admins = match bot.get_chat_administrators(chat_id).await {
        Ok(admins) => admins,
        Err(e) => {
            error!(error = %e, chat_id = chat_id.0, "Failed to fetch administrators");
            return;
        }
    };

    for admin in admins {
        if admin.user.is_bot {
            continue;
        }
        match bot.send_message(admin.user.id, text).await {
            Ok(_) => {
                info!(admin = admin.user.id.0, "Notified admin");
            }
            Err(e) => {
                warn!(error = %e, admin = admin.user.id.0, "Failed to notify admin");
            }
        }
    }
}

async fn is_chat_admin(bot: &Bot, chat_id: ChatId, user_id: UserId) -> bool {
    match bot.get_chat_member(chat_id, user_id).await {
        Ok(member) => member.is_privileged(),
        Err(e) => {
            error!(error = %e, chat_id = chat_id.0, "Error checking admin status");
            false
        }
    }
}
