//! Conversions from teloxide types to the normalized core events.

use chrono::Utc;
use chronicle_core::{DeletedMessageEvent, EditedMessageEvent, NewMessageEvent, UserIdentity};
use storage::IdentitySnapshot;

/// Telegram user to core identity converter.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> TelegramUserWrapper<'a> {
    pub fn to_identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            full_name: Some(self.0.full_name()),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Telegram message to core event converter.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> TelegramMessageWrapper<'a> {
    /// A new-message event, or `None` when the update carries no sender or
    /// no text (joins, stickers, media without caption).
    pub fn to_new_message(&self) -> Option<NewMessageEvent> {
        let from = self.0.from.as_ref()?;
        let text = self.0.text()?;
        Some(NewMessageEvent {
            chat_id: self.0.chat.id.0,
            author: TelegramUserWrapper(from).to_identity(),
            text: text.to_string(),
            message_id: Some(i64::from(self.0.id.0)),
        })
    }

    /// An edit event for an edited-message update. Telegram supplies the
    /// original message id, so the ledger lookup is exact.
    pub fn to_edit(&self) -> Option<EditedMessageEvent> {
        let from = self.0.from.as_ref()?;
        let text = self.0.text()?;
        Some(EditedMessageEvent {
            chat_id: self.0.chat.id.0,
            author_id: from.id.0 as i64,
            message_id: Some(i64::from(self.0.id.0)),
            new_text: text.to_string(),
            edited_at: self.0.edit_date().copied().unwrap_or_else(Utc::now),
        })
    }

    /// A deletion event for a `/delete` command message. The target is the
    /// replied-to message when the command is a reply; without one the
    /// ledger falls back to the author's latest message in the chat.
    pub fn to_deletion(&self) -> Option<DeletedMessageEvent> {
        let from = self.0.from.as_ref()?;
        Some(DeletedMessageEvent {
            chat_id: self.0.chat.id.0,
            author_id: from.id.0 as i64,
            message_id: self.0.reply_to_message().map(|m| i64::from(m.id.0)),
        })
    }
}

/// Core identity to storage snapshot; field-for-field.
pub fn identity_snapshot(identity: &UserIdentity) -> IdentitySnapshot {
    IdentitySnapshot {
        user_id: identity.id,
        username: identity.username.clone(),
        full_name: identity.full_name.clone(),
        first_name: identity.first_name.clone(),
        last_name: identity.last_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_user_wrapper_to_identity() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let identity = TelegramUserWrapper(&user).to_identity();

        assert_eq!(identity.id, 123);
        assert_eq!(identity.username, Some("testuser".to_string()));
        assert_eq!(identity.full_name, Some("Test User".to_string()));
        assert_eq!(identity.first_name, Some("Test".to_string()));
        assert_eq!(identity.last_name, Some("User".to_string()));
    }

    #[test]
    fn test_telegram_user_wrapper_minimal() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(456),
            is_bot: false,
            first_name: "Minimal".to_string(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let identity = TelegramUserWrapper(&user).to_identity();

        assert_eq!(identity.id, 456);
        assert_eq!(identity.username, None);
        assert_eq!(identity.last_name, None);
    }

    #[test]
    fn test_identity_snapshot_copies_all_fields() {
        let identity = UserIdentity {
            id: 9,
            username: Some("u".to_string()),
            full_name: Some("U V".to_string()),
            first_name: Some("U".to_string()),
            last_name: Some("V".to_string()),
        };

        let snapshot = identity_snapshot(&identity);

        assert_eq!(snapshot.user_id, 9);
        assert_eq!(snapshot.username, identity.username);
        assert_eq!(snapshot.full_name, identity.full_name);
        assert_eq!(snapshot.first_name, identity.first_name);
        assert_eq!(snapshot.last_name, identity.last_name);
    }
}
