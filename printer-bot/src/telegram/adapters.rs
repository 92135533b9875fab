//! Adapters from Telegram (teloxide) types to printbot_core types.
//! Depends only on teloxide and printbot_core type definitions.

use printbot_core::{Chat, Document, Message, MessageDirection, ToCoreMessage, ToCoreUser, User};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let attachment = self.extract_attachment();
        let message_type = match &attachment {
            Some(_) if self.0.document().is_some() => "document",
            Some(_) => "photo",
            None => "text",
        };
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: self.0.chat.id.0,
                chat_type: format!("{:?}", self.0.chat.kind),
            },
            content: self
                .0
                .text()
                .or_else(|| self.0.caption())
                .unwrap_or("")
                .to_string(),
            message_type: message_type.to_string(),
            direction: MessageDirection::Incoming,
            created_at: chrono::Utc::now(),
            attachment,
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    /// Document, or the largest photo size, as a core [`Document`].
    fn extract_attachment(&self) -> Option<Document> {
        if let Some(doc) = self.0.document() {
            return Some(Document {
                file_id: doc.file.id.0.clone(),
                file_name: doc
                    .file_name
                    .clone()
                    .unwrap_or_else(|| format!("document_{}", doc.file.unique_id.0)),
                file_size: doc.file.size as u64,
            });
        }
        if let Some(photo) = self.0.photo().and_then(|sizes| sizes.last()) {
            return Some(Document {
                file_id: photo.file.id.0.clone(),
                file_name: format!("photo_{}.jpg", photo.file.unique_id.0),
                file_size: photo.file.size as u64,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: TelegramUserWrapper converts teloxide User to core User with correct id, username, first_name, last_name.**
    #[test]
    fn test_telegram_user_wrapper_to_core() {
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

        let wrapper = TelegramUserWrapper(&user);
        let core_user = wrapper.to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
    }
}
