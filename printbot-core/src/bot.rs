//! Bot abstraction for sending, editing, and downloading.
//!
//! [`Bot`] is transport-agnostic; the teloxide implementation lives in the printer-bot crate.

use crate::error::{PrintBotError, Result};
use crate::types::{Chat, Message};
use async_trait::async_trait;
use std::path::Path;

/// Abstraction over the chat transport. Implementations map to Telegram; tests substitute a mock.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Edits an already-sent message (send then edit for progress updates). `message_id` is transport-specific.
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;
    /// Sends a message and returns its id for later `edit_message`. May return empty string if not supported.
    async fn send_message_and_return_id(&self, chat: &Chat, text: &str) -> Result<String>;
    /// Downloads the file behind a transport file id into `dest`.
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<()>;
}

/// Parses a message id string into an i32. Used by edit_message implementations.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| PrintBotError::Bot(format!("Invalid message_id for edit: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_id_valid() {
        assert_eq!(parse_message_id("123").unwrap(), 123);
        assert_eq!(parse_message_id("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_message_id_invalid() {
        assert!(parse_message_id("").is_err());
        assert!(parse_message_id("abc").is_err());
        assert!(parse_message_id("12.3").is_err());
    }
}
