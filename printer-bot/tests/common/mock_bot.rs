//! Mock implementation of [`printer_bot::Bot`] for integration tests.
//!
//! Records every send and edit so tests can assert on reply text without hitting
//! Telegram; downloads write placeholder bytes so the pipeline has a real file.

use async_trait::async_trait;
use printer_bot::{Bot, Chat, Message, Result};
use std::path::Path;
use std::sync::Mutex;

/// Records everything the bot "said", in order: sends, replies, and edit texts.
pub struct MockBot {
    next_message_id: Mutex<i64>,
    messages: Mutex<Vec<String>>,
}

impl MockBot {
    pub fn new() -> Self {
        Self {
            next_message_id: Mutex::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// All recorded texts, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// The last text the bot produced (send or edit).
    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().unwrap().last().cloned()
    }

    fn record(&self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        self.record(text);
        Ok(())
    }

    async fn reply_to(&self, _message: &Message, text: &str) -> Result<()> {
        self.record(text);
        Ok(())
    }

    async fn edit_message(&self, _chat: &Chat, _message_id: &str, text: &str) -> Result<()> {
        self.record(text);
        Ok(())
    }

    async fn send_message_and_return_id(&self, _chat: &Chat, text: &str) -> Result<String> {
        self.record(text);
        let mut id = self.next_message_id.lock().unwrap();
        *id += 1;
        Ok(id.to_string())
    }

    async fn download_file(&self, _file_id: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, b"placeholder upload content").await?;
        Ok(())
    }
}
