//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain.

use anyhow::Result;
use printbot_core::ToCoreMessage;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;
use crate::chain::HandlerChain;

/// Starts the REPL with the given teloxide Bot and HandlerChain.
/// Each message is converted to core::Message and passed to chain.handle (spawned per
/// message so a blocked upload never stalls other chats).
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity resolved before repl");
        }
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let wrapper = TelegramMessageWrapper(&msg);
            let core_msg = wrapper.to_core();

            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_type = %core_msg.message_type,
                "Received update"
            );

            if core_msg.content.is_empty() && core_msg.attachment.is_none() {
                info!(chat_id = core_msg.chat.id, "Ignoring message with no text or file");
                return Ok(());
            }

            // Run handler chain in a spawned task so the REPL returns immediately
            let chain_for_task = chain.clone();
            tokio::spawn(async move {
                if let Err(e) = chain_for_task.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
