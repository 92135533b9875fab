//! Runner: builds components and handler chain, then runs the Telegram REPL.

use anyhow::Result;
use printbot_core::{init_tracing, Message as CoreMessage};
use tracing::{error, info, instrument};

use crate::chain::HandlerChain;
use crate::components::{
    build_bot_components, build_handler_chain, BotComponents, ComponentOverrides,
};
use crate::config::BotConfig;
use crate::telegram::run_repl;

/// PrinterBot: config, components, and handler chain.
pub struct PrinterBot {
    pub config: BotConfig,
    pub components: BotComponents,
    pub handler_chain: HandlerChain,
}

impl PrinterBot {
    /// Creates a PrinterBot from config.
    pub fn new(config: BotConfig) -> Result<Self> {
        Self::with_overrides(config, ComponentOverrides::default())
    }

    /// Creates a PrinterBot with injected test doubles (mock bot, fake converter/printer).
    pub fn with_overrides(config: BotConfig, overrides: ComponentOverrides) -> Result<Self> {
        let components = build_bot_components(&config, overrides)?;
        let handler_chain = build_handler_chain(&config, &components);
        Ok(Self {
            config,
            components,
            handler_chain,
        })
    }

    /// Drives the handler chain with a core message (callable from tests).
    pub async fn handle_core_message(&self, message: &CoreMessage) -> Result<()> {
        if let Err(e) = self.handler_chain.handle(message).await {
            error!(error = %e, user_id = message.user.id, "Handler chain failed");
        }
        Ok(())
    }
}

/// Main entry: validate config, create spool and log dirs, init logging, build components, run REPL.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    std::fs::create_dir_all(&config.spool_dir)?;
    if let Some(parent) = std::path::Path::new(&config.log_file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    init_tracing(&config.log_file)?;

    info!(
        spool_dir = %config.spool_dir.display(),
        convert_command = %config.convert_command,
        print_command = %config.print_command,
        "Initializing printer bot"
    );

    let bot = PrinterBot::new(config)?;

    info!("Bot started successfully");

    run_repl(bot.components.teloxide_bot.clone(), bot.handler_chain.clone()).await
}
