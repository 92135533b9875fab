//! Component factory: builds BotComponents from config. Isolates assembly logic from the runner.

use anyhow::Result;
use printbot_core::Bot as CoreBot;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use crate::auth::AuthGuard;
use crate::chain::HandlerChain;
use crate::config::BotConfig;
use crate::convert::{Converter, LibreOfficeConverter};
use crate::handlers::{CommandHandler, LoggingHandler};
use crate::jobs::JobStore;
use crate::print::{LprPrinter, PrintDispatcher, Printer};
use crate::telegram::TelegramBotAdapter;

/// Core dependencies for run_bot / PrinterBot; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub teloxide_bot: Bot,
    /// Bot the handlers reply through; tests inject a mock here.
    pub handler_bot: Arc<dyn CoreBot>,
    pub auth: Arc<AuthGuard>,
    pub jobs: Arc<JobStore>,
    pub converter: Arc<dyn Converter>,
    pub printer: Arc<dyn Printer>,
}

/// Optional test doubles injected into [`build_bot_components`].
#[derive(Default)]
pub struct ComponentOverrides {
    pub handler_bot: Option<Arc<dyn CoreBot>>,
    pub converter: Option<Arc<dyn Converter>>,
    pub printer: Option<Arc<dyn Printer>>,
}

/// Builds BotComponents from config, honoring any test overrides.
#[instrument(skip(config, overrides))]
pub fn build_bot_components(
    config: &BotConfig,
    overrides: ComponentOverrides,
) -> Result<BotComponents> {
    let teloxide_bot = {
        let bot = Bot::new(config.bot_token.clone());
        if let Some(ref url_str) = config.telegram_api_url {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    };

    let handler_bot: Arc<dyn CoreBot> = overrides
        .handler_bot
        .unwrap_or_else(|| Arc::new(TelegramBotAdapter::new(teloxide_bot.clone())));

    let auth = Arc::new(AuthGuard::new(config.password.clone()));
    let jobs = Arc::new(JobStore::new());

    let converter: Arc<dyn Converter> = match overrides.converter {
        Some(c) => c,
        None => {
            info!(command = %config.convert_command, "Using LibreOffice converter");
            Arc::new(LibreOfficeConverter::new(
                config.convert_command.clone(),
                config.spool_dir.clone(),
                Duration::from_secs(config.convert_timeout_secs),
            ))
        }
    };

    let printer: Arc<dyn Printer> = match overrides.printer {
        Some(p) => p,
        None => {
            info!(command = %config.print_command, "Using lpr printer");
            Arc::new(LprPrinter::new(
                config.print_command.clone(),
                config.status_command.clone(),
                config.queue_command.clone(),
            ))
        }
    };

    Ok(BotComponents {
        teloxide_bot,
        handler_bot,
        auth,
        jobs,
        converter,
        printer,
    })
}

/// Builds the handler chain (logging → command router).
pub fn build_handler_chain(config: &BotConfig, components: &BotComponents) -> HandlerChain {
    let dispatcher = PrintDispatcher::new(components.jobs.clone(), components.printer.clone());
    let command_handler = Arc::new(CommandHandler::new(
        components.handler_bot.clone(),
        components.auth.clone(),
        components.jobs.clone(),
        components.converter.clone(),
        components.printer.clone(),
        dispatcher,
        config.spool_dir.clone(),
        config.file_size_limit,
        config.max_pages,
    ));
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(command_handler)
}
