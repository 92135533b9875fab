//! # printer-bot
//!
//! Telegram bot that prints uploaded documents: auth guard, job store, LibreOffice
//! conversion, lpr dispatch, and the command router, wired through a handler chain.
//! Core types (Handler, Bot, Message) come from printbot-core.

pub mod auth;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod components;
pub mod config;
pub mod convert;
pub mod handlers;
pub mod jobs;
pub mod print;
pub mod runner;
pub mod telegram;

pub use cli::{Cli, Commands};
pub use config::BotConfig;

pub use auth::AuthGuard;
pub use chain::HandlerChain;
pub use commands::Command;
pub use components::{build_bot_components, build_handler_chain, BotComponents, ComponentOverrides};
pub use convert::{Converter, LibreOfficeConverter};
pub use handlers::{CommandHandler, LoggingHandler};
pub use jobs::JobStore;
pub use print::{LprPrinter, PrintDispatcher, Printer, PrinterStatus};
pub use runner::{run_bot, PrinterBot};

// Re-export telegram layer
pub use telegram::{run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper};

// Re-export core (from printbot-core)
pub use printbot_core::{
    init_tracing, parse_message_id, AuthError, Bot, Chat, ConvertError, Document, Handler,
    HandlerResponse, JobError, JobState, Message, MessageDirection, PrintBotError, PrintError,
    PrintJob, Result, Session, ToCoreMessage, ToCoreUser, User,
};
