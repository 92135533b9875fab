//! # printbot-core
//!
//! Core types and traits for the printer bot: [`Bot`], [`Handler`], message, session and
//! print-job types, the error taxonomy, and tracing initialization. Transport-agnostic;
//! the teloxide layer lives in the printer-bot crate.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{AuthError, ConvertError, JobError, PrintBotError, PrintError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Document, Handler, HandlerResponse, JobState, Message, MessageDirection, PrintJob,
    Session, ToCoreMessage, ToCoreUser, User,
};
