//! Handler implementations: logging and the command router.

mod command_handler;
mod logging_handler;

pub use command_handler::CommandHandler;
pub use logging_handler::LoggingHandler;
