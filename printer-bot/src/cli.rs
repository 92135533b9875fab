//! CLI: run the printer bot. Config from env and optional CLI args.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "printer-bot")]
#[command(about = "Telegram bot that prints uploaded documents", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}
