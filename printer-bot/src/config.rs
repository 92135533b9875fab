//! Bot configuration: Telegram connection, shared secret, spool dir, tool commands. Loaded from env.
//! The secret is read once from AUTH_PASSWORD_FILE at load time; failure to read it is fatal.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Uploads larger than this are rejected (64 MiB), unless FILE_SIZE_LIMIT overrides it.
const DEFAULT_FILE_SIZE_LIMIT: u64 = 64 * 1024 * 1024;

/// Bounded wait for the conversion subprocess, unless CONVERT_TIMEOUT_SECS overrides it.
const DEFAULT_CONVERT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Shared print password, read from AUTH_PASSWORD_FILE.
    pub password: String,
    /// Directory for downloaded and converted files.
    pub spool_dir: PathBuf,
    /// Log file path
    pub log_file: String,
    /// Uploads larger than this are rejected.
    pub file_size_limit: u64,
    /// Optional page limit enforced after conversion.
    pub max_pages: Option<u32>,
    pub convert_timeout_secs: u64,
    pub convert_command: String,
    pub print_command: String,
    pub status_command: String,
    pub queue_command: String,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").context("BOT_TOKEN not set")?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        let password_file =
            env::var("AUTH_PASSWORD_FILE").unwrap_or_else(|_| "./auth_password".to_string());
        let password = std::fs::read_to_string(&password_file)
            .with_context(|| format!("Cannot read password file {}", password_file))?
            .trim()
            .to_string();
        if password.is_empty() {
            anyhow::bail!("Password file {} is empty", password_file);
        }

        let spool_dir =
            PathBuf::from(env::var("SPOOL_DIR").unwrap_or_else(|_| "./printed_files".to_string()));
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/printer-bot.log".to_string());

        let file_size_limit = env::var("FILE_SIZE_LIMIT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FILE_SIZE_LIMIT);
        let max_pages = env::var("MAX_PAGES").ok().and_then(|s| s.parse().ok());
        let convert_timeout_secs = env::var("CONVERT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONVERT_TIMEOUT_SECS);

        let convert_command =
            env::var("CONVERT_COMMAND").unwrap_or_else(|_| "libreoffice".to_string());
        let print_command = env::var("PRINT_COMMAND").unwrap_or_else(|_| "lpr".to_string());
        let status_command = env::var("LPSTAT_COMMAND").unwrap_or_else(|_| "lpstat".to_string());
        let queue_command = env::var("LPQ_COMMAND").unwrap_or_else(|_| "lpq".to_string());

        Ok(Self {
            bot_token,
            telegram_api_url,
            password,
            spool_dir,
            log_file,
            file_size_limit,
            max_pages,
            convert_timeout_secs,
            convert_command,
            print_command,
            status_command,
            queue_command,
        })
    }

    /// Validate config (e.g. telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if self.file_size_limit == 0 {
            anyhow::bail!("FILE_SIZE_LIMIT must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// One test covers load + validate to avoid env-var races between parallel tests.
    #[test]
    fn test_load_reads_secret_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let secret_path = dir.path().join("auth_password");
        let mut f = std::fs::File::create(&secret_path).expect("create secret");
        writeln!(f, "s3cret").expect("write secret");

        env::set_var("AUTH_PASSWORD_FILE", &secret_path);
        let config = BotConfig::load(Some("test_token".to_string())).expect("load");
        assert_eq!(config.bot_token, "test_token");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.file_size_limit, DEFAULT_FILE_SIZE_LIMIT);
        assert!(config.validate().is_ok());

        env::set_var("AUTH_PASSWORD_FILE", dir.path().join("missing"));
        assert!(BotConfig::load(Some("test_token".to_string())).is_err());
        env::remove_var("AUTH_PASSWORD_FILE");
    }
}
