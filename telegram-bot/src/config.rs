//! Base config: Telegram connection, logging, database. Loaded from env.

use anyhow::Result;
use std::env;

/// Base config for the tracker bot.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
    /// SQLite database path for the message ledger
    pub database_url: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(t) => t,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./chronicle.db".to_string());
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/chronicle-bot.log".to_string());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            database_url,
        })
    }

    /// Validate config (telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_api_url(url: Option<&str>) -> BaseConfig {
        BaseConfig {
            bot_token: "test_token".to_string(),
            telegram_api_url: url.map(|u| u.to_string()),
            log_file: "logs/test.log".to_string(),
            database_url: "./test.db".to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_unset_api_url() {
        assert!(config_with_api_url(None).validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_valid_api_url() {
        assert!(config_with_api_url(Some("https://api.example.com"))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_api_url() {
        assert!(config_with_api_url(Some("not a url")).validate().is_err());
    }
}
