//! # Configuration Module
//!
//! Runtime settings read from the environment. The bot token is the only
//! mandatory value; everything else has a default.

use std::net::SocketAddr;

use crate::errors::BotError;

pub const DEFAULT_DATABASE_PATH: &str = "bju_bot.db";
pub const DEFAULT_PORT: u16 = 8080;

/// How updates reach the bot
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryMode {
    /// Long polling against the Bot API
    Polling,
    /// Telegram pushes updates to `url`; the HTTP server listens on `addr`
    Webhook { url: String, addr: SocketAddr },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub database_path: String,
    /// Public hostname; when present the bot runs in webhook mode
    pub webhook_host: Option<String>,
    pub port: u16,
    /// Users allowed to run `/addproduct`. Empty means everyone.
    pub admin_ids: Vec<i64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = non_empty("BOT_TOKEN")
            .or_else(|| non_empty("TELOXIDE_TOKEN"))
            .ok_or(BotError::MissingToken)?;

        let database_path =
            non_empty("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let webhook_host = non_empty("WEBHOOK_HOST")
            .or_else(|| non_empty("RAILWAY_PUBLIC_DOMAIN"))
            .map(|host| strip_scheme(&host).to_string());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| BotError::InvalidConfig(format!("PORT must be a port number, got '{raw}'")))?,
            None => DEFAULT_PORT,
        };

        let admin_ids = match non_empty("ADMIN_IDS") {
            Some(raw) => parse_admin_ids(&raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            bot_token,
            database_path,
            webhook_host,
            port,
            admin_ids,
        })
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        match &self.webhook_host {
            Some(host) => DeliveryMode::Webhook {
                url: format!("https://{}/bot/{}", host.trim_end_matches('/'), self.bot_token),
                addr: SocketAddr::from(([0, 0, 0, 0], self.port)),
            },
            None => DeliveryMode::Polling,
        }
    }
}

fn strip_scheme(host: &str) -> &str {
    host.strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host)
}

fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, BotError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i64>()
                .map_err(|_| BotError::InvalidConfig(format!("ADMIN_IDS entry '{id}' is not a user id")))
        })
        .collect()
}
