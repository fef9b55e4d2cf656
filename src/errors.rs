//! # Error Types Module
//!
//! Process-level failures. User input problems (bad numbers, unknown
//! products, unregistered users) are not errors here: they are answered
//! with a chat reply and never leave the handler.

/// Errors that can stop the bot from starting or serving updates
#[derive(Debug, Clone, PartialEq)]
pub enum BotError {
    /// The bot credential is missing or blank
    MissingToken,
    /// A configuration value could not be parsed
    InvalidConfig(String),
    /// The webhook listener could not be set up
    Webhook(String),
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotError::MissingToken => {
                write!(f, "BOT_TOKEN environment variable is not set")
            }
            BotError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            BotError::Webhook(msg) => write!(f, "Webhook error: {msg}"),
        }
    }
}

impl std::error::Error for BotError {}
