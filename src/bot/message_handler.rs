//! Message Handler module: the teloxide side of the bot

use std::sync::Arc;

use anyhow::Result;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::Me;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::localization::detect_language;

use super::commands::Command;
use super::context::BotContext;
use super::router::{route, Inbound};
use super::ui_builder::{reply_markup, Reply};

/// Build the dptree handler for the dispatcher
pub fn build_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().endpoint(message_handler)
}

/// Reduce a Telegram message to an [`Inbound`]
pub fn classify_message(text: Option<&str>, bot_username: &str) -> Inbound {
    match text {
        Some(text) if text.starts_with('/') => match Command::parse(text, bot_username) {
            Ok(command) => Inbound::Command(command),
            Err(_) => Inbound::UnknownCommand,
        },
        Some(text) => Inbound::Text(text.to_string()),
        None => Inbound::Unsupported,
    }
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply, language: &str) -> Result<()> {
    let request = bot.send_message(chat_id, reply.text);
    match reply.keyboard {
        Some(hint) => request.reply_markup(reply_markup(hint, language)).await?,
        None => request.await?,
    };
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    me: Me,
    ctx: Arc<BotContext>,
) -> Result<()> {
    // Channel posts have no sender
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let user_id = user.id.0 as i64;
    let language = detect_language(user.language_code.as_deref());
    debug!(user_id, chat_id = %msg.chat.id, language, "Received message from user");

    let inbound = classify_message(msg.text(), me.username());
    let reply = route(&ctx, user_id, inbound, language).await;

    send_reply(&bot, msg.chat.id, reply, language).await
}
