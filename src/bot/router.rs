//! Routes one inbound message to exactly one handler and produces its reply.
//! Nothing in here knows about Telegram types.

use anyhow::Result;
use tracing::{debug, error};

use crate::dialogue::ConversationState;
use crate::localization::{matches_any_language, t_lang};

use super::commands::Command;
use super::context::BotContext;
use super::dialogue_manager::{handle_cancel, handle_goal_input, handle_name_input, handle_start};
use super::ledger_handler::{
    handle_add_product, handle_food_entry, handle_list_products, handle_reset, handle_statistics,
};
use super::ui_builder::Reply;

/// An inbound message reduced to what the handlers need
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Command(Command),
    Text(String),
    /// Starts with `/` but is not a known command
    UnknownCommand,
    /// Photos, stickers and other non-text messages
    Unsupported,
}

/// Handle one message. Storage failures are logged and answered with a
/// generic error so that a single bad update never takes the bot down.
pub async fn route(ctx: &BotContext, user_id: i64, inbound: Inbound, language: &str) -> Reply {
    debug!(user_id, inbound = ?inbound, "Routing inbound message");

    let outcome = match inbound {
        Inbound::Command(command) => handle_command(ctx, user_id, command, language).await,
        Inbound::Text(text) => handle_text(ctx, user_id, &text, language).await,
        Inbound::UnknownCommand => Ok(Reply::text(t_lang("unknown-command", language))),
        Inbound::Unsupported => Ok(Reply::text(t_lang("text-only", language))),
    };

    outcome.unwrap_or_else(|e| {
        error!(user_id, error = %e, "Failed to handle message");
        Reply::text(t_lang("error-generic", language))
    })
}

async fn handle_command(
    ctx: &BotContext,
    user_id: i64,
    command: Command,
    language: &str,
) -> Result<Reply> {
    match command {
        Command::Start => handle_start(ctx, user_id, language).await,
        Command::Help => Ok(Reply::text(t_lang("help", language))),
        Command::Cancel => handle_cancel(ctx, user_id, language).await,
        Command::Products => handle_list_products(ctx, language).await,
        Command::AddProduct(args) => handle_add_product(ctx, user_id, &args, language).await,
    }
}

async fn handle_text(ctx: &BotContext, user_id: i64, text: &str, language: &str) -> Result<Reply> {
    match ctx.sessions.get(user_id).await {
        ConversationState::AwaitingName => handle_name_input(ctx, user_id, text, language).await,
        ConversationState::AwaitingGoal { name } => {
            handle_goal_input(ctx, user_id, name, text, language).await
        }
        ConversationState::Idle => {
            let trimmed = text.trim();
            if matches_any_language("button-stats", trimmed) {
                handle_statistics(ctx, user_id, language).await
            } else if matches_any_language("button-reset", trimmed) {
                handle_reset(ctx, user_id, language).await
            } else {
                handle_food_entry(ctx, user_id, text, language).await
            }
        }
    }
}
