//! Dialogue Manager module for the registration dialogue
//!
//! `Idle -> AwaitingName -> AwaitingGoal -> Idle`. A user row is written
//! only once a valid goal arrives.

use anyhow::Result;
use tracing::{debug, info};

use crate::dialogue::{parse_goal, validate_name, ConversationState, NameError, MAX_NAME_CHARS};
use crate::localization::{t_args_lang, t_lang};
use crate::nutrition::format_kcal;

use super::context::BotContext;
use super::ui_builder::Reply;

/// Handle `/start`: welcome back a known user or begin registration
pub async fn handle_start(ctx: &BotContext, user_id: i64, language: &str) -> Result<Reply> {
    if let Some(user) = ctx.store.get_user(user_id).await? {
        ctx.sessions.clear(user_id).await;
        debug!(user_id, "Known user restarted the bot");
        return Ok(Reply::with_main_keyboard(t_args_lang(
            "welcome-back",
            &[("name", &user.name)],
            language,
        )));
    }

    ctx.sessions
        .set(user_id, ConversationState::AwaitingName)
        .await;
    debug!(user_id, "Registration started");
    Ok(Reply::text(t_lang("ask-name", language)))
}

/// Handle the name step of registration
pub async fn handle_name_input(
    ctx: &BotContext,
    user_id: i64,
    name_input: &str,
    language: &str,
) -> Result<Reply> {
    match validate_name(name_input) {
        Ok(name) => {
            ctx.sessions
                .set(user_id, ConversationState::AwaitingGoal { name })
                .await;
            debug!(user_id, "Name captured, waiting for goal");
            Ok(Reply::text(t_lang("ask-goal", language)))
        }
        // Keep dialogue active, user can try again
        Err(NameError::Empty) => Ok(Reply::text(t_lang("name-invalid", language))),
        Err(NameError::TooLong) => Ok(Reply::text(t_args_lang(
            "name-too-long",
            &[("max", &MAX_NAME_CHARS.to_string())],
            language,
        ))),
    }
}

/// Handle the goal step of registration
pub async fn handle_goal_input(
    ctx: &BotContext,
    user_id: i64,
    name: String,
    goal_input: &str,
    language: &str,
) -> Result<Reply> {
    let Some(goal) = parse_goal(goal_input) else {
        debug!(user_id, "Rejected goal input");
        return Ok(Reply::text(t_lang("goal-invalid", language)));
    };

    ctx.store.upsert_user(user_id, &name, goal).await?;
    ctx.sessions.clear(user_id).await;
    info!(user_id, goal, "User registered");

    Ok(Reply::with_main_keyboard(t_args_lang(
        "registration-complete",
        &[("name", &name), ("goal", &format_kcal(goal))],
        language,
    )))
}

/// Handle `/cancel`: abandon an in-progress registration
pub async fn handle_cancel(ctx: &BotContext, user_id: i64, language: &str) -> Result<Reply> {
    match ctx.sessions.get(user_id).await {
        ConversationState::Idle => Ok(Reply::text(t_lang("cancel-nothing", language))),
        _ => {
            ctx.sessions.clear(user_id).await;
            debug!(user_id, "Registration cancelled");
            Ok(Reply::text(t_lang("cancel-done", language)))
        }
    }
}
