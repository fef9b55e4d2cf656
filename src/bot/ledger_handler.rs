//! Ledger Handler module for food logging, statistics and the product table

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::localization::{t_args_lang, t_lang};
use crate::nutrition::{calories_for, format_kcal, parse_add_product, parse_food_entry, FoodEntryError};

use super::context::BotContext;
use super::ui_builder::{format_products_list, format_statistics, Reply};

/// Handle a free-text `<product> <amount>` entry
pub async fn handle_food_entry(
    ctx: &BotContext,
    user_id: i64,
    text: &str,
    language: &str,
) -> Result<Reply> {
    let entry = match parse_food_entry(text) {
        Ok(entry) => entry,
        Err(FoodEntryError::MissingAmount) => {
            return Ok(Reply::text(t_lang("food-usage", language)));
        }
        Err(FoodEntryError::InvalidAmount) => {
            return Ok(Reply::text(t_lang("amount-invalid", language)));
        }
    };

    let Some(product) = ctx.store.get_product(&entry.product).await? else {
        debug!(user_id, product = %entry.product, "Unknown product");
        return Ok(Reply::text(t_args_lang(
            "product-unknown",
            &[("product", &entry.product)],
            language,
        )));
    };

    let total = calories_for(product.kcal, entry.amount);

    if ctx.store.get_user(user_id).await?.is_none() {
        return Ok(Reply::text(t_lang("not-registered", language)));
    }

    // The row can vanish between the check and the update; that log is dropped
    if !ctx.store.add_eaten(user_id, total).await? {
        return Ok(Reply::text(t_lang("not-registered", language)));
    }

    info!(
        user_id,
        product = %product.name,
        amount = entry.amount,
        kcal = total,
        "Food logged"
    );

    Ok(Reply::text(t_args_lang(
        "food-logged",
        &[
            ("kcal", &format_kcal(total)),
            ("product", &product.name),
            ("amount", &entry.amount_text),
        ],
        language,
    )))
}

/// Handle the statistics trigger
pub async fn handle_statistics(ctx: &BotContext, user_id: i64, language: &str) -> Result<Reply> {
    match ctx.store.get_user(user_id).await? {
        Some(user) => Ok(Reply::with_main_keyboard(format_statistics(&user, language))),
        None => Ok(Reply::text(t_lang("not-registered", language))),
    }
}

/// Handle the reset trigger. Unknown users get the same confirmation.
pub async fn handle_reset(ctx: &BotContext, user_id: i64, language: &str) -> Result<Reply> {
    let updated = ctx.store.reset_eaten(user_id).await?;
    info!(user_id, updated, "Daily total reset");
    Ok(Reply::with_main_keyboard(t_lang("reset-done", language)))
}

/// Handle `/addproduct <name> <kcal>`
pub async fn handle_add_product(
    ctx: &BotContext,
    user_id: i64,
    args: &str,
    language: &str,
) -> Result<Reply> {
    if !ctx.is_admin(user_id) {
        warn!(user_id, "Rejected /addproduct from non-admin");
        return Ok(Reply::text(t_lang("addproduct-forbidden", language)));
    }

    let Some((name, kcal)) = parse_add_product(args) else {
        return Ok(Reply::text(t_lang("addproduct-usage", language)));
    };

    ctx.store.upsert_product(&name, kcal).await?;
    info!(user_id, product = %name, kcal, "Product saved");

    Ok(Reply::text(t_args_lang(
        "addproduct-done",
        &[("product", &name), ("kcal", &format_kcal(kcal))],
        language,
    )))
}

/// Handle `/products`
pub async fn handle_list_products(ctx: &BotContext, language: &str) -> Result<Reply> {
    let products = ctx.store.list_products().await?;
    Ok(Reply::text(format_products_list(&products, language)))
}
