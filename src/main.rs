use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::dispatching::ShutdownToken;
use teloxide::payloads::DeleteWebhookSetters;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;
use tracing::{info, warn};

use calorie_bot::bot::{build_handler, BotContext};
use calorie_bot::config::{AppConfig, DeliveryMode};
use calorie_bot::errors::BotError;
use calorie_bot::storage::{seed_products, SqliteStore, Store};

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "calorie_bot=info,teloxide=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// Stop the dispatcher gracefully when the platform sends SIGTERM
fn spawn_sigterm_listener(token: ShutdownToken) {
    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                return;
            }
        };

        sigterm.recv().await;
        info!("SIGTERM received, shutting down");
        match token.shutdown() {
            Ok(shutdown) => shutdown.await,
            Err(_) => info!("Dispatcher was not running"),
        }
    });

    #[cfg(not(unix))]
    drop(token);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting calorie bot");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let store = SqliteStore::connect(&config.database_path).await?;
    store.init().await?;
    seed_products(&store).await?;

    let store: Arc<dyn Store> = Arc::new(store);
    let context = Arc::new(BotContext::new(store, config.admin_ids.clone()));

    let bot = Bot::new(&config.bot_token);

    let mut dispatcher = Dispatcher::builder(bot.clone(), build_handler())
        .dependencies(dptree::deps![context])
        .default_handler(|upd| async move {
            tracing::debug!(update = ?upd, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build();

    spawn_sigterm_listener(dispatcher.shutdown_token());

    match config.delivery_mode() {
        DeliveryMode::Polling => {
            info!("Starting long polling");
            bot.delete_webhook().drop_pending_updates(true).await?;
            dispatcher.dispatch().await;
        }
        DeliveryMode::Webhook { url, addr } => {
            info!(%addr, "Starting webhook server");
            let options = webhooks::Options::new(addr, url.parse().context("Invalid webhook URL")?);
            let listener = webhooks::axum(bot.clone(), options)
                .await
                .map_err(|e| BotError::Webhook(e.to_string()))?;

            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await;
        }
    }

    info!("Bot stopped");
    Ok(())
}
