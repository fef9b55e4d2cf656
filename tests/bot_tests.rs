use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use calorie_bot::bot::commands::Command;
use calorie_bot::bot::{route, BotContext, Inbound, KeyboardHint, Reply};
use calorie_bot::storage::{
    seed_products, MemoryStore, Product, SqliteStore, Store, UserRecord,
};

const USER: i64 = 4242;

async fn text(ctx: &BotContext, user_id: i64, text: &str) -> Reply {
    route(ctx, user_id, Inbound::Text(text.to_string()), "ru").await
}

async fn command(ctx: &BotContext, user_id: i64, command: Command) -> Reply {
    route(ctx, user_id, Inbound::Command(command), "ru").await
}

async fn seeded_memory_context() -> Result<(BotContext, Arc<MemoryStore>)> {
    let store = Arc::new(MemoryStore::new());
    seed_products(store.as_ref()).await?;
    Ok((BotContext::new(store.clone(), Vec::new()), store))
}

async fn register(ctx: &BotContext, user_id: i64, name: &str, goal: &str) {
    command(ctx, user_id, Command::Start).await;
    text(ctx, user_id, name).await;
    text(ctx, user_id, goal).await;
}

/// Register, log buckwheat, check statistics, reset, check again
async fn run_daily_scenario(ctx: &BotContext) {
    register(ctx, USER, "Alice", "2000").await;

    let reply = text(ctx, USER, "гречка 100").await;
    assert_eq!(reply.text, "✅ +313.0 ккал: гречка, 100 г");

    let reply = text(ctx, USER, "📊 Статистика").await;
    assert!(reply.text.contains("Цель: 2000.0 ккал"), "{}", reply.text);
    assert!(reply.text.contains("Съедено: 313.0 ккал"), "{}", reply.text);
    assert!(reply.text.contains("Осталось: 1687.0 ккал"), "{}", reply.text);
    assert_eq!(reply.keyboard, Some(KeyboardHint::Main));

    let reply = text(ctx, USER, "♻️ Сброс дня").await;
    assert!(reply.text.contains("День сброшен"));

    let reply = text(ctx, USER, "📊 Статистика").await;
    assert!(reply.text.contains("Съедено: 0.0 ккал"), "{}", reply.text);
    assert!(reply.text.contains("Осталось: 2000.0 ккал"), "{}", reply.text);
}

#[tokio::test]
async fn test_daily_scenario_in_memory() -> Result<()> {
    let (ctx, _store) = seeded_memory_context().await?;
    run_daily_scenario(&ctx).await;
    Ok(())
}

#[tokio::test]
async fn test_daily_scenario_sqlite() -> Result<()> {
    let temp_file = tempfile::NamedTempFile::new()?;
    let store = SqliteStore::connect(&temp_file.path().to_string_lossy()).await?;
    store.init().await?;
    seed_products(&store).await?;

    let ctx = BotContext::new(Arc::new(store), Vec::new());
    run_daily_scenario(&ctx).await;
    Ok(())
}

#[tokio::test]
async fn test_food_log_adds_exact_calories() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;
    register(&ctx, USER, "Bob", "2500").await;

    let cases = [("банан", 96.0, "33"), ("молоко", 52.0, "250,5"), ("рис", 344.0, "0")];
    let mut expected = 0.0;
    for (product, kcal, amount) in cases {
        let before = store.get_user(USER).await?.unwrap().eaten;
        let reply = text(&ctx, USER, &format!("{product} {amount}")).await;

        let grams: f64 = amount.replace(',', ".").parse()?;
        let added = kcal / 100.0 * grams;
        expected += added;

        let after = store.get_user(USER).await?.unwrap().eaten;
        assert!((after - before - added).abs() < 1e-9);
        assert!(reply.text.contains(&format!("+{added:.1} ккал")), "{}", reply.text);
        assert!(reply.text.contains(&format!("{product}, {amount} г")), "{}", reply.text);
    }

    assert!((store.get_user(USER).await?.unwrap().eaten - expected).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_product_lookup_is_case_insensitive() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;
    register(&ctx, USER, "Bob", "2500").await;

    let reply = text(&ctx, USER, "ГРЕЧКА 50").await;
    assert_eq!(reply.text, "✅ +156.5 ккал: гречка, 50 г");
    assert!((store.get_user(USER).await?.unwrap().eaten - 156.5).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_unknown_product_never_mutates() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;
    register(&ctx, USER, "Bob", "2500").await;
    text(&ctx, USER, "рис 100").await;

    let reply = text(&ctx, USER, "драконий фрукт").await;
    assert!(reply.text.contains("Вес должен быть"));

    let reply = text(&ctx, USER, "манго 150").await;
    assert!(reply.text.contains("«манго» не найден"));
    assert!(reply.text.contains("/addproduct манго"));

    assert_eq!(store.get_user(USER).await?.unwrap().eaten, 344.0);
    Ok(())
}

#[tokio::test]
async fn test_input_format_errors() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;
    register(&ctx, USER, "Bob", "2500").await;

    assert!(text(&ctx, USER, "гречка").await.text.contains("Напиши продукт и вес"));
    assert!(text(&ctx, USER, "гречка сто").await.text.contains("Вес должен быть"));
    assert!(text(&ctx, USER, "гречка -10").await.text.contains("Вес должен быть"));

    assert_eq!(store.get_user(USER).await?.unwrap().eaten, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_unregistered_user_must_register_first() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;

    let reply = text(&ctx, USER, "гречка 100").await;
    assert_eq!(reply.text, "Сначала зарегистрируйся: /start");

    let reply = text(&ctx, USER, "📊 Статистика").await;
    assert_eq!(reply.text, "Сначала зарегистрируйся: /start");

    // reset on an unknown user is a confirmed no-op
    let reply = text(&ctx, USER, "♻️ Сброс дня").await;
    assert!(reply.text.contains("День сброшен"));
    assert!(store.get_user(USER).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_reset_zeroes_any_total() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;
    register(&ctx, USER, "Bob", "1500").await;

    for _ in 0..7 {
        text(&ctx, USER, "сыр 100").await;
    }
    assert_eq!(store.get_user(USER).await?.unwrap().eaten, 2450.0);

    let reply = text(&ctx, USER, "📊 Статистика").await;
    assert!(reply.text.contains("Осталось: 0.0 ккал"));

    text(&ctx, USER, "♻️ Сброс дня").await;
    assert_eq!(store.get_user(USER).await?.unwrap().eaten, 0.0);
    Ok(())
}

#[tokio::test]
async fn test_english_triggers_work_for_russian_users() -> Result<()> {
    let (ctx, _store) = seeded_memory_context().await?;
    register(&ctx, USER, "Bob", "1500").await;

    let reply = text(&ctx, USER, "📊 Statistics").await;
    // answered in the user's own language
    assert!(reply.text.contains("Цель: 1500.0 ккал"));
    Ok(())
}

#[tokio::test]
async fn test_add_product_overwrites_and_is_used() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;
    register(&ctx, USER, "Bob", "2500").await;

    let reply = command(&ctx, USER, Command::AddProduct("Гречка 330".to_string())).await;
    assert_eq!(reply.text, "Продукт «гречка» сохранён: 330.0 ккал на 100 г.");
    assert_eq!(store.get_product("гречка").await?.unwrap().kcal, 330.0);

    let reply = text(&ctx, USER, "гречка 100").await;
    assert_eq!(reply.text, "✅ +330.0 ккал: гречка, 100 г");

    command(&ctx, USER, Command::AddProduct("киви 61".to_string())).await;
    let reply = text(&ctx, USER, "киви 200").await;
    assert_eq!(reply.text, "✅ +122.0 ккал: киви, 200 г");
    Ok(())
}

#[tokio::test]
async fn test_add_product_usage_errors() -> Result<()> {
    let (ctx, store) = seeded_memory_context().await?;
    let before = store.list_products().await?;

    for args in ["", "киви", "киви много", "киви зелёный 61"] {
        let reply = command(&ctx, USER, Command::AddProduct(args.to_string())).await;
        assert!(reply.text.starts_with("Использование: /addproduct"), "{args}");
    }

    assert_eq!(store.list_products().await?, before);
    Ok(())
}

#[tokio::test]
async fn test_add_product_restricted_to_admins() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ctx = BotContext::new(store.clone(), vec![1]);

    let reply = command(&ctx, 2, Command::AddProduct("киви 61".to_string())).await;
    assert!(reply.text.contains("только администраторы"));
    assert!(store.get_product("киви").await?.is_none());

    command(&ctx, 1, Command::AddProduct("киви 61".to_string())).await;
    assert!(store.get_product("киви").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_products_listing() -> Result<()> {
    let store = Arc::new(MemoryStore::new());
    let ctx = BotContext::new(store.clone(), Vec::new());

    let reply = command(&ctx, USER, Command::Products).await;
    assert_eq!(reply.text, "Список продуктов пуст.");

    store.upsert_product("банан", 96.0).await?;
    let reply = command(&ctx, USER, Command::Products).await;
    assert!(reply.text.contains("банан — 96.0"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_and_unsupported_messages() {
    let store = Arc::new(MemoryStore::new());
    let ctx = BotContext::new(store, Vec::new());

    let reply = route(&ctx, USER, Inbound::UnknownCommand, "en").await;
    assert!(reply.text.contains("/help"));

    let reply = route(&ctx, USER, Inbound::Unsupported, "en").await;
    assert_eq!(reply.text, "I only understand text messages.");
}

/// A store whose every call fails, to exercise the storage error path
struct BrokenStore;

#[async_trait]
impl Store for BrokenStore {
    async fn init(&self) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
    async fn get_user(&self, _id: i64) -> Result<Option<UserRecord>> {
        Err(anyhow!("disk on fire"))
    }
    async fn upsert_user(&self, _id: i64, _name: &str, _goal: f64) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
    async fn add_eaten(&self, _id: i64, _kcal: f64) -> Result<bool> {
        Err(anyhow!("disk on fire"))
    }
    async fn reset_eaten(&self, _id: i64) -> Result<bool> {
        Err(anyhow!("disk on fire"))
    }
    async fn get_product(&self, _name: &str) -> Result<Option<Product>> {
        Err(anyhow!("disk on fire"))
    }
    async fn upsert_product(&self, _name: &str, _kcal: f64) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
    async fn insert_product_if_absent(&self, _name: &str, _kcal: f64) -> Result<bool> {
        Err(anyhow!("disk on fire"))
    }
    async fn list_products(&self) -> Result<Vec<Product>> {
        Err(anyhow!("disk on fire"))
    }
}

#[tokio::test]
async fn test_storage_failures_become_generic_replies() {
    let ctx = BotContext::new(Arc::new(BrokenStore), Vec::new());
    let generic = "Что-то пошло не так. Попробуй ещё раз позже.";

    assert_eq!(command(&ctx, USER, Command::Start).await.text, generic);
    assert_eq!(text(&ctx, USER, "гречка 100").await.text, generic);
    assert_eq!(text(&ctx, USER, "📊 Статистика").await.text, generic);
    assert_eq!(text(&ctx, USER, "♻️ Сброс дня").await.text, generic);

    // input-format errors are answered before storage is touched
    assert!(text(&ctx, USER, "гречка").await.text.contains("Напиши продукт"));
}

#[tokio::test]
async fn test_failed_goal_write_keeps_dialogue() {
    let ctx = BotContext::new(Arc::new(BrokenStore), Vec::new());
    ctx.sessions
        .set(
            USER,
            calorie_bot::dialogue::ConversationState::AwaitingGoal {
                name: "Alice".to_string(),
            },
        )
        .await;

    let reply = text(&ctx, USER, "2000").await;
    assert!(reply.text.contains("Что-то пошло не так"));
    assert!(matches!(
        ctx.sessions.get(USER).await,
        calorie_bot::dialogue::ConversationState::AwaitingGoal { .. }
    ));
}
