//! # Storage Module
//!
//! The row store behind the bot: a `users` namespace keyed by Telegram user
//! id and a `products` namespace keyed by lowercase product name. Every
//! operation is a single statement; nothing holds a connection between calls.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::nutrition::DEFAULT_PRODUCTS;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Represents a registered user
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub goal: f64,
    pub eaten: f64,
}

/// Represents a known food item
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    #[sqlx(rename = "product_name")]
    pub name: String,
    /// Calories per 100 g
    pub kcal: f64,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Create both tables if they do not exist
    async fn init(&self) -> Result<()>;

    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Create or overwrite a user with `eaten = 0`
    async fn upsert_user(&self, id: i64, name: &str, goal: f64) -> Result<()>;

    /// Add to a user's daily total. Returns false when the user does not exist.
    async fn add_eaten(&self, id: i64, kcal: f64) -> Result<bool>;

    /// Zero a user's daily total. Returns false when the user does not exist.
    async fn reset_eaten(&self, id: i64) -> Result<bool>;

    async fn get_product(&self, name: &str) -> Result<Option<Product>>;

    /// Create or overwrite a product
    async fn upsert_product(&self, name: &str, kcal: f64) -> Result<()>;

    /// Insert a product unless it already exists. Returns true when inserted.
    async fn insert_product_if_absent(&self, name: &str, kcal: f64) -> Result<bool>;

    /// All products ordered by name
    async fn list_products(&self) -> Result<Vec<Product>>;
}

/// Insert the default product list without touching existing rows
pub async fn seed_products(store: &dyn Store) -> Result<usize> {
    let mut inserted = 0;
    for (name, kcal) in DEFAULT_PRODUCTS {
        if store.insert_product_if_absent(name, *kcal).await? {
            inserted += 1;
        }
    }

    info!(
        inserted,
        total = DEFAULT_PRODUCTS.len(),
        "Default products seeded"
    );
    Ok(inserted)
}

/// Product names are stored and looked up in lowercase
pub(crate) fn normalize_product_name(name: &str) -> String {
    name.trim().to_lowercase()
}
