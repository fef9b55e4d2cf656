//! Embedded SQLite implementation of [`Store`]

use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::{normalize_product_name, Product, Store, UserRecord};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (and create if missing) the database file at `path`
    pub async fn connect(path: &str) -> Result<Self> {
        info!(path, "Opening SQLite database");

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {path}"))?;

        Ok(Self { pool })
    }

    /// A private in-memory database, mostly for tests
    pub async fn connect_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Failed to build in-memory options")?;

        // Every connection to :memory: is a separate database, so keep exactly one alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn init(&self) -> Result<()> {
        info!("Initializing database schema...");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                goal REAL NOT NULL,
                eaten REAL NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create users table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS products (
                product_name TEXT PRIMARY KEY,
                kcal REAL NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create products table")?;

        info!("Database schema initialized successfully");
        Ok(())
    }

    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, goal, eaten FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read user")?;

        debug!(user_id = id, found = user.is_some(), "User lookup");
        Ok(user)
    }

    async fn upsert_user(&self, id: i64, name: &str, goal: f64) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO users (id, name, goal, eaten) VALUES (?1, ?2, ?3, 0)")
            .bind(id)
            .bind(name)
            .bind(goal)
            .execute(&self.pool)
            .await
            .context("Failed to upsert user")?;

        Ok(())
    }

    async fn add_eaten(&self, id: i64, kcal: f64) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET eaten = eaten + ?1 WHERE id = ?2")
            .bind(kcal)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update eaten calories")?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset_eaten(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET eaten = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to reset eaten calories")?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_product(&self, name: &str) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT product_name, kcal FROM products WHERE product_name = ?1",
        )
        .bind(normalize_product_name(name))
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read product")?;

        Ok(product)
    }

    async fn upsert_product(&self, name: &str, kcal: f64) -> Result<()> {
        sqlx::query("INSERT OR REPLACE INTO products (product_name, kcal) VALUES (?1, ?2)")
            .bind(normalize_product_name(name))
            .bind(kcal)
            .execute(&self.pool)
            .await
            .context("Failed to upsert product")?;

        Ok(())
    }

    async fn insert_product_if_absent(&self, name: &str, kcal: f64) -> Result<bool> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO products (product_name, kcal) VALUES (?1, ?2)")
                .bind(normalize_product_name(name))
                .bind(kcal)
                .execute(&self.pool)
                .await
                .context("Failed to insert product")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT product_name, kcal FROM products ORDER BY product_name",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list products")?;

        Ok(products)
    }
}
