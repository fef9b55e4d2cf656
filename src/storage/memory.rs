//! In-memory implementation of [`Store`], used by tests

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{normalize_product_name, Product, Store, UserRecord};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<i64, UserRecord>>,
    products: RwLock<BTreeMap<String, f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn upsert_user(&self, id: i64, name: &str, goal: f64) -> Result<()> {
        self.users.write().await.insert(
            id,
            UserRecord {
                id,
                name: name.to_string(),
                goal,
                eaten: 0.0,
            },
        );
        Ok(())
    }

    async fn add_eaten(&self, id: i64, kcal: f64) -> Result<bool> {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.eaten += kcal;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reset_eaten(&self, id: i64) -> Result<bool> {
        match self.users.write().await.get_mut(&id) {
            Some(user) => {
                user.eaten = 0.0;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_product(&self, name: &str) -> Result<Option<Product>> {
        let name = normalize_product_name(name);
        Ok(self
            .products
            .read()
            .await
            .get(&name)
            .map(|kcal| Product { name, kcal: *kcal }))
    }

    async fn upsert_product(&self, name: &str, kcal: f64) -> Result<()> {
        self.products
            .write()
            .await
            .insert(normalize_product_name(name), kcal);
        Ok(())
    }

    async fn insert_product_if_absent(&self, name: &str, kcal: f64) -> Result<bool> {
        let mut products = self.products.write().await;
        let name = normalize_product_name(name);
        if products.contains_key(&name) {
            return Ok(false);
        }
        products.insert(name, kcal);
        Ok(true)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .map(|(name, kcal)| Product {
                name: name.clone(),
                kcal: *kcal,
            })
            .collect())
    }
}
