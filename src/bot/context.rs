//! Shared state handed to every handler

use std::sync::Arc;

use crate::dialogue::SessionStore;
use crate::storage::Store;

/// Application context built once at startup and shared between updates
#[derive(Clone)]
pub struct BotContext {
    pub store: Arc<dyn Store>,
    pub sessions: SessionStore,
    admin_ids: Vec<i64>,
}

impl BotContext {
    pub fn new(store: Arc<dyn Store>, admin_ids: Vec<i64>) -> Self {
        Self {
            store,
            sessions: SessionStore::new(),
            admin_ids,
        }
    }

    /// Everyone is an admin unless an explicit list was configured
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_ids.is_empty() || self.admin_ids.contains(&user_id)
    }
}
