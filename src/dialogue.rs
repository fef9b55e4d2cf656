//! Registration dialogue module for handling conversation state with users.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::nutrition::parse_decimal;

pub const MAX_NAME_CHARS: usize = 64;

/// Represents the conversation state for the registration dialogue
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingName,
    AwaitingGoal {
        name: String,
    },
}

/// Per-user dialogue positions, keyed by Telegram user id
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<i64, ConversationState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: i64) -> ConversationState {
        self.sessions
            .lock()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Store a state; `Idle` removes the entry
    pub async fn set(&self, user_id: i64, state: ConversationState) {
        let mut sessions = self.sessions.lock().await;
        if state == ConversationState::Idle {
            sessions.remove(&user_id);
        } else {
            sessions.insert(user_id, state);
        }
    }

    pub async fn clear(&self, user_id: i64) {
        self.sessions.lock().await.remove(&user_id);
    }

    /// Number of users currently inside a dialogue
    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Empty,
    TooLong,
}

/// Validates a display name input
pub fn validate_name(name: &str) -> Result<String, NameError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }

    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(NameError::TooLong);
    }

    Ok(trimmed.to_string())
}

/// Parses a daily calorie goal; only finite values above zero are accepted
pub fn parse_goal(text: &str) -> Option<f64> {
    parse_decimal(text).filter(|goal| *goal > 0.0)
}
