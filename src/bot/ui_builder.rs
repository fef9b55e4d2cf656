//! UI Builder module for reply types, keyboards and message formatting

use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};

use crate::localization::{t_args_lang, t_lang};
use crate::nutrition::{format_kcal, remaining};
use crate::storage::{Product, UserRecord};

/// Keyboard to attach to a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardHint {
    /// Statistics and reset buttons
    Main,
}

/// Outbound text plus an optional keyboard hint
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<KeyboardHint>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_main_keyboard(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(KeyboardHint::Main),
        }
    }
}

/// Create the persistent reply keyboard
pub fn create_main_keyboard(language: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(t_lang("button-stats", language)),
        KeyboardButton::new(t_lang("button-reset", language)),
    ]])
    .resize_keyboard()
}

pub fn reply_markup(hint: KeyboardHint, language: &str) -> ReplyMarkup {
    match hint {
        KeyboardHint::Main => ReplyMarkup::Keyboard(create_main_keyboard(language)),
    }
}

/// Format goal, eaten and remaining calories for a user
pub fn format_statistics(user: &UserRecord, language: &str) -> String {
    t_args_lang(
        "stats",
        &[
            ("goal", &format_kcal(user.goal)),
            ("eaten", &format_kcal(user.eaten)),
            ("left", &format_kcal(remaining(user.goal, user.eaten))),
        ],
        language,
    )
}

/// Format products as a simple list
pub fn format_products_list(products: &[Product], language: &str) -> String {
    if products.is_empty() {
        return t_lang("products-empty", language);
    }

    let mut result = t_lang("products-title", language);
    for product in products {
        result.push_str(&format!("\n• {} — {}", product.name, format_kcal(product.kcal)));
    }

    result
}
