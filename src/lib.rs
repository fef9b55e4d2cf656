//! # Calorie Telegram Bot
//!
//! A Telegram bot that registers a daily calorie goal, logs food by looking
//! up calories per 100 g in a product table, and reports or resets the
//! running daily total.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod nutrition;
pub mod storage;
