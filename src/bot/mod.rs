//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `commands`: The slash commands the bot understands
//! - `context`: Shared state handed to every handler
//! - `router`: Transport-independent routing of one inbound message to a reply
//! - `dialogue_manager`: Registration dialogue steps
//! - `ledger_handler`: Food logging, statistics, reset and product commands
//! - `ui_builder`: Reply type and keyboards
//! - `message_handler`: Teloxide endpoint and dispatcher wiring

pub mod commands;
pub mod context;
pub mod dialogue_manager;
pub mod ledger_handler;
pub mod message_handler;
pub mod router;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use context::BotContext;
pub use message_handler::{build_handler, message_handler};
pub use router::{route, Inbound};
pub use ui_builder::{KeyboardHint, Reply};
