//! Slash commands recognised in every conversation state

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "register or get a welcome back")]
    Start,
    #[command(description = "show usage help")]
    Help,
    #[command(description = "abandon the registration dialogue")]
    Cancel,
    #[command(description = "list known products")]
    Products,
    #[command(description = "add or update a product: /addproduct <name> <kcal>")]
    AddProduct(String),
}
