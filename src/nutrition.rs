//! # Nutrition Module
//!
//! Parsing of food log entries and `/addproduct` arguments, calorie
//! arithmetic, and the product table shipped with the bot.

/// Products inserted at startup, in kcal per 100 g
pub const DEFAULT_PRODUCTS: &[(&str, f64)] = &[
    ("гречка", 313.0),
    ("рис", 344.0),
    ("овсянка", 352.0),
    ("макароны", 350.0),
    ("хлеб", 265.0),
    ("картофель", 77.0),
    ("курица", 190.0),
    ("говядина", 250.0),
    ("яйцо", 157.0),
    ("молоко", 52.0),
    ("творог", 121.0),
    ("сыр", 350.0),
    ("яблоко", 52.0),
    ("банан", 96.0),
    ("огурец", 15.0),
    ("помидор", 20.0),
];

/// A parsed `<product> <amount>` message
#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    /// Lowercased product token
    pub product: String,
    /// Grams
    pub amount: f64,
    /// The amount exactly as the user typed it
    pub amount_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodEntryError {
    /// Fewer than two tokens
    MissingAmount,
    /// Amount is not a non-negative number
    InvalidAmount,
}

/// Parses a decimal number accepting both `.` and `,` as separator.
/// Non-finite spellings such as `inf` or `NaN` are rejected.
pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Splits the lowercased, trimmed text on its first whitespace run
pub fn parse_food_entry(text: &str) -> Result<FoodEntry, FoodEntryError> {
    let normalized = text.trim().to_lowercase();
    let mut parts = normalized.splitn(2, char::is_whitespace);

    let product = parts.next().unwrap_or_default();
    let amount_text = parts.next().map(str::trim).unwrap_or_default();
    if product.is_empty() || amount_text.is_empty() {
        return Err(FoodEntryError::MissingAmount);
    }

    let amount = parse_decimal(amount_text)
        .filter(|amount| *amount >= 0.0)
        .ok_or(FoodEntryError::InvalidAmount)?;

    Ok(FoodEntry {
        product: product.to_string(),
        amount,
        amount_text: amount_text.to_string(),
    })
}

/// Parses `/addproduct` arguments: exactly a name and kcal per 100 g
pub fn parse_add_product(args: &str) -> Option<(String, f64)> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let [name, kcal] = tokens.as_slice() else {
        return None;
    };

    let kcal = parse_decimal(kcal).filter(|kcal| *kcal >= 0.0)?;
    Some((name.to_lowercase(), kcal))
}

/// Calories contained in `amount` grams of a product
pub fn calories_for(kcal_per_100: f64, amount: f64) -> f64 {
    kcal_per_100 / 100.0 * amount
}

/// Calories still available today, never negative
pub fn remaining(goal: f64, eaten: f64) -> f64 {
    (goal - eaten).max(0.0)
}

/// One decimal place, the way every reply shows calories
pub fn format_kcal(value: f64) -> String {
    format!("{value:.1}")
}
