use crate::savings::Savings;

/// Prices are plain rupee amounts per kilogram.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Format an amount for display, e.g. `₹80.00`.
pub fn format_price(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{amount:.2}")
}

pub fn format_price_per_kg(amount: f64) -> String {
    format!("{}/kg", format_price(amount))
}

/// Savings badge text, e.g. `Save ₹20.00 (20.0%)`. Empty when nothing is saved.
pub fn format_savings(savings: &Savings) -> String {
    if !savings.has_savings() {
        return String::new();
    }
    format!(
        "Save {} ({:.1}%)",
        format_price(savings.absolute),
        savings.percentage
    )
}
