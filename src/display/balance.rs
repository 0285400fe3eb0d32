//! Balance display formatting
//!
//! Formats the total balance and every category's allocated share.

use crate::services::AllocationSnapshot;

/// Format the total balance followed by one line per category
pub fn format_balance(snapshot: &AllocationSnapshot, symbol: &str) -> String {
    let name_width = snapshot
        .categories
        .iter()
        .map(|c| c.name.as_str().len() + if c.is_catch_all { 2 } else { 0 })
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "Total balance: {}\n\n",
        snapshot.total_balance.format_with_symbol(symbol)
    ));

    output.push_str(&format!(
        "{:<name_width$}  {:>14}\n",
        "Category",
        "Balance",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->14}\n",
        "",
        "",
        name_width = name_width
    ));

    for category in &snapshot.categories {
        let label = if category.is_catch_all {
            format!("{} *", category.name)
        } else {
            category.name.to_string()
        };
        output.push_str(&format!(
            "{:<name_width$}  {:>14}\n",
            label,
            category.balance.format_with_symbol(symbol),
            name_width = name_width
        ));
    }

    output.push_str("\n* catch-all category\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, Money};
    use crate::services::AllocationEngine;

    #[test]
    fn test_format_balance_lists_every_category() {
        let engine = AllocationEngine::new(Money::from_cents(123_456), Budget::standard()).unwrap();
        let output = format_balance(&engine.snapshot(), "$");

        assert!(output.starts_with("Total balance: $1,234.56\n"));
        for name in ["housing", "food", "car", "clothing", "entertainment"] {
            assert!(output.contains(name), "missing {}", name);
        }
        assert!(output.contains("other *"));
        assert!(output.contains("$370.37"));
    }

    #[test]
    fn test_format_balance_shows_negative_categories() {
        let mut engine =
            AllocationEngine::new(Money::from_cents(100_000), Budget::standard()).unwrap();
        engine
            .withdraw(
                &crate::models::CategoryName::new("housing").unwrap(),
                Money::from_cents(50_000),
            )
            .unwrap();

        let output = format_balance(&engine.snapshot(), "€");
        assert!(output.contains("-€200.00"));
        assert!(output.contains("Total balance: €500.00"));
    }
}
