//! Budget display formatting

use crate::models::Budget;

/// Format budget lines with their weights as decimals and percentages
pub fn format_budget(budget: &Budget) -> String {
    let name_width = budget
        .categories()
        .map(|c| c.as_str().len())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>8}  {:>8}\n",
        "Category",
        "Weight",
        "Percent",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->8}  {:->8}\n",
        "",
        "",
        "",
        name_width = name_width
    ));

    for line in budget.lines() {
        let marker = if &line.category == budget.catch_all() {
            "  (catch-all)"
        } else {
            ""
        };
        output.push_str(&format!(
            "{:<name_width$}  {:>8}  {:>8}{}\n",
            line.category.as_str(),
            line.weight.to_string(),
            line.weight.as_percent(),
            marker,
            name_width = name_width
        ));
    }

    output.push_str(&format!(
        "{:-<name_width$}  {:->8}  {:->8}\n",
        "",
        "",
        "",
        name_width = name_width
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:>8}  {:>8}\n",
        "Total",
        budget.total_weight().to_string(),
        budget.total_weight().as_percent(),
        name_width = name_width
    ));

    output
}
