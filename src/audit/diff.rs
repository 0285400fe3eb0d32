//! Change summaries for audit logging
//!
//! Describes how an account's balances moved between two snapshots.

use crate::services::allocation::AllocationSnapshot;

/// Summarise balance changes between two snapshots
///
/// Lists the total first, then each category whose balance changed, appeared
/// or disappeared. Returns `None` when nothing changed.
pub fn balance_diff(before: &AllocationSnapshot, after: &AllocationSnapshot) -> Option<String> {
    let mut changes = Vec::new();

    if before.total_balance != after.total_balance {
        changes.push(format!(
            "total: {} -> {}",
            before.total_balance, after.total_balance
        ));
    }

    for category in &after.categories {
        match before.categories.iter().find(|c| c.name == category.name) {
            Some(prior) if prior.balance != category.balance => changes.push(format!(
                "{}: {} -> {}",
                category.name, prior.balance, category.balance
            )),
            Some(_) => {}
            None => changes.push(format!("{}: (added) -> {}", category.name, category.balance)),
        }
    }

    for category in &before.categories {
        if !after.categories.iter().any(|c| c.name == category.name) {
            changes.push(format!("{}: {} -> (removed)", category.name, category.balance));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}
