//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod audit;
pub mod budget;
pub mod prompt;

pub use account::{
    handle_balance_command, handle_deposit_command, handle_init_command,
    handle_register_command, handle_withdraw_command, InitArgs,
};
pub use audit::handle_audit_command;
pub use budget::{handle_budget_command, BudgetCommands};
pub use prompt::{FlagResolver, PromptResolver};

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{CheckbookError, CheckbookResult};
use crate::models::Money;

/// Parse a date argument, defaulting to today
pub(crate) fn resolve_date(settings: &Settings, date: Option<&str>) -> CheckbookResult<NaiveDate> {
    match date {
        Some(date) => settings.parse_date(date),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parse an amount argument such as "33.33" or "$1,000"
pub(crate) fn parse_amount(amount: &str) -> CheckbookResult<Money> {
    Money::parse(amount).map_err(|e| {
        CheckbookError::InvalidAmount(format!(
            "'{}' is not an amount (use a format like '100' or '33.33'): {}",
            amount, e
        ))
    })
}
