//! Display formatting for terminal output
//!
//! Formats allocation snapshots and budgets as plain-text tables.

pub mod balance;
pub mod budget;

pub use balance::format_balance;
pub use budget::format_budget;
