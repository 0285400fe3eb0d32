//! Core data models for checkbook-cli
//!
//! This module contains the data structures that represent the budgeting
//! domain: money amounts, allocation weights, categories, budgets and check
//! register transactions.

pub mod budget;
pub mod category;
pub mod money;
pub mod transaction;
pub mod weight;

pub use budget::{parse_assignments, Budget, BudgetLine, WEIGHT_TOLERANCE};
pub use category::{CategoryName, CategoryValidationError};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionCategory, TransactionKind};
pub use weight::{Weight, WeightParseError};
