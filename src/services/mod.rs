//! Service layer for checkbook-cli
//!
//! The allocation engine decides category balances, the ledger records
//! what happened, and the account service keeps the two in step on disk.

pub mod account;
pub mod allocation;
pub mod ledger;

pub use account::{validate_account_name, Account};
pub use allocation::{AllocationEngine, AllocationSnapshot, CategorySnapshot};
pub use ledger::{ConflictResolution, ConflictResolver, TransactionLedger};
