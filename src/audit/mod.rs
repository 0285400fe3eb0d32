//! Audit logging for checkbook-cli
//!
//! Records every account operation with before/after state in an
//! append-only audit log.
//!
//! # Architecture
//!
//! - `AuditEntry`: a single entry with timestamp, operation, account name,
//!   and optional before/after values.
//! - `AuditLogger`: writes entries to the audit log file as line-delimited
//!   JSON (JSONL) and reads them back.
//! - `balance_diff`: human-readable summary of balance changes between two
//!   allocation snapshots.
//!
//! # Example
//!
//! ```rust,ignore
//! use checkbook_cli::audit::{balance_diff, AuditEntry, AuditLogger, Operation};
//!
//! let logger = AuditLogger::new(audit_log_path);
//! let before = engine.snapshot();
//! engine.deposit(amount)?;
//! let after = engine.snapshot();
//! let entry = AuditEntry::change(
//!     Operation::Deposit,
//!     "check_register",
//!     &before,
//!     &after,
//!     balance_diff(&before, &after),
//! );
//! logger.log(&entry)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::balance_diff;
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
