//! Audit entry data structures
//!
//! Defines the operations that are audited and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Account created with its starting balance
    Open,
    /// Money deposited and allocated
    Deposit,
    /// Money withdrawn from one category
    Withdraw,
    /// Budget replaced and balance redistributed
    Rebudget,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Open => write!(f, "OPEN"),
            Operation::Deposit => write!(f, "DEPOSIT"),
            Operation::Withdraw => write!(f, "WITHDRAW"),
            Operation::Rebudget => write!(f, "REBUDGET"),
        }
    }
}

/// A single audit log entry
///
/// Records one operation on an account with optional before/after state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Name of the account the operation applied to
    pub account: String,

    /// Account state before the operation (absent for `Open`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Account state after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable summary of what changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl AuditEntry {
    /// Entry for a newly opened account
    pub fn open<T: Serialize>(account: impl Into<String>, state: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Open,
            account: account.into(),
            before: None,
            after: serde_json::to_value(state).ok(),
            summary: None,
        }
    }

    /// Entry for an operation that changed existing state
    pub fn change<T: Serialize>(
        operation: Operation,
        account: impl Into<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            account: account.into(),
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            summary,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.account
        );

        if let Some(summary) = &self.summary {
            output.push_str(&format!("\n  Changes: {}", summary));
        }

        output
    }
}
