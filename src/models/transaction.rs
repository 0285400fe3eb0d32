//! Check register transaction model
//!
//! Each transaction is one row of the check register: the starting balance,
//! a deposit spread across every category, or a withdrawal from a single
//! category. Every row records the total balance after it was applied.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryName;
use super::money::Money;

/// Kind of balance-affecting event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// The opening row of every register
    #[serde(rename = "starting balance")]
    Initial,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "withdrawal")]
    Withdrawal,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "starting balance"),
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// Which categories a transaction touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransactionCategory {
    /// Starting balance row
    None,
    /// Deposits are spread over every category
    All,
    /// Withdrawals come out of exactly one category
    Category(CategoryName),
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::All => write!(f, "all"),
            Self::Category(name) => write!(f, "{}", name),
        }
    }
}

impl TryFrom<String> for TransactionCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "none" => Ok(Self::None),
            "all" => Ok(Self::All),
            other => CategoryName::new(other)
                .map(Self::Category)
                .map_err(|e| e.to_string()),
        }
    }
}

impl From<TransactionCategory> for String {
    fn from(category: TransactionCategory) -> Self {
        category.to_string()
    }
}

/// One row of the check register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date
    #[serde(rename = "transaction_date")]
    pub date: NaiveDate,

    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,

    #[serde(rename = "budget_category")]
    pub category: TransactionCategory,

    /// Amount moved (always non-negative; direction comes from `kind`)
    #[serde(rename = "transaction_amount", with = "decimal")]
    pub amount: Money,

    /// Total balance after this transaction
    #[serde(rename = "current_balance", with = "decimal")]
    pub balance_after: Money,
}

impl Transaction {
    /// The opening row for a register starting at `balance`
    pub fn starting_balance(date: NaiveDate, balance: Money) -> Self {
        Self {
            date,
            kind: TransactionKind::Initial,
            category: TransactionCategory::None,
            amount: balance,
            balance_after: balance,
        }
    }

    /// A deposit spread over all categories
    pub fn deposit(date: NaiveDate, amount: Money, balance_after: Money) -> Self {
        Self {
            date,
            kind: TransactionKind::Deposit,
            category: TransactionCategory::All,
            amount,
            balance_after,
        }
    }

    /// A withdrawal from a single category
    pub fn withdrawal(
        date: NaiveDate,
        category: CategoryName,
        amount: Money,
        balance_after: Money,
    ) -> Self {
        Self {
            date,
            kind: TransactionKind::Withdrawal,
            category: TransactionCategory::Category(category),
            amount,
            balance_after,
        }
    }
}

/// Money as a plain two-decimal string ("33.33") for the register columns
mod decimal {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&money.to_decimal_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Money::parse(&raw).map_err(serde::de::Error::custom)
    }
}
