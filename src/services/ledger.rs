//! Transaction ledger
//!
//! The ledger is the append-only history of every balance-affecting event.
//! It is told about balance changes by the account service and never decides
//! them itself. Each append is written through to the register file before
//! the in-memory copy is updated, so the file always reflects the last
//! completed operation.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

use crate::error::{CheckbookError, CheckbookResult};
use crate::models::{Money, Transaction, TransactionKind};
use crate::storage::RegisterFile;

/// What to do when a new register would land on an existing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Replace the existing file with a fresh register
    Overwrite,
    /// Try again under another path
    Rename(PathBuf),
    /// Give up; initialization fails with `LedgerExists`
    Abort,
}

/// Decides how to handle an existing register file
///
/// Implemented for closures so callers can answer inline.
pub trait ConflictResolver {
    fn resolve(&mut self, existing: &Path) -> CheckbookResult<ConflictResolution>;
}

impl<F> ConflictResolver for F
where
    F: FnMut(&Path) -> CheckbookResult<ConflictResolution>,
{
    fn resolve(&mut self, existing: &Path) -> CheckbookResult<ConflictResolution> {
        self(existing)
    }
}

/// Ordered, append-only record of transactions backed by a register file
#[derive(Debug)]
pub struct TransactionLedger {
    register: RegisterFile,
    records: Vec<Transaction>,
}

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

impl TransactionLedger {
    /// Start a new register at `path` holding the starting balance row
    ///
    /// If a file already exists at the chosen path, `resolver` decides
    /// whether to overwrite it, pick another path, or abort.
    pub fn initialize<R: ConflictResolver>(
        path: impl Into<PathBuf>,
        date: NaiveDate,
        starting_balance: Money,
        resolver: &mut R,
    ) -> CheckbookResult<Self> {
        let mut path = path.into();

        while path.exists() {
            match resolver.resolve(&path)? {
                ConflictResolution::Overwrite => {
                    tracing::info!(path = %path.display(), "overwriting existing register");
                    break;
                }
                ConflictResolution::Rename(next) => path = next,
                ConflictResolution::Abort => return Err(CheckbookError::LedgerExists(path)),
            }
        }

        let register = RegisterFile::new(path);
        let initial = Transaction::starting_balance(date, starting_balance);
        register.create(std::slice::from_ref(&initial))?;

        Ok(Self {
            register,
            records: vec![initial],
        })
    }

    /// Reopen an existing register, reading every row back in order
    pub fn open(path: impl Into<PathBuf>) -> CheckbookResult<Self> {
        let register = RegisterFile::new(path);
        let records = register.load()?;
        Ok(Self { register, records })
    }

    /// Append a deposit or withdrawal and persist it
    ///
    /// # Errors
    ///
    /// `Validation` for a second starting balance row; `Storage`/`Csv` if
    /// the row could not be written, in which case the ledger is unchanged.
    pub fn append(&mut self, transaction: Transaction) -> CheckbookResult<&Transaction> {
        if transaction.kind == TransactionKind::Initial {
            return Err(CheckbookError::Validation(
                "A register has exactly one starting balance row".into(),
            ));
        }

        self.register.append(&transaction)?;
        self.records.push(transaction);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Every record in insertion order
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    /// Number of records, including the starting balance row
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total balance recorded by the latest row
    pub fn last_balance(&self) -> Money {
        self.records
            .last()
            .map(|r| r.balance_after)
            .unwrap_or_default()
    }

    /// Path of the backing register file
    pub fn path(&self) -> &Path {
        self.register.path()
    }

    /// Table of every record, oldest first, using `symbol` for amounts
    pub fn render(&self, symbol: &str) -> String {
        let rows = self.records.iter().map(|r| RegisterRow {
            date: r.date.to_string(),
            kind: r.kind.to_string(),
            category: r.category.to_string(),
            amount: r.amount.format_with_symbol(symbol),
            balance: r.balance_after.format_with_symbol(symbol),
        });

        Table::new(rows)
            .with(Style::psql())
            .modify(Columns::new(3..), Alignment::right())
            .to_string()
    }
}
