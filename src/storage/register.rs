//! Check register CSV file
//!
//! The register is a CSV file with one row per transaction, in the order the
//! transactions happened:
//!
//! ```text
//! transaction_date,transaction_type,budget_category,transaction_amount,current_balance
//! 2025-01-01,starting balance,none,1000.00,1000.00
//! 2025-01-02,deposit,all,33.33,1033.33
//! ```
//!
//! The file is created atomically with its header and starting row; later
//! rows are appended and flushed one at a time.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::{CheckbookError, CheckbookResult};
use crate::models::{Transaction, TransactionKind};

use super::file_io::write_atomic;

/// Handle on a register file
#[derive(Debug, Clone)]
pub struct RegisterFile {
    path: PathBuf,
}

impl RegisterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (or replace) the file with a header and the given rows
    pub fn create(&self, rows: &[Transaction]) -> CheckbookResult<()> {
        write_atomic(&self.path, |writer| {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
            Ok(())
        })
    }

    /// Append a single row and flush it to disk
    pub fn append(&self, row: &Transaction) -> CheckbookResult<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                CheckbookError::Storage(format!(
                    "Failed to open register {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        csv_writer.serialize(row)?;
        csv_writer.flush().map_err(|e| {
            CheckbookError::Storage(format!("Failed to write register row: {}", e))
        })?;

        let file = csv_writer
            .into_inner()
            .map_err(|e| CheckbookError::Storage(format!("Failed to flush register: {}", e)))?;
        file.sync_data().map_err(|e| {
            CheckbookError::Storage(format!("Failed to sync register: {}", e))
        })?;
        Ok(())
    }

    /// Read every row back, in file order
    ///
    /// # Errors
    ///
    /// `Storage` if the file is missing or empty, or does not open with a
    /// starting balance row; `Csv` if a row cannot be parsed.
    pub fn load(&self) -> CheckbookResult<Vec<Transaction>> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            CheckbookError::Storage(format!(
                "Failed to open register {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let rows = reader
            .deserialize()
            .enumerate()
            .map(|(i, row)| {
                row.map_err(|e| {
                    CheckbookError::Csv(format!(
                        "{} row {}: {}",
                        self.path.display(),
                        i + 1,
                        e
                    ))
                })
            })
            .collect::<CheckbookResult<Vec<Transaction>>>()?;

        match rows.first() {
            Some(first) if first.kind == TransactionKind::Initial => {}
            Some(_) => {
                return Err(CheckbookError::Storage(format!(
                    "{} does not start with a starting balance row",
                    self.path.display()
                )))
            }
            None => {
                return Err(CheckbookError::Storage(format!(
                    "{} has no rows",
                    self.path.display()
                )))
            }
        }

        if let Some(extra) = rows.iter().skip(1).position(|r| r.kind == TransactionKind::Initial) {
            return Err(CheckbookError::Storage(format!(
                "{} has a second starting balance row at row {}",
                self.path.display(),
                extra + 2
            )));
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryName, Money};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn initial() -> Transaction {
        Transaction::starting_balance(date(1), Money::from_cents(100_000))
    }

    #[test]
    fn test_create_writes_header_and_starting_row() {
        let temp_dir = TempDir::new().unwrap();
        let register = RegisterFile::new(temp_dir.path().join("check_register.csv"));

        register.create(&[initial()]).unwrap();

        let contents = fs::read_to_string(register.path()).unwrap();
        assert_eq!(
            contents,
            "transaction_date,transaction_type,budget_category,transaction_amount,current_balance\n\
             2025-01-01,starting balance,none,1000.00,1000.00\n"
        );
    }

    #[test]
    fn test_append_then_load_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let register = RegisterFile::new(temp_dir.path().join("check_register.csv"));
        register.create(&[initial()]).unwrap();

        let deposit =
            Transaction::deposit(date(2), Money::from_cents(3333), Money::from_cents(103_333));
        let withdrawal = Transaction::withdrawal(
            date(3),
            CategoryName::new("housing").unwrap(),
            Money::from_cents(50_000),
            Money::from_cents(53_333),
        );
        register.append(&deposit).unwrap();
        register.append(&withdrawal).unwrap();

        let rows = register.load().unwrap();
        assert_eq!(rows, vec![initial(), deposit, withdrawal]);

        let contents = fs::read_to_string(register.path()).unwrap();
        assert!(contents.ends_with("2025-01-03,withdrawal,housing,500.00,533.33\n"));
        assert_eq!(contents.lines().count(), 4);
    }

    #[test]
    fn test_append_requires_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let register = RegisterFile::new(temp_dir.path().join("missing.csv"));

        let err = register.append(&initial()).unwrap_err();
        assert!(matches!(err, CheckbookError::Storage(_)));
    }

    #[test]
    fn test_load_rejects_register_without_starting_row() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.csv");
        fs::write(
            &path,
            "transaction_date,transaction_type,budget_category,transaction_amount,current_balance\n\
             2025-01-02,deposit,all,33.33,33.33\n",
        )
        .unwrap();

        let err = RegisterFile::new(&path).load().unwrap_err();
        assert!(matches!(err, CheckbookError::Storage(_)));
    }

    #[test]
    fn test_load_rejects_empty_and_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.csv");
        fs::write(
            &empty,
            "transaction_date,transaction_type,budget_category,transaction_amount,current_balance\n",
        )
        .unwrap();
        assert!(matches!(
            RegisterFile::new(&empty).load(),
            Err(CheckbookError::Storage(_))
        ));

        let malformed = temp_dir.path().join("malformed.csv");
        fs::write(
            &malformed,
            "transaction_date,transaction_type,budget_category,transaction_amount,current_balance\n\
             2025-01-01,starting balance,none,lots,1000.00\n",
        )
        .unwrap();
        assert!(matches!(
            RegisterFile::new(&malformed).load(),
            Err(CheckbookError::Csv(_))
        ));
    }
}
