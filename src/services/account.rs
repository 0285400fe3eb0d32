//! Account service
//!
//! An account pairs an allocation engine with its check register. Every
//! deposit and withdrawal is first applied to a copy of the engine, then
//! written to the register, and only then committed. The register always
//! explains the balance. Account state (budget and category balances) is
//! kept in a JSON file next to the register so the account can be reopened.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::audit::{balance_diff, AuditEntry, AuditLogger, Operation};
use crate::config::CheckbookPaths;
use crate::error::{CheckbookError, CheckbookResult};
use crate::models::{Budget, BudgetLine, CategoryName, Money, Transaction};
use crate::services::allocation::{AllocationEngine, AllocationSnapshot};
use crate::services::ledger::{ConflictResolver, TransactionLedger};
use crate::storage::{read_json, write_json_atomic};

/// A budgeted account backed by a register file and a state file
#[derive(Debug)]
pub struct Account {
    name: String,
    engine: AllocationEngine,
    ledger: TransactionLedger,
    state_path: PathBuf,
    audit: AuditLogger,
}

/// Check that an account name is usable as a file name
pub fn validate_account_name(name: &str) -> CheckbookResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(CheckbookError::Validation(format!(
            "Account name '{}' may only contain letters, digits, '_', '-' and '.'",
            name
        )))
    }
}

/// State file stored alongside a register (`name.csv` -> `name.state.json`)
fn state_path_for(register: &Path) -> PathBuf {
    let stem = register
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    register.with_file_name(format!("{}.state.json", stem))
}

impl Account {
    /// Open a new account with `starting_balance` allocated under `budget`
    ///
    /// The register is created at `paths.register_file(name)`; if that file
    /// exists, `resolver` decides what happens. When the resolver picks a
    /// different file, the account takes that file's name.
    pub fn create<R: ConflictResolver>(
        paths: &CheckbookPaths,
        name: &str,
        date: NaiveDate,
        starting_balance: Money,
        budget: Budget,
        resolver: &mut R,
    ) -> CheckbookResult<Self> {
        validate_account_name(name)?;
        let engine = AllocationEngine::new(starting_balance, budget)?;

        paths.ensure_directories()?;
        let ledger = TransactionLedger::initialize(
            paths.register_file(name),
            date,
            starting_balance,
            resolver,
        )?;

        let name = ledger
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        let state_path = state_path_for(ledger.path());

        let account = Self {
            name,
            engine,
            ledger,
            state_path,
            audit: AuditLogger::new(paths.audit_log()),
        };
        account.save_state()?;
        account.record(AuditEntry::open(&account.name, &account.engine.snapshot()));

        tracing::info!(
            account = %account.name,
            starting_balance = %starting_balance,
            "opened account"
        );
        Ok(account)
    }

    /// Reopen an existing account from its register and state file
    ///
    /// # Errors
    ///
    /// `Storage` if either file is missing or unreadable, or if the
    /// register's last balance does not match the stored total.
    pub fn open(paths: &CheckbookPaths, name: &str) -> CheckbookResult<Self> {
        validate_account_name(name)?;

        let register_path = paths.register_file(name);
        if !register_path.exists() {
            return Err(CheckbookError::Storage(format!(
                "No account named '{}' (missing {})",
                name,
                register_path.display()
            )));
        }

        let ledger = TransactionLedger::open(register_path)?;
        let state_path = paths.state_file(name);
        let engine: AllocationEngine = read_json(&state_path)?;

        // A state write that failed after its register row leaves the two apart
        if ledger.last_balance() != engine.total_balance() {
            return Err(CheckbookError::Storage(format!(
                "Register {} ends at {} but account state {} holds {}. \
                 Restore the state file or remove the register's last row to match",
                ledger.path().display(),
                ledger.last_balance(),
                state_path.display(),
                engine.total_balance()
            )));
        }

        tracing::debug!(account = %name, rows = ledger.len(), "reopened account");
        Ok(Self {
            name: name.to_string(),
            engine,
            ledger,
            state_path,
            audit: AuditLogger::new(paths.audit_log()),
        })
    }

    /// Deposit `amount`, spreading it across every category
    pub fn deposit(&mut self, date: NaiveDate, amount: Money) -> CheckbookResult<Transaction> {
        let mut next = self.engine.clone();
        next.deposit(amount)?;

        let row = Transaction::deposit(date, amount, next.total_balance());
        let written = self.ledger.append(row)?.clone();
        self.adopt(next, Operation::Deposit)?;
        Ok(written)
    }

    /// Withdraw `amount` from a single category
    pub fn withdraw(
        &mut self,
        date: NaiveDate,
        category: &CategoryName,
        amount: Money,
    ) -> CheckbookResult<Transaction> {
        let mut next = self.engine.clone();
        next.withdraw(category, amount)?;

        let row = Transaction::withdrawal(date, category.clone(), amount, next.total_balance());
        let written = self.ledger.append(row)?.clone();
        self.adopt(next, Operation::Withdraw)?;
        Ok(written)
    }

    /// Replace the budget and redistribute the whole balance under it
    ///
    /// No register row is written since the total balance does not change.
    pub fn change_budget(
        &mut self,
        lines: Vec<BudgetLine>,
        catch_all: CategoryName,
    ) -> CheckbookResult<()> {
        let mut next = self.engine.clone();
        next.change_budget(lines, catch_all)?;
        self.adopt(next, Operation::Rebudget)
    }

    /// Make `next` the current engine state, persist it and audit the change
    fn adopt(&mut self, next: AllocationEngine, operation: Operation) -> CheckbookResult<()> {
        let before = self.engine.snapshot();
        self.engine = next;
        self.save_state()?;

        let after = self.engine.snapshot();
        let summary = balance_diff(&before, &after);
        self.record(AuditEntry::change(
            operation, &self.name, &before, &after, summary,
        ));
        Ok(())
    }

    fn save_state(&self) -> CheckbookResult<()> {
        write_json_atomic(&self.state_path, &self.engine)
    }

    /// Audit failures never undo an operation that already reached the register
    fn record(&self, entry: AuditEntry) {
        if let Err(err) = self.audit.log(&entry) {
            tracing::warn!(
                error = %err,
                operation = %entry.operation,
                "failed to write audit entry"
            );
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &AllocationEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn budget(&self) -> &Budget {
        self.engine.budget()
    }

    pub fn total_balance(&self) -> Money {
        self.engine.total_balance()
    }

    pub fn snapshot(&self) -> AllocationSnapshot {
        self.engine.snapshot()
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Register table for display, oldest row first
    pub fn render_register(&self, symbol: &str) -> String {
        self.ledger.render(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use crate::services::ledger::ConflictResolution;
    use std::fs;
    use tempfile::TempDir;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, day).unwrap()
    }

    fn name(s: &str) -> CategoryName {
        CategoryName::new(s).unwrap()
    }

    fn setup() -> (TempDir, CheckbookPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, paths)
    }

    fn abort(_: &Path) -> CheckbookResult<ConflictResolution> {
        Ok(ConflictResolution::Abort)
    }

    fn create(paths: &CheckbookPaths, cents: i64) -> Account {
        Account::create(
            paths,
            "check_register",
            date(1),
            Money::from_cents(cents),
            Budget::standard(),
            &mut abort,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_account_name() {
        assert!(validate_account_name("check_register").is_ok());
        assert!(validate_account_name("joint-2025.v2").is_ok());
        assert!(validate_account_name("").is_err());
        assert!(validate_account_name(".hidden").is_err());
        assert!(validate_account_name("../escape").is_err());
        assert!(validate_account_name("has space").is_err());
    }

    #[test]
    fn test_create_writes_register_state_and_audit() {
        let (_dir, paths) = setup();
        let account = create(&paths, 100_000);

        assert_eq!(account.name(), "check_register");
        assert_eq!(account.ledger().len(), 1);
        assert_eq!(account.total_balance(), Money::from_cents(100_000));
        assert_eq!(account.state_path(), paths.state_file("check_register"));
        assert!(paths.register_file("check_register").exists());
        assert!(account.state_path().exists());

        let entries = AuditLogger::new(paths.audit_log()).read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Open);
    }

    #[test]
    fn test_negative_start_creates_nothing() {
        let (_dir, paths) = setup();
        let result = Account::create(
            &paths,
            "check_register",
            date(1),
            Money::from_cents(-1),
            Budget::standard(),
            &mut abort,
        );

        assert!(matches!(result, Err(CheckbookError::InvalidAmount(_))));
        assert!(!paths.register_file("check_register").exists());
    }

    #[test]
    fn test_existing_register_aborts() {
        let (_dir, paths) = setup();
        create(&paths, 100_000);

        let result = Account::create(
            &paths,
            "check_register",
            date(2),
            Money::zero(),
            Budget::standard(),
            &mut abort,
        );
        assert!(matches!(result, Err(CheckbookError::LedgerExists(_))));

        let reopened = Account::open(&paths, "check_register").unwrap();
        assert_eq!(reopened.total_balance(), Money::from_cents(100_000));
    }

    #[test]
    fn test_rename_takes_new_account_name() {
        let (_dir, paths) = setup();
        create(&paths, 100_000);

        let renamed = paths.register_file("savings");
        let mut rename = move |_: &Path| -> CheckbookResult<ConflictResolution> {
            Ok(ConflictResolution::Rename(renamed.clone()))
        };
        let account = Account::create(
            &paths,
            "check_register",
            date(2),
            Money::from_cents(500),
            Budget::standard(),
            &mut rename,
        )
        .unwrap();

        assert_eq!(account.name(), "savings");
        assert_eq!(account.state_path(), paths.state_file("savings"));
        assert_eq!(
            Account::open(&paths, "check_register").unwrap().total_balance(),
            Money::from_cents(100_000)
        );
    }

    #[test]
    fn test_deposit_and_withdraw_persist_across_reopen() {
        let (_dir, paths) = setup();
        let mut account = create(&paths, 100_000);

        let row = account.deposit(date(2), Money::from_cents(3333)).unwrap();
        assert_eq!(row.kind, TransactionKind::Deposit);
        assert_eq!(row.balance_after, Money::from_cents(103_333));

        account
            .withdraw(date(3), &name("housing"), Money::from_cents(50_000))
            .unwrap();

        let reopened = Account::open(&paths, "check_register").unwrap();
        assert_eq!(reopened.ledger().len(), 3);
        assert_eq!(reopened.total_balance(), Money::from_cents(53_333));
        assert_eq!(reopened.engine(), account.engine());
        assert!(reopened.engine().is_reconciled());
        assert_eq!(
            reopened.engine().balance_of(&name("housing")),
            Some(Money::from_cents(30_000 + 1000 - 50_000))
        );
    }

    #[test]
    fn test_rejected_operations_write_nothing() {
        let (_dir, paths) = setup();
        let mut account = create(&paths, 100_000);
        let register = fs::read_to_string(paths.register_file("check_register")).unwrap();

        assert!(account.deposit(date(2), Money::zero()).is_err());
        assert!(matches!(
            account.withdraw(date(2), &name("travel"), Money::from_cents(100)),
            Err(CheckbookError::UnknownCategory(_))
        ));
        assert!(account
            .change_budget(
                vec![BudgetLine::new(name("a"), crate::models::Weight::from_ppm(500_000))],
                name("a"),
            )
            .is_err());

        assert_eq!(
            fs::read_to_string(paths.register_file("check_register")).unwrap(),
            register
        );
        assert_eq!(account.ledger().len(), 1);
        assert_eq!(AuditLogger::new(paths.audit_log()).read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_change_budget_is_audited_but_not_registered() {
        let (_dir, paths) = setup();
        let mut account = create(&paths, 100_000);

        let budget = Budget::parse_assignments(&["rent=0.5", "fun=0.5"], Some("fun"), "other")
            .unwrap();
        account
            .change_budget(budget.lines().to_vec(), budget.catch_all().clone())
            .unwrap();

        assert_eq!(account.ledger().len(), 1);
        assert_eq!(
            account.engine().balance_of(&name("rent")),
            Some(Money::from_cents(50_000))
        );

        let entries = AuditLogger::new(paths.audit_log()).read_all().unwrap();
        assert_eq!(entries.last().unwrap().operation, Operation::Rebudget);

        let reopened = Account::open(&paths, "check_register").unwrap();
        assert_eq!(reopened.budget(), &budget);
    }

    #[test]
    fn test_open_detects_state_out_of_step_with_register() {
        let (_dir, paths) = setup();
        let mut account = create(&paths, 100_000);
        let stale = fs::read_to_string(account.state_path()).unwrap();
        account.deposit(date(2), Money::from_cents(100)).unwrap();
        fs::write(account.state_path(), stale).unwrap();

        let err = Account::open(&paths, "check_register").unwrap_err();
        assert!(matches!(err, CheckbookError::Storage(_)));

        let message = err.to_string();
        let register = paths.register_file("check_register");
        let state = paths.state_file("check_register");
        assert!(message.contains(&register.display().to_string()));
        assert!(message.contains(&state.display().to_string()));
        assert!(message.contains("$1,001.00"));
        assert!(message.contains("$1,000.00"));
    }

    #[test]
    fn test_open_missing_account() {
        let (_dir, paths) = setup();
        let err = Account::open(&paths, "nope").unwrap_err();
        assert!(matches!(err, CheckbookError::Storage(_)));
    }
}
