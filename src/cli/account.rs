//! Account CLI commands
//!
//! Opening an account, moving money in and out, and showing its state.

use clap::Args;

use crate::config::{CheckbookPaths, Settings};
use crate::display::format_balance;
use crate::error::{CheckbookError, CheckbookResult};
use crate::models::{Budget, CategoryName};
use crate::services::Account;

use super::prompt::{FlagResolver, PromptResolver};
use super::{parse_amount, resolve_date};

/// Arguments for `checkbook init`
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Starting balance (e.g., "1000" or "1000.00")
    pub starting_balance: String,

    /// Date of the starting balance (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Budget lines as category=weight (e.g., housing=0.3 or housing=30%)
    #[arg(short, long, num_args = 1..)]
    pub budget: Vec<String>,

    /// Catch-all category for --budget (defaults to a line marked with '*')
    #[arg(long, requires = "budget")]
    pub catch_all: Option<String>,

    /// Replace an existing register with the same name
    #[arg(long, conflicts_with = "rename")]
    pub overwrite: bool,

    /// Create the account under this name if the register already exists
    #[arg(long)]
    pub rename: Option<String>,
}

/// Handle `checkbook init`
pub fn handle_init_command(
    paths: &CheckbookPaths,
    settings: &Settings,
    account: &str,
    args: InitArgs,
) -> CheckbookResult<()> {
    let starting_balance = parse_amount(&args.starting_balance)?;
    let date = resolve_date(settings, args.date.as_deref())?;

    let budget = if args.budget.is_empty() {
        settings.default_budget.clone()
    } else {
        Budget::parse_assignments(
            &args.budget,
            args.catch_all.as_deref(),
            &settings.catch_all_category,
        )?
    };

    let mut resolver = PromptResolver::new(FlagResolver::new(paths, args.overwrite, args.rename));
    let account = Account::create(paths, account, date, starting_balance, budget, &mut resolver)?;

    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    println!(
        "Created account '{}' at {}",
        account.name(),
        account.ledger().path().display()
    );
    println!();
    print!(
        "{}",
        format_balance(&account.snapshot(), &settings.currency_symbol)
    );
    Ok(())
}

/// Handle `checkbook deposit`
pub fn handle_deposit_command(
    paths: &CheckbookPaths,
    settings: &Settings,
    account: &str,
    amount: &str,
    date: Option<&str>,
) -> CheckbookResult<()> {
    let amount = parse_amount(amount)?;
    let date = resolve_date(settings, date)?;

    let mut account = Account::open(paths, account)?;
    let row = account.deposit(date, amount)?;

    println!(
        "Deposited {} on {}. New balance: {}",
        row.amount.format_with_symbol(&settings.currency_symbol),
        row.date.format(&settings.date_format),
        row.balance_after.format_with_symbol(&settings.currency_symbol)
    );
    Ok(())
}

/// Handle `checkbook withdraw`
pub fn handle_withdraw_command(
    paths: &CheckbookPaths,
    settings: &Settings,
    account: &str,
    category: &str,
    amount: &str,
    date: Option<&str>,
) -> CheckbookResult<()> {
    let category =
        CategoryName::new(category).map_err(|_| CheckbookError::unknown_category(category))?;
    let amount = parse_amount(amount)?;
    let date = resolve_date(settings, date)?;

    let mut account = Account::open(paths, account)?;
    let row = account.withdraw(date, &category, amount)?;

    let remaining = account.engine().balance_of(&category).unwrap_or_default();
    println!(
        "Withdrew {} from {} on {}. New balance: {}",
        row.amount.format_with_symbol(&settings.currency_symbol),
        category,
        row.date.format(&settings.date_format),
        row.balance_after.format_with_symbol(&settings.currency_symbol)
    );
    if remaining.is_negative() {
        println!(
            "Note: {} is now overdrawn at {}",
            category,
            remaining.format_with_symbol(&settings.currency_symbol)
        );
    }
    Ok(())
}

/// Handle `checkbook balance`
pub fn handle_balance_command(
    paths: &CheckbookPaths,
    settings: &Settings,
    account: &str,
) -> CheckbookResult<()> {
    let account = Account::open(paths, account)?;
    print!(
        "{}",
        format_balance(&account.snapshot(), &settings.currency_symbol)
    );
    Ok(())
}

/// Handle `checkbook register`
pub fn handle_register_command(
    paths: &CheckbookPaths,
    settings: &Settings,
    account: &str,
) -> CheckbookResult<()> {
    let account = Account::open(paths, account)?;
    println!("{}", account.render_register(&settings.currency_symbol));
    Ok(())
}
