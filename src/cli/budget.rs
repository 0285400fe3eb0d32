//! Budget CLI commands
//!
//! Shows the current budget or replaces it, redistributing the balance.

use clap::Subcommand;

use crate::config::{CheckbookPaths, Settings};
use crate::display::{format_balance, format_budget};
use crate::error::CheckbookResult;
use crate::models::parse_assignments;
use crate::services::Account;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Show the budget weights
    Show,

    /// Replace the budget and redistribute the whole balance
    Set {
        /// Budget lines as category=weight (e.g., housing=0.3 or housing=30%)
        #[arg(required = true)]
        assignments: Vec<String>,

        /// Catch-all category (defaults to a line marked with '*')
        #[arg(long)]
        catch_all: Option<String>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    paths: &CheckbookPaths,
    settings: &Settings,
    account: &str,
    cmd: BudgetCommands,
) -> CheckbookResult<()> {
    match cmd {
        BudgetCommands::Show => {
            let account = Account::open(paths, account)?;
            println!("Budget for '{}':", account.name());
            println!();
            print!("{}", format_budget(account.budget()));
        }

        BudgetCommands::Set {
            assignments,
            catch_all,
        } => {
            let (lines, catch_all) = parse_assignments(
                &assignments,
                catch_all.as_deref(),
                &settings.catch_all_category,
            )?;

            let mut account = Account::open(paths, account)?;
            account.change_budget(lines, catch_all)?;

            println!("Budget updated for '{}'.", account.name());
            println!();
            print!("{}", format_budget(account.budget()));
            println!();
            print!(
                "{}",
                format_balance(&account.snapshot(), &settings.currency_symbol)
            );
        }
    }

    Ok(())
}
