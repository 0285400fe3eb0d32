use anyhow::Result;
use clap::{Parser, Subcommand};

use checkbook_cli::cli::{
    handle_audit_command, handle_balance_command, handle_budget_command, handle_deposit_command,
    handle_init_command, handle_register_command, handle_withdraw_command, BudgetCommands,
    InitArgs,
};
use checkbook_cli::config::{CheckbookPaths, Settings};
use checkbook_cli::error::CheckbookResult;

/// Exit status for input the user can correct (bad amount, budget or category)
const EXIT_INVALID_INPUT: i32 = 2;

#[derive(Parser)]
#[command(
    name = "checkbook",
    version,
    about = "Check register that splits every deposit across budget categories",
    long_about = "checkbook keeps a CSV check register for an account and divides \
                  its balance across budget categories by weight. Deposits are \
                  spread over every category, with leftover cents going to a \
                  catch-all category; withdrawals come out of one category."
)]
struct Cli {
    /// Account to operate on (defaults to the configured default account)
    #[arg(short, long, global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a new account with a starting balance
    Init(InitArgs),

    /// Deposit money, spreading it across every category
    Deposit {
        /// Amount (e.g., "100" or "33.33")
        amount: String,
        /// Transaction date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Withdraw money from one category
    Withdraw {
        /// Budget category to take the money from
        category: String,
        /// Amount (e.g., "100" or "33.33")
        amount: String,
        /// Transaction date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the total balance and every category balance
    Balance,

    /// Show the check register
    Register,

    /// Budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Show configuration
    Config,
}

fn main() -> Result<()> {
    checkbook_cli::init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Err(err) if err.is_validation() => {
            eprintln!("Error: {}", err);
            std::process::exit(EXIT_INVALID_INPUT);
        }
        result => Ok(result?),
    }
}

fn run(cli: Cli) -> CheckbookResult<()> {
    let paths = CheckbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let account = cli
        .account
        .unwrap_or_else(|| settings.default_account.clone());

    match cli.command {
        Some(Commands::Init(args)) => {
            handle_init_command(&paths, &settings, &account, args)?;
        }
        Some(Commands::Deposit { amount, date }) => {
            handle_deposit_command(&paths, &settings, &account, &amount, date.as_deref())?;
        }
        Some(Commands::Withdraw {
            category,
            amount,
            date,
        }) => {
            handle_withdraw_command(
                &paths,
                &settings,
                &account,
                &category,
                &amount,
                date.as_deref(),
            )?;
        }
        Some(Commands::Balance) => handle_balance_command(&paths, &settings, &account)?,
        Some(Commands::Register) => handle_register_command(&paths, &settings, &account)?,
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&paths, &settings, &account, cmd)?;
        }
        Some(Commands::Audit { count }) => handle_audit_command(&paths, count)?,
        Some(Commands::Config) => {
            println!("checkbook configuration");
            println!("=======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Default account:    {}", settings.default_account);
            println!("  Catch-all category: {}", settings.catch_all_category);
            println!("  Default budget:");
            for line in settings.default_budget.lines() {
                println!("    {} = {}", line.category, line.weight);
            }
        }
        None => {
            println!("checkbook - budgeted check register");
            println!();
            println!("Run 'checkbook --help' for usage information.");
            println!("Run 'checkbook init <starting_balance>' to open an account.");
        }
    }

    Ok(())
}
