//! checkbook-cli - a check register that budgets as it goes
//!
//! Every balance held in the account is split across budget categories by
//! weight. Deposits are spread over all categories, rounded to the cent,
//! with the leftover cents landing in one catch-all category so that the
//! category balances always add up to the account total. Withdrawals come
//! out of a single category. Every deposit and withdrawal is recorded in an
//! append-only CSV check register.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Money, weights, categories, budgets and register rows
//! - `storage`: Atomic file writes and the CSV register file
//! - `services`: Allocation engine, transaction ledger and accounts
//! - `audit`: Audit logging system
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use checkbook_cli::config::{CheckbookPaths, Settings};
//! use checkbook_cli::services::Account;
//!
//! # fn main() -> Result<(), checkbook_cli::CheckbookError> {
//! let paths = CheckbookPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let account = Account::open(&paths, &settings.default_account)?;
//! println!("{}", account.total_balance());
//! # Ok(())
//! # }
//! ```

use std::sync::Once;

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::CheckbookError;

static TRACING_INIT: Once = Once::new();

/// Install the diagnostic subscriber, writing to stderr
///
/// `RUST_LOG` overrides the default of warnings only. Safe to call more
/// than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("checkbook_cli=warn"));

        // Another subscriber may already be installed by an embedding program
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
