//! User settings for checkbook-cli
//!
//! Manages user preferences: currency symbol, date format, the default
//! account name and the budget new accounts start with.

use serde::{Deserialize, Serialize};

use super::paths::CheckbookPaths;
use crate::error::CheckbookError;
use crate::models::Budget;

/// User settings for checkbook-cli
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format accepted on the command line and used for display
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Catch-all category used when a budget on the command line does not
    /// mark one
    #[serde(default = "default_catch_all")]
    pub catch_all_category: String,

    /// Account used when `--account` is not given
    #[serde(default = "default_account")]
    pub default_account: String,

    /// Budget new accounts are created with
    #[serde(default)]
    pub default_budget: Budget,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_catch_all() -> String {
    "other".to_string()
}

fn default_account() -> String {
    "check_register".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            catch_all_category: default_catch_all(),
            default_account: default_account(),
            default_budget: Budget::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &CheckbookPaths) -> Result<Self, CheckbookError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CheckbookError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CheckbookError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CheckbookPaths) -> Result<(), CheckbookError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            CheckbookError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            CheckbookError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Parse a date given on the command line using the configured format
    pub fn parse_date(&self, input: &str) -> Result<chrono::NaiveDate, CheckbookError> {
        chrono::NaiveDate::parse_from_str(input.trim(), &self.date_format).map_err(|e| {
            CheckbookError::Validation(format!(
                "Invalid date '{}' (expected {}): {}",
                input, self.date_format, e
            ))
        })
    }
}
