//! Path management for checkbook-cli
//!
//! Provides XDG-compliant path resolution for configuration and data.
//!
//! ## Path Resolution Order
//!
//! 1. `CHECKBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/checkbook-cli` or `~/.config/checkbook-cli`
//! 3. Windows: `%APPDATA%\checkbook-cli`

use std::path::PathBuf;

use crate::error::CheckbookError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "CHECKBOOK_DATA_DIR";

/// Manages all paths used by checkbook-cli
#[derive(Debug, Clone)]
pub struct CheckbookPaths {
    /// Base directory for all checkbook-cli data
    base_dir: PathBuf,
}

impl CheckbookPaths {
    /// Create a new CheckbookPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, CheckbookError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create CheckbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/checkbook-cli/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding registers and account state
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Check register CSV for the named account
    pub fn register_file(&self, account: &str) -> PathBuf {
        self.data_dir().join(format!("{}.csv", account))
    }

    /// Allocation state for the named account
    pub fn state_file(&self, account: &str) -> PathBuf {
        self.data_dir().join(format!("{}.state.json", account))
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), CheckbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CheckbookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| CheckbookError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, CheckbookError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                CheckbookError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("checkbook-cli"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, CheckbookError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| CheckbookError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("checkbook-cli"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_account_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(
            paths.register_file("check_register"),
            temp_dir.path().join("data").join("check_register.csv")
        );
        assert_eq!(
            paths.state_file("check_register"),
            temp_dir.path().join("data").join("check_register.state.json")
        );
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CheckbookPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }
}
