//! Budget category names
//!
//! Categories are identified by a normalised name. Names are trimmed and
//! lowercased so "Housing" and " housing " refer to the same category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a category name
pub const MAX_NAME_LEN: usize = 50;

/// Names that collide with the check register's own markers
const RESERVED_NAMES: [&str; 2] = ["all", "none"];

/// A validated, normalised budget category identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, validating and normalising it
    pub fn new(name: impl AsRef<str>) -> Result<Self, CategoryValidationError> {
        let normalised = name.as_ref().trim().to_lowercase();

        if normalised.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if normalised.len() > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(normalised.len()));
        }

        if normalised.contains(['=', ',', '*']) {
            return Err(CategoryValidationError::InvalidCharacter(normalised));
        }

        if RESERVED_NAMES.contains(&normalised.as_str()) {
            return Err(CategoryValidationError::Reserved(normalised));
        }

        Ok(Self(normalised))
    }

    /// Wrap a name already known to be valid and normalised
    pub(crate) fn from_trusted(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryName {
    type Err = CategoryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CategoryValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(name: CategoryName) -> Self {
        name.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validation errors for category names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidCharacter(String),
    Reserved(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(
                    f,
                    "Category name too long ({} chars, max {})",
                    len, MAX_NAME_LEN
                )
            }
            Self::InvalidCharacter(name) => {
                write!(f, "Category name '{}' may not contain '=', ',' or '*'", name)
            }
            Self::Reserved(name) => write!(f, "'{}' is reserved by the check register", name),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalises_name() {
        let name = CategoryName::new("  Housing ").unwrap();
        assert_eq!(name.as_str(), "housing");
        assert_eq!(name, CategoryName::new("HOUSING").unwrap());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            CategoryName::new("   "),
            Err(CategoryValidationError::EmptyName)
        );
        assert_eq!(
            CategoryName::new("a".repeat(51)),
            Err(CategoryValidationError::NameTooLong(51))
        );
        assert!(matches!(
            CategoryName::new("food=0.2"),
            Err(CategoryValidationError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn test_reserved_register_markers() {
        assert!(matches!(
            CategoryName::new("All"),
            Err(CategoryValidationError::Reserved(_))
        ));
        assert!(matches!(
            CategoryName::new("none"),
            Err(CategoryValidationError::Reserved(_))
        ));
    }

    #[test]
    fn test_serde_validates() {
        let name: CategoryName = serde_json::from_str("\"Food\"").unwrap();
        assert_eq!(name.as_str(), "food");
        assert!(serde_json::from_str::<CategoryName>("\"\"").is_err());
    }
}
