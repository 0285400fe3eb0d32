//! Budget model
//!
//! A budget is the full set of categories together with the weight each one
//! receives from every allocation, plus the single catch-all category that
//! absorbs rounding remainders. Budgets are validated as a unit and are
//! never edited line by line.

use serde::{Deserialize, Serialize};

use super::category::CategoryName;
use super::weight::Weight;
use crate::error::{CheckbookError, CheckbookResult};

/// How far the weight sum may stray from 1.00
pub const WEIGHT_TOLERANCE: Weight = Weight::from_ppm(10_000);

/// One category and its share of each allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category: CategoryName,
    pub weight: Weight,
}

impl BudgetLine {
    pub fn new(category: CategoryName, weight: Weight) -> Self {
        Self { category, weight }
    }
}

/// Serialized shape of a budget; validated on the way back in
#[derive(Deserialize)]
struct BudgetData {
    lines: Vec<BudgetLine>,
    catch_all: CategoryName,
}

/// A validated allocation scheme
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Budget {
    lines: Vec<BudgetLine>,
    catch_all: CategoryName,
}

impl Budget {
    /// Build a budget, rejecting it unless it is usable as a whole
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty budget, duplicate categories or a weight
    ///   outside `[0, 1]`
    /// - `MissingCatchAll` if `catch_all` is not one of the lines
    /// - `InvalidBudget` carrying the computed sum if the weights do not add
    ///   up to 1.00 within [`WEIGHT_TOLERANCE`]
    pub fn new(lines: Vec<BudgetLine>, catch_all: CategoryName) -> CheckbookResult<Self> {
        if lines.is_empty() {
            return Err(CheckbookError::Validation(
                "A budget needs at least one category".into(),
            ));
        }

        for (i, line) in lines.iter().enumerate() {
            if !line.weight.is_fraction() {
                return Err(CheckbookError::Validation(format!(
                    "Weight for '{}' must be between 0 and 1, got {}",
                    line.category, line.weight
                )));
            }
            if lines[..i].iter().any(|l| l.category == line.category) {
                return Err(CheckbookError::Validation(format!(
                    "Category '{}' appears more than once",
                    line.category
                )));
            }
        }

        if !lines.iter().any(|l| l.category == catch_all) {
            return Err(CheckbookError::MissingCatchAll(catch_all.to_string()));
        }

        let sum: Weight = lines.iter().map(|l| l.weight).sum();
        if !sum.is_close_to_one(WEIGHT_TOLERANCE) {
            return Err(CheckbookError::InvalidBudget { sum });
        }

        Ok(Self { lines, catch_all })
    }

    /// The standard six-category scheme with "other" as the catch-all
    pub fn standard() -> Self {
        let lines = [
            ("housing", 300_000),
            ("food", 200_000),
            ("car", 250_000),
            ("clothing", 100_000),
            ("entertainment", 100_000),
            ("other", 50_000),
        ]
        .into_iter()
        .map(|(name, ppm)| BudgetLine {
            category: CategoryName::from_trusted(name),
            weight: Weight::from_ppm(ppm),
        })
        .collect();

        Self {
            lines,
            catch_all: CategoryName::from_trusted("other"),
        }
    }

    /// Parse `name=weight` assignments into a budget
    ///
    /// See [`parse_assignments`] for the accepted syntax.
    pub fn parse_assignments<S: AsRef<str>>(
        assignments: &[S],
        catch_all: Option<&str>,
        default_catch_all: &str,
    ) -> CheckbookResult<Self> {
        let (lines, catch_all) = parse_assignments(assignments, catch_all, default_catch_all)?;
        Self::new(lines, catch_all)
    }

    /// All lines in their configured order
    pub fn lines(&self) -> &[BudgetLine] {
        &self.lines
    }

    /// The category that absorbs rounding remainders
    pub fn catch_all(&self) -> &CategoryName {
        &self.catch_all
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> Weight {
        self.lines.iter().map(|l| l.weight).sum()
    }

    /// Lines other than the catch-all, in order
    pub fn funded_lines(&self) -> impl Iterator<Item = &BudgetLine> {
        self.lines.iter().filter(move |l| l.category != self.catch_all)
    }

    /// Category names in order
    pub fn categories(&self) -> impl Iterator<Item = &CategoryName> {
        self.lines.iter().map(|l| &l.category)
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'de> Deserialize<'de> for Budget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = BudgetData::deserialize(deserializer)?;
        Self::new(data.lines, data.catch_all).map_err(serde::de::Error::custom)
    }
}

/// Parse `name=weight` assignments into unvalidated budget lines
///
/// Weights are decimals ("0.3") or percentages ("30%"). The catch-all is, in
/// order of preference: `catch_all` if given, the line whose name carries a
/// `*` suffix (`other*=0.05`), or `default_catch_all`. Only the syntax is
/// checked here; [`Budget::new`] checks the budget as a whole.
pub fn parse_assignments<S: AsRef<str>>(
    assignments: &[S],
    catch_all: Option<&str>,
    default_catch_all: &str,
) -> CheckbookResult<(Vec<BudgetLine>, CategoryName)> {
    let mut lines = Vec::with_capacity(assignments.len());
    let mut starred: Option<CategoryName> = None;

    for assignment in assignments {
        let assignment = assignment.as_ref();
        let (name, weight) = assignment.split_once('=').ok_or_else(|| {
            CheckbookError::Validation(format!(
                "Expected 'category=weight', got '{}'",
                assignment
            ))
        })?;

        let (name, is_star) = match name.trim().strip_suffix('*') {
            Some(stripped) => (stripped, true),
            None => (name, false),
        };

        let category =
            CategoryName::new(name).map_err(|e| CheckbookError::Validation(e.to_string()))?;
        let weight =
            Weight::parse(weight).map_err(|e| CheckbookError::Validation(e.to_string()))?;

        if is_star {
            if starred.is_some() {
                return Err(CheckbookError::Validation(
                    "Only one category may be marked as catch-all".into(),
                ));
            }
            starred = Some(category.clone());
        }

        lines.push(BudgetLine::new(category, weight));
    }

    let catch_all = match (catch_all, starred) {
        (Some(name), _) => {
            CategoryName::new(name).map_err(|e| CheckbookError::Validation(e.to_string()))?
        }
        (None, Some(name)) => name,
        (None, None) => CategoryName::new(default_catch_all)
            .map_err(|e| CheckbookError::Config(e.to_string()))?,
    };

    Ok((lines, catch_all))
}
