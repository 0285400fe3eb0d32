//! Allocation weights
//!
//! A weight is the fraction of every allocated amount that a budget category
//! receives. Weights are stored as whole parts-per-million so that summing
//! and comparing them is exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fraction between 0 and 1, stored in millionths
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Weight(i64);

impl Weight {
    /// Parts-per-million denominator
    pub const SCALE: i64 = 1_000_000;

    pub const ZERO: Weight = Weight(0);
    pub const ONE: Weight = Weight(Self::SCALE);

    /// Create a weight from parts-per-million
    ///
    /// Sums of weights are also represented as `Weight` and may exceed one,
    /// so the value is not range-checked here. Use [`Weight::parse`] for
    /// user input.
    pub const fn from_ppm(ppm: i64) -> Self {
        Self(ppm)
    }

    /// Get the weight in parts-per-million
    pub const fn ppm(&self) -> i64 {
        self.0
    }

    /// Check whether this weight lies in `[0, 1]`
    pub const fn is_fraction(&self) -> bool {
        self.0 >= 0 && self.0 <= Self::SCALE
    }

    /// Whether this value is within `tolerance` of one
    pub fn is_close_to_one(&self, tolerance: Weight) -> bool {
        (self.0 - Self::SCALE).abs() <= tolerance.0
    }

    /// Parse a weight from user input
    ///
    /// Accepts a decimal fraction ("0.25", ".3", "1") with at most six
    /// fractional digits, or a percentage ("25%", "12.5%").
    pub fn parse(s: &str) -> Result<Self, WeightParseError> {
        let s = s.trim();
        let invalid = || WeightParseError::InvalidFormat(s.to_string());

        let ppm = if let Some(percent) = s.strip_suffix('%') {
            parse_scaled(percent.trim(), 4).ok_or_else(invalid)?
        } else {
            parse_scaled(s, 6).ok_or_else(invalid)?
        };

        let weight = Self(ppm);
        if !weight.is_fraction() {
            return Err(WeightParseError::OutOfRange(s.to_string()));
        }
        Ok(weight)
    }

    /// Format as a percentage with two decimals ("25.00%")
    pub fn as_percent(&self) -> String {
        format!("{}.{:02}%", self.0 / 10_000, (self.0 % 10_000).abs() / 100)
    }
}

/// Parse an unsigned decimal into an integer scaled by `10^frac_digits`
fn parse_scaled(s: &str, frac_digits: usize) -> Option<i64> {
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if (whole.is_empty() && frac.is_empty()) || frac.len() > frac_digits {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let padded = format!("{:0<width$}", frac, width = frac_digits);
    let frac: i64 = if padded.is_empty() { 0 } else { padded.parse().ok()? };

    whole
        .checked_mul(10_i64.pow(frac_digits as u32))?
        .checked_add(frac)
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let mut frac = format!("{:06}", abs % Self::SCALE);
        while frac.len() > 2 && frac.ends_with('0') {
            frac.pop();
        }
        write!(f, "{}{}.{}", sign, abs / Self::SCALE, frac)
    }
}

impl FromStr for Weight {
    type Err = WeightParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Weight {
    type Error = WeightParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Weight> for String {
    fn from(weight: Weight) -> Self {
        weight.to_string()
    }
}

impl std::iter::Sum for Weight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|w| w.0).sum())
    }
}

/// Error type for weight parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeightParseError {
    InvalidFormat(String),
    OutOfRange(String),
}

impl fmt::Display for WeightParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightParseError::InvalidFormat(s) => write!(f, "Invalid weight format: {}", s),
            WeightParseError::OutOfRange(s) => {
                write!(f, "Weight must be between 0 and 1: {}", s)
            }
        }
    }
}

impl std::error::Error for WeightParseError {}
