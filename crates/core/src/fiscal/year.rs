//! The April-March financial year grid.
//!
//! Every society is accounted on the same grid: FY(y) runs from April 1 of
//! year `y` through March 31 of year `y + 1`, and is labeled by its start
//! year ("2024-2025").

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A financial year, identified by its start year.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FinancialYear(i32);

/// Error parsing a financial year from its textual form.
#[derive(Debug, Error)]
#[error("invalid financial year: {0}")]
pub struct ParseYearError(String);

impl FinancialYear {
    /// Month the financial year starts in (April).
    const START_MONTH: u32 = 4;

    /// Creates a financial year from its start year.
    #[must_use]
    pub const fn new(start_year: i32) -> Self {
        Self(start_year)
    }

    /// Returns the start year (e.g., 2024 for FY 2024-2025).
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.0
    }

    /// Returns the financial year a date falls into.
    ///
    /// Dates in January-March belong to the year that started the previous
    /// April.
    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        if date.month() >= Self::START_MONTH {
            Self(date.year())
        } else {
            Self(date.year() - 1)
        }
    }

    /// First day of the financial year (April 1).
    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, Self::START_MONTH, 1).expect("April 1 is a valid date")
    }

    /// Last day of the financial year (March 31 of the following year).
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0 + 1, 3, 31).expect("March 31 is a valid date")
    }

    /// Returns true if the date falls within this financial year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// The following financial year.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// The preceding financial year.
    #[must_use]
    pub const fn prev(&self) -> Self {
        Self(self.0 - 1)
    }

    /// Label in "2024-2025" form.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}-{}", self.0, self.0 + 1)
    }

    /// Parses a year given either as a bare start year ("2024") or as a
    /// label ("2024-2025"). Only the start year of a label is significant.
    ///
    /// # Errors
    ///
    /// Returns `ParseYearError` if the start year is not an integer.
    pub fn parse(s: &str) -> Result<Self, ParseYearError> {
        let start = s.split('-').next().unwrap_or(s).trim();
        start
            .parse::<i32>()
            .map(Self)
            .map_err(|_| ParseYearError(s.to_string()))
    }
}

impl std::fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for FinancialYear {
    type Err = ParseYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_boundaries() {
        let fy = FinancialYear::new(2023);
        assert_eq!(fy.start_date(), date(2023, 4, 1));
        assert_eq!(fy.end_date(), date(2024, 3, 31));
    }

    #[test]
    fn test_of_date_before_april_belongs_to_previous_year() {
        assert_eq!(FinancialYear::of_date(date(2024, 3, 31)), FinancialYear::new(2023));
        assert_eq!(FinancialYear::of_date(date(2024, 4, 1)), FinancialYear::new(2024));
        assert_eq!(FinancialYear::of_date(date(2024, 12, 25)), FinancialYear::new(2024));
        assert_eq!(FinancialYear::of_date(date(2024, 1, 1)), FinancialYear::new(2023));
    }

    #[test]
    fn test_contains_is_closed_range() {
        let fy = FinancialYear::new(2023);
        assert!(fy.contains(date(2023, 4, 1)));
        assert!(fy.contains(date(2024, 3, 31)));
        assert!(!fy.contains(date(2023, 3, 31)));
        assert!(!fy.contains(date(2024, 4, 1)));
    }

    #[test]
    fn test_parse_accepts_bare_year_and_label() {
        assert_eq!(FinancialYear::parse("2024").unwrap(), FinancialYear::new(2024));
        assert_eq!(FinancialYear::parse("2024-2025").unwrap(), FinancialYear::new(2024));
        assert!(FinancialYear::parse("twenty-four").is_err());
        assert!(FinancialYear::parse("").is_err());
    }

    #[test]
    fn test_label_round_trip() {
        let fy = FinancialYear::new(2019);
        assert_eq!(fy.label(), "2019-2020");
        assert_eq!(FinancialYear::parse(&fy.label()).unwrap(), fy);
    }

    #[test]
    fn test_ordering_and_stepping() {
        let fy = FinancialYear::new(2022);
        assert!(fy < fy.next());
        assert_eq!(fy.next().prev(), fy);
    }
}
