//! Ledger error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entry side is neither "debit" nor "credit".
    #[error("Type must be either 'debit' or 'credit', got '{0}'")]
    InvalidSide(String),

    /// Entry amount is zero or negative.
    #[error("Amount must be a positive number, got {0}")]
    InvalidAmount(Decimal),

    /// Entry date predates the society's financial year start.
    #[error("Entry date {date} cannot be before financial year start ({start})")]
    DateBeforeFinancialYearStart {
        /// The rejected entry date.
        date: NaiveDate,
        /// The society's financial year start.
        start: NaiveDate,
    },

    /// Account head name is missing.
    #[error("Account head name is required")]
    MissingAccountHead,
}
