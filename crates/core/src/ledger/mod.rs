//! Cash book ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Entry sides (debit/credit) with strict and permissive parsing
//! - Entry input validation
//! - The year-wise balance engine: opening/closing balance chain and
//!   per-head debit/credit aggregation

pub mod balance;
pub mod error;
pub mod types;
pub mod validation;

pub use balance::{
    BalanceEngine, HeadTotals, TrialBalance, TrialBalanceRow, TrialBalanceTotals,
    first_financial_year,
};
pub use error::LedgerError;
pub use types::{EntrySide, LedgerEntry};
pub use validation::validate_new_entry;
