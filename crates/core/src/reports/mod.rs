//! Report classification and derivation.
//!
//! This module provides pure business logic for the reporting side of the
//! system:
//! - Report mapping records: per-year classification of each (head, side)
//!   pair into Profit & Loss, Balance Sheet, or Construction
//! - The balance-sheet exclusivity rule
//! - Derivation of the Profit & Loss and Balance Sheet views, the latter
//!   with cross-year carry-forward

pub mod derive;
pub mod error;
pub mod mapping;
pub mod types;

#[cfg(test)]
mod tests;

pub use derive::{balance_sheet_lines, profit_loss_lines};
pub use error::ReportError;
pub use mapping::{apply_mapping, ensure_balance_sheet_exclusive, remove_mapping, snapshot_amount};
pub use types::{MappingRecord, ReportKind, ReportLine, YearMappings};
