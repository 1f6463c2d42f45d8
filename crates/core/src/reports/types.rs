//! Report data types.

use rust_decimal::Decimal;
use sahakar_shared::types::AccountHeadId;
use serde::{Deserialize, Serialize};

use crate::fiscal::FinancialYear;
use crate::ledger::EntrySide;

use super::error::ReportError;

/// Which report a trial-balance row is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Profit & Loss statement (resets each year).
    ProfitLoss,
    /// Balance Sheet (carries forward across years).
    BalanceSheet,
    /// Construction statement.
    Construction,
}

impl ReportKind {
    /// Canonical snake_case form, as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ProfitLoss => "profit_loss",
            Self::BalanceSheet => "balance_sheet",
            Self::Construction => "construction",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "profit_loss" => Ok(Self::ProfitLoss),
            "balance_sheet" => Ok(Self::BalanceSheet),
            "construction" => Ok(Self::Construction),
            _ => Err(ReportError::InvalidKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification record: a (head, side) pair mapped to a report for a
/// given year, with the trial-balance amount snapshotted at mapping time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// The classified account head.
    pub account_head_id: AccountHeadId,
    /// Which trial-balance column the classification covers.
    pub side: EntrySide,
    /// Target report.
    pub kind: ReportKind,
    /// Amount captured when the mapping was written (not live).
    pub total_amount: Decimal,
}

/// All mapping records of one society for one financial year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearMappings {
    /// The financial year the records belong to.
    pub year: FinancialYear,
    /// The classification records.
    pub records: Vec<MappingRecord>,
}

/// One line of a derived report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLine {
    /// Account head ID.
    pub account_head_id: AccountHeadId,
    /// Account head name (empty if the head no longer exists).
    pub account_head_name: String,
    /// Line amount.
    pub amount: Decimal,
    /// Which trial-balance side the line was mapped from.
    pub side: EntrySide,
    /// The financial year of the line.
    pub year: FinancialYear,
}
