//! Ledger domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sahakar_shared::types::AccountHeadId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Which side of the cash book an entry sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit entry (money in).
    Debit,
    /// Credit entry (money out).
    Credit,
}

impl EntrySide {
    /// Canonical lowercase form, as stored.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// The opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Strict parse, used at entry creation: only "debit" or "credit"
    /// (case-insensitive) are accepted.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidSide` for anything else.
    pub fn parse_strict(s: &str) -> Result<Self, LedgerError> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(LedgerError::InvalidSide(s.to_string())),
        }
    }

    /// Permissive classification, used at aggregation time: anything that is
    /// not case-insensitively "debit" counts as credit. Stored data is never
    /// rejected while computing balances.
    #[must_use]
    pub fn classify(s: &str) -> Self {
        if s.eq_ignore_ascii_case("debit") {
            Self::Debit
        } else {
            Self::Credit
        }
    }
}

impl std::fmt::Display for EntrySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cash book entry as the balance engine sees it.
///
/// The engine is pure: repositories load entries for a society and hand them
/// over as a slice; no I/O happens here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Referenced account head.
    pub account_head_id: AccountHeadId,
    /// Account head name at load time.
    pub account_head_name: String,
    /// Entry date.
    pub date: NaiveDate,
    /// Debit or credit.
    pub side: EntrySide,
    /// Amount (positive).
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse_accepts_both_cases() {
        assert_eq!(EntrySide::parse_strict("debit").unwrap(), EntrySide::Debit);
        assert_eq!(EntrySide::parse_strict("Debit").unwrap(), EntrySide::Debit);
        assert_eq!(EntrySide::parse_strict("CREDIT").unwrap(), EntrySide::Credit);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert!(EntrySide::parse_strict("withdrawal").is_err());
        assert!(EntrySide::parse_strict("").is_err());
    }

    #[test]
    fn test_classify_is_permissive() {
        assert_eq!(EntrySide::classify("debit"), EntrySide::Debit);
        assert_eq!(EntrySide::classify("DEBIT"), EntrySide::Debit);
        // Anything else lands on the credit side, never an error.
        assert_eq!(EntrySide::classify("credit"), EntrySide::Credit);
        assert_eq!(EntrySide::classify("withdrawal"), EntrySide::Credit);
        assert_eq!(EntrySide::classify(""), EntrySide::Credit);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(EntrySide::Debit.opposite(), EntrySide::Credit);
        assert_eq!(EntrySide::Credit.opposite(), EntrySide::Debit);
    }
}
