//! Input validation for cash book entries.
//!
//! All checks run before any mutation; a failed validation leaves storage
//! untouched.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::EntrySide;

/// Validates the raw input for a new cash book entry and resolves its side.
///
/// Rules:
/// - `side` must parse strictly ("debit"/"credit", case-insensitive)
/// - `amount` must be positive
/// - `account_head_name` must be non-blank
/// - `date` must not precede the society's financial year start, when set
///
/// # Errors
///
/// Returns the first violated rule as a `LedgerError`.
pub fn validate_new_entry(
    side: &str,
    amount: Decimal,
    account_head_name: &str,
    date: NaiveDate,
    financial_year_start: Option<NaiveDate>,
) -> Result<EntrySide, LedgerError> {
    let side = EntrySide::parse_strict(side)?;

    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(amount));
    }

    if account_head_name.trim().is_empty() {
        return Err(LedgerError::MissingAccountHead);
    }

    if let Some(start) = financial_year_start {
        if date < start {
            return Err(LedgerError::DateBeforeFinancialYearStart { date, start });
        }
    }

    Ok(side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_entry() {
        let side = validate_new_entry(
            "Debit",
            dec!(500),
            "Rent",
            date(2023, 5, 1),
            Some(date(2023, 4, 1)),
        )
        .unwrap();
        assert_eq!(side, EntrySide::Debit);
    }

    #[test]
    fn test_rejects_unknown_side() {
        let err = validate_new_entry("transfer", dec!(10), "Rent", date(2023, 5, 1), None);
        assert!(matches!(err, Err(LedgerError::InvalidSide(_))));
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        assert!(matches!(
            validate_new_entry("debit", dec!(0), "Rent", date(2023, 5, 1), None),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            validate_new_entry("debit", dec!(-5), "Rent", date(2023, 5, 1), None),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_rejects_blank_head_name() {
        assert!(matches!(
            validate_new_entry("debit", dec!(10), "   ", date(2023, 5, 1), None),
            Err(LedgerError::MissingAccountHead)
        ));
    }

    #[test]
    fn test_rejects_date_before_financial_year_start() {
        let err = validate_new_entry(
            "credit",
            dec!(10),
            "Salary",
            date(2023, 3, 31),
            Some(date(2023, 4, 1)),
        );
        assert!(matches!(
            err,
            Err(LedgerError::DateBeforeFinancialYearStart { .. })
        ));
    }

    #[test]
    fn test_no_floor_when_start_unset() {
        assert!(validate_new_entry("credit", dec!(10), "Salary", date(1990, 1, 1), None).is_ok());
    }
}
