//! Mapping rules: snapshot selection, the balance-sheet exclusivity check,
//! and pure upsert/remove semantics over a year's record set.

use rust_decimal::Decimal;
use sahakar_shared::types::AccountHeadId;

use crate::fiscal::FinancialYear;
use crate::ledger::{EntrySide, HeadTotals};

use super::error::ReportError;
use super::types::{MappingRecord, ReportKind};

/// Picks the amount to snapshot for a new mapping: the head's total on the
/// mapped side of the trial balance.
#[must_use]
pub fn snapshot_amount(totals: &HeadTotals, side: EntrySide) -> Decimal {
    totals.on_side(side)
}

/// The auto-lock rule: a head may sit on the Balance Sheet with at most one
/// side per year. Mapping to Profit & Loss or Construction is never blocked
/// by the other side's state.
///
/// # Errors
///
/// Returns `ReportError::OppositeSideMapped` when `kind` is `BalanceSheet`
/// and the opposite side of the same head is already mapped there.
pub fn ensure_balance_sheet_exclusive(
    existing: &[MappingRecord],
    account_head_id: AccountHeadId,
    side: EntrySide,
    kind: ReportKind,
    year: FinancialYear,
) -> Result<(), ReportError> {
    if kind != ReportKind::BalanceSheet {
        return Ok(());
    }

    let opposite = side.opposite();
    let collides = existing.iter().any(|r| {
        r.account_head_id == account_head_id
            && r.side == opposite
            && r.kind == ReportKind::BalanceSheet
    });

    if collides {
        return Err(ReportError::OppositeSideMapped {
            account_head_id,
            year,
        });
    }
    Ok(())
}

/// Upserts a record into a year's record set: an existing record for the
/// same (head, side) is overwritten, otherwise the record is appended.
pub fn apply_mapping(records: &mut Vec<MappingRecord>, record: MappingRecord) {
    match records
        .iter_mut()
        .find(|r| r.account_head_id == record.account_head_id && r.side == record.side)
    {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Removes the record for (head, side), if present. Idempotent: removing an
/// absent record is a no-op and reports `false`.
pub fn remove_mapping(
    records: &mut Vec<MappingRecord>,
    account_head_id: AccountHeadId,
    side: EntrySide,
) -> bool {
    let before = records.len();
    records.retain(|r| !(r.account_head_id == account_head_id && r.side == side));
    records.len() != before
}
