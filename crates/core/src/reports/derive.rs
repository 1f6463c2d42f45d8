//! Derivation of the Profit & Loss and Balance Sheet views from accumulated
//! mapping records.
//!
//! Profit & Loss lines are independent per year and use the snapshotted
//! amount. Balance Sheet lines are recomputed from live ledger totals and
//! chain a running carry-forward per account head across years.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sahakar_shared::types::AccountHeadId;

use crate::fiscal::FinancialYear;
use crate::ledger::{EntrySide, HeadTotals};

use super::types::{MappingRecord, ReportKind, ReportLine, YearMappings};

fn sorted_by_year(years: &[YearMappings]) -> Vec<&YearMappings> {
    let mut sorted: Vec<&YearMappings> = years.iter().collect();
    sorted.sort_by_key(|y| y.year);
    sorted
}

fn head_name(names: &HashMap<AccountHeadId, String>, id: AccountHeadId) -> String {
    names.get(&id).cloned().unwrap_or_default()
}

/// Produces the Profit & Loss view: one line per profit-loss record across
/// all years, ascending by year, carrying the snapshotted amount.
#[must_use]
pub fn profit_loss_lines(
    years: &[YearMappings],
    names: &HashMap<AccountHeadId, String>,
) -> Vec<ReportLine> {
    let mut lines = Vec::new();
    for year_mappings in sorted_by_year(years) {
        for record in year_mappings
            .records
            .iter()
            .filter(|r| r.kind == ReportKind::ProfitLoss)
        {
            lines.push(ReportLine {
                account_head_id: record.account_head_id,
                account_head_name: head_name(names, record.account_head_id),
                amount: record.total_amount,
                side: record.side,
                year: year_mappings.year,
            });
        }
    }
    lines
}

/// Produces the Balance Sheet view with cross-year carry-forward.
///
/// For each balance-sheet record, years ascending:
///
/// ```text
/// amount = matching-side total + carryForward[head] - opposite-side total
/// ```
///
/// where the totals come from `totals_by_year` (live ledger aggregation for
/// that year, not the stored snapshot) and `carryForward[head]` is updated
/// to the computed amount so the next year inherits it. A head with no
/// activity in a year therefore carries its prior amount through unchanged.
#[must_use]
pub fn balance_sheet_lines(
    years: &[YearMappings],
    totals_by_year: &HashMap<FinancialYear, HashMap<AccountHeadId, HeadTotals>>,
    names: &HashMap<AccountHeadId, String>,
) -> Vec<ReportLine> {
    let mut carry_forward: HashMap<AccountHeadId, Decimal> = HashMap::new();
    let mut lines = Vec::new();

    for year_mappings in sorted_by_year(years) {
        let year_totals = totals_by_year.get(&year_mappings.year);

        for record in balance_sheet_records(&year_mappings.records) {
            let totals = year_totals
                .and_then(|t| t.get(&record.account_head_id))
                .copied()
                .unwrap_or_default();
            let prev = carry_forward
                .get(&record.account_head_id)
                .copied()
                .unwrap_or(Decimal::ZERO);

            let (matching, opposite) = match record.side {
                EntrySide::Credit => (totals.credit, totals.debit),
                EntrySide::Debit => (totals.debit, totals.credit),
            };
            let amount = matching + prev - opposite;

            lines.push(ReportLine {
                account_head_id: record.account_head_id,
                account_head_name: head_name(names, record.account_head_id),
                amount,
                side: record.side,
                year: year_mappings.year,
            });
            carry_forward.insert(record.account_head_id, amount);
        }
    }

    lines
}

fn balance_sheet_records(records: &[MappingRecord]) -> impl Iterator<Item = &MappingRecord> {
    records.iter().filter(|r| r.kind == ReportKind::BalanceSheet)
}
