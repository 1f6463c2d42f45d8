//! The year-wise balance engine.
//!
//! Converts a loose set of dated entries plus a single initial balance into
//! year-scoped opening/closing balances and per-head debit/credit totals.
//!
//! Invariants:
//! - closing(Y) == opening(Y) + totalDebit(Y) - totalCredit(Y)
//! - opening(Y+1) == closing(Y) for consecutive years
//! - opening(firstYear) == the society's initial balance

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sahakar_shared::types::AccountHeadId;
use serde::{Deserialize, Serialize};

use crate::fiscal::FinancialYear;

use super::types::{EntrySide, LedgerEntry};

/// Debit/credit sub-totals for one account head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl HeadTotals {
    /// Accumulates one entry amount on the given side.
    pub fn add(&mut self, side: EntrySide, amount: Decimal) {
        match side {
            EntrySide::Debit => self.debit += amount,
            EntrySide::Credit => self.credit += amount,
        }
    }

    /// Net movement (debit minus credit).
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }

    /// The total on the given side.
    #[must_use]
    pub const fn on_side(&self, side: EntrySide) -> Decimal {
        match side {
            EntrySide::Debit => self.debit,
            EntrySide::Credit => self.credit,
        }
    }
}

/// One row of the trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account head ID.
    pub account_head_id: AccountHeadId,
    /// Account head name.
    pub account_head_name: String,
    /// Total debit for this head in the year.
    pub debit: Decimal,
    /// Total credit for this head in the year.
    pub credit: Decimal,
}

/// Debit/credit grand totals across all rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of row debits.
    pub debit: Decimal,
    /// Sum of row credits.
    pub credit: Decimal,
}

/// The trial balance for one financial year.
///
/// Opening and closing balances are reported separately; they are never
/// folded into the per-head rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    /// The financial year.
    pub year: FinancialYear,
    /// Running cash position at the start of the year.
    pub opening_balance: Decimal,
    /// Per-head rows, in first-seen order, plus zero rows for mapped but
    /// inactive heads.
    pub rows: Vec<TrialBalanceRow>,
    /// Grand totals over the rows.
    pub totals: TrialBalanceTotals,
    /// Running cash position at the end of the year.
    pub closing_balance: Decimal,
}

/// Determines the first financial year of a society.
///
/// Precedence: FY of the earliest entry date, then FY of the recorded
/// financial year start, then FY of the creation timestamp. Years between
/// the earliest entry and the recorded start contribute nothing to the
/// running balance, so the precedence only matters when entries predate the
/// recorded start.
#[must_use]
pub fn first_financial_year(
    entries: &[LedgerEntry],
    financial_year_start: Option<NaiveDate>,
    created_at: NaiveDate,
) -> FinancialYear {
    entries
        .iter()
        .map(|e| e.date)
        .min()
        .map(FinancialYear::of_date)
        .or(financial_year_start.map(FinancialYear::of_date))
        .unwrap_or_else(|| FinancialYear::of_date(created_at))
}

/// The balance engine for one society.
///
/// Holds the two scalars that anchor the balance chain; every computation
/// takes the entry slice explicitly so callers decide what to load.
#[derive(Debug, Clone, Copy)]
pub struct BalanceEngine {
    initial_balance: Decimal,
    first_year: FinancialYear,
}

impl BalanceEngine {
    /// Creates an engine from the society's initial balance and first
    /// financial year.
    #[must_use]
    pub const fn new(initial_balance: Decimal, first_year: FinancialYear) -> Self {
        Self {
            initial_balance,
            first_year,
        }
    }

    /// The first financial year this engine chains from.
    #[must_use]
    pub const fn first_year(&self) -> FinancialYear {
        self.first_year
    }

    /// Net movement (debit minus credit) over one year's entries.
    fn net_movement(entries: &[LedgerEntry], year: FinancialYear) -> Decimal {
        entries
            .iter()
            .filter(|e| year.contains(e.date))
            .map(|e| match e.side {
                EntrySide::Debit => e.amount,
                EntrySide::Credit => -e.amount,
            })
            .sum()
    }

    /// Opening balance for the requested year.
    ///
    /// Walks every year from the first year up to (but excluding) the
    /// requested one, accumulating net movement onto the initial balance.
    /// Requests at or before the first year return the initial balance
    /// unchanged.
    #[must_use]
    pub fn opening_balance(&self, entries: &[LedgerEntry], year: FinancialYear) -> Decimal {
        let mut running = self.initial_balance;
        let mut y = self.first_year;
        while y < year {
            running += Self::net_movement(entries, y);
            y = y.next();
        }
        running
    }

    /// Per-head debit/credit totals for one year, in first-seen entry order.
    #[must_use]
    pub fn head_rows(entries: &[LedgerEntry], year: FinancialYear) -> Vec<TrialBalanceRow> {
        let mut index: HashMap<AccountHeadId, usize> = HashMap::new();
        let mut rows: Vec<TrialBalanceRow> = Vec::new();

        for entry in entries.iter().filter(|e| year.contains(e.date)) {
            let i = *index.entry(entry.account_head_id).or_insert_with(|| {
                rows.push(TrialBalanceRow {
                    account_head_id: entry.account_head_id,
                    account_head_name: entry.account_head_name.clone(),
                    debit: Decimal::ZERO,
                    credit: Decimal::ZERO,
                });
                rows.len() - 1
            });
            match entry.side {
                EntrySide::Debit => rows[i].debit += entry.amount,
                EntrySide::Credit => rows[i].credit += entry.amount,
            }
        }

        rows
    }

    /// Debit/credit totals for a single head in one year.
    #[must_use]
    pub fn head_totals_for(
        entries: &[LedgerEntry],
        year: FinancialYear,
        account_head_id: AccountHeadId,
    ) -> HeadTotals {
        let mut totals = HeadTotals::default();
        for entry in entries
            .iter()
            .filter(|e| e.account_head_id == account_head_id && year.contains(e.date))
        {
            totals.add(entry.side, entry.amount);
        }
        totals
    }

    /// Debit/credit totals for every head active in one year.
    #[must_use]
    pub fn totals_by_head(
        entries: &[LedgerEntry],
        year: FinancialYear,
    ) -> HashMap<AccountHeadId, HeadTotals> {
        let mut totals: HashMap<AccountHeadId, HeadTotals> = HashMap::new();
        for entry in entries.iter().filter(|e| year.contains(e.date)) {
            totals
                .entry(entry.account_head_id)
                .or_default()
                .add(entry.side, entry.amount);
        }
        totals
    }

    /// Computes the trial balance for one year.
    ///
    /// `mapped_heads` carries (id, name) pairs of heads that have a report
    /// mapping for this year; any of them with no activity gets a zero-value
    /// row so previously mapped heads remain visible and re-classifiable.
    #[must_use]
    pub fn trial_balance(
        &self,
        entries: &[LedgerEntry],
        year: FinancialYear,
        mapped_heads: &[(AccountHeadId, String)],
    ) -> TrialBalance {
        let opening_balance = self.opening_balance(entries, year);
        let mut rows = Self::head_rows(entries, year);

        for (head_id, name) in mapped_heads {
            if !rows.iter().any(|r| r.account_head_id == *head_id) {
                rows.push(TrialBalanceRow {
                    account_head_id: *head_id,
                    account_head_name: name.clone(),
                    debit: Decimal::ZERO,
                    credit: Decimal::ZERO,
                });
            }
        }

        let totals = TrialBalanceTotals {
            debit: rows.iter().map(|r| r.debit).sum(),
            credit: rows.iter().map(|r| r.credit).sum(),
        };
        let closing_balance = opening_balance + totals.debit - totals.credit;

        TrialBalance {
            year,
            opening_balance,
            rows,
            totals,
            closing_balance,
        }
    }

    /// Distinct financial years touched by the entries, newest first.
    ///
    /// Falls back to the given year (normally the society's first FY) when
    /// no entries exist, so a fresh society still offers one selectable
    /// year.
    #[must_use]
    pub fn available_years(
        entries: &[LedgerEntry],
        fallback: FinancialYear,
    ) -> Vec<FinancialYear> {
        let mut years: Vec<FinancialYear> = entries
            .iter()
            .map(|e| FinancialYear::of_date(e.date))
            .collect();
        years.sort_unstable();
        years.dedup();
        if years.is_empty() {
            years.push(fallback);
        }
        years.reverse();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(head: AccountHeadId, name: &str, d: NaiveDate, side: EntrySide, amount: Decimal) -> LedgerEntry {
        LedgerEntry {
            id: Uuid::new_v4(),
            account_head_id: head,
            account_head_name: name.to_string(),
            date: d,
            side,
            amount,
        }
    }

    /// Initial balance 1000, FY start 2023-04-01, Debit Rent 500 and
    /// Credit Salary 200 during FY 2023.
    fn sample_society() -> (BalanceEngine, Vec<LedgerEntry>, AccountHeadId, AccountHeadId) {
        let rent = AccountHeadId::new();
        let salary = AccountHeadId::new();
        let entries = vec![
            entry(rent, "Rent", date(2023, 5, 1), EntrySide::Debit, dec!(500)),
            entry(salary, "Salary", date(2023, 6, 1), EntrySide::Credit, dec!(200)),
        ];
        let engine = BalanceEngine::new(dec!(1000), FinancialYear::new(2023));
        (engine, entries, rent, salary)
    }

    #[test]
    fn test_trial_balance_first_year() {
        let (engine, entries, rent, salary) = sample_society();
        let tb = engine.trial_balance(&entries, FinancialYear::new(2023), &[]);

        assert_eq!(tb.opening_balance, dec!(1000));
        assert_eq!(tb.closing_balance, dec!(1300));
        assert_eq!(tb.totals.debit, dec!(500));
        assert_eq!(tb.totals.credit, dec!(200));
        assert_eq!(tb.rows.len(), 2);

        let rent_row = tb.rows.iter().find(|r| r.account_head_id == rent).unwrap();
        assert_eq!(rent_row.account_head_name, "Rent");
        assert_eq!(rent_row.debit, dec!(500));
        assert_eq!(rent_row.credit, dec!(0));

        let salary_row = tb.rows.iter().find(|r| r.account_head_id == salary).unwrap();
        assert_eq!(salary_row.debit, dec!(0));
        assert_eq!(salary_row.credit, dec!(200));
    }

    #[test]
    fn test_trial_balance_following_empty_year() {
        let (engine, entries, _, _) = sample_society();
        let tb = engine.trial_balance(&entries, FinancialYear::new(2024), &[]);

        // Opening of 2024 is the closing of 2023; nothing moves.
        assert_eq!(tb.opening_balance, dec!(1300));
        assert_eq!(tb.closing_balance, dec!(1300));
        assert!(tb.rows.is_empty());
    }

    #[test]
    fn test_zero_row_injected_for_mapped_inactive_head() {
        let (engine, entries, _, _) = sample_society();
        let mapped = AccountHeadId::new();
        let tb = engine.trial_balance(
            &entries,
            FinancialYear::new(2024),
            &[(mapped, "Loan".to_string())],
        );

        assert_eq!(tb.rows.len(), 1);
        assert_eq!(tb.rows[0].account_head_id, mapped);
        assert_eq!(tb.rows[0].account_head_name, "Loan");
        assert_eq!(tb.rows[0].debit, dec!(0));
        assert_eq!(tb.rows[0].credit, dec!(0));
        // Zero rows do not disturb the balances.
        assert_eq!(tb.opening_balance, dec!(1300));
        assert_eq!(tb.closing_balance, dec!(1300));
    }

    #[test]
    fn test_no_duplicate_row_when_mapped_head_is_active() {
        let (engine, entries, rent, _) = sample_society();
        let tb = engine.trial_balance(
            &entries,
            FinancialYear::new(2023),
            &[(rent, "Rent".to_string())],
        );
        assert_eq!(
            tb.rows.iter().filter(|r| r.account_head_id == rent).count(),
            1
        );
    }

    #[test]
    fn test_opening_at_or_before_first_year_is_initial() {
        let (engine, entries, _, _) = sample_society();
        assert_eq!(
            engine.opening_balance(&entries, FinancialYear::new(2023)),
            dec!(1000)
        );
        assert_eq!(
            engine.opening_balance(&entries, FinancialYear::new(2020)),
            dec!(1000)
        );
    }

    #[test]
    fn test_march_entry_belongs_to_prior_financial_year() {
        let head = AccountHeadId::new();
        let entries = vec![entry(
            head,
            "Dues",
            date(2024, 3, 31),
            EntrySide::Debit,
            dec!(100),
        )];
        let engine = BalanceEngine::new(dec!(0), FinancialYear::new(2023));

        let tb_2023 = engine.trial_balance(&entries, FinancialYear::new(2023), &[]);
        assert_eq!(tb_2023.totals.debit, dec!(100));

        let tb_2024 = engine.trial_balance(&entries, FinancialYear::new(2024), &[]);
        assert!(tb_2024.rows.is_empty());
        assert_eq!(tb_2024.opening_balance, dec!(100));
    }

    #[test]
    fn test_first_financial_year_precedence() {
        let head = AccountHeadId::new();
        let early = vec![entry(
            head,
            "Dues",
            date(2021, 7, 1),
            EntrySide::Debit,
            dec!(10),
        )];

        // Earliest entry wins over the recorded start.
        assert_eq!(
            first_financial_year(&early, Some(date(2023, 4, 1)), date(2023, 4, 2)),
            FinancialYear::new(2021)
        );
        // No entries: recorded start wins over creation date.
        assert_eq!(
            first_financial_year(&[], Some(date(2023, 4, 1)), date(2025, 1, 1)),
            FinancialYear::new(2023)
        );
        // Nothing recorded: creation date is the last resort.
        assert_eq!(
            first_financial_year(&[], None, date(2025, 1, 1)),
            FinancialYear::new(2024)
        );
    }

    #[test]
    fn test_available_years_descending_with_fallback() {
        let head = AccountHeadId::new();
        let entries = vec![
            entry(head, "Dues", date(2022, 5, 1), EntrySide::Debit, dec!(1)),
            entry(head, "Dues", date(2024, 5, 1), EntrySide::Debit, dec!(1)),
            entry(head, "Dues", date(2024, 6, 1), EntrySide::Credit, dec!(1)),
        ];
        assert_eq!(
            BalanceEngine::available_years(&entries, FinancialYear::new(2020)),
            vec![FinancialYear::new(2024), FinancialYear::new(2022)]
        );
        assert_eq!(
            BalanceEngine::available_years(&[], FinancialYear::new(2020)),
            vec![FinancialYear::new(2020)]
        );
    }

    // ========================================================================
    // Property tests: the opening/closing chain
    // ========================================================================

    /// Strategy for a plausible entry within FY 2020..=2025.
    fn entry_strategy(heads: Vec<AccountHeadId>) -> impl Strategy<Value = LedgerEntry> {
        (
            0..heads.len(),
            2020i32..=2025,
            1u32..=12,
            1u32..=28,
            prop::bool::ANY,
            1i64..1_000_000,
        )
            .prop_map(move |(h, y, m, d, is_debit, amount)| LedgerEntry {
                id: Uuid::new_v4(),
                account_head_id: heads[h],
                account_head_name: format!("Head {h}"),
                date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
                side: if is_debit {
                    EntrySide::Debit
                } else {
                    EntrySide::Credit
                },
                amount: Decimal::new(amount, 2),
            })
    }

    fn entries_strategy() -> impl Strategy<Value = Vec<LedgerEntry>> {
        let heads: Vec<AccountHeadId> = (0..5).map(|_| AccountHeadId::new()).collect();
        prop::collection::vec(entry_strategy(heads), 0..60)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// **Opening/closing chain**: for every consecutive pair of years,
        /// opening(Y+1) equals closing(Y), and opening(firstYear) equals the
        /// initial balance.
        #[test]
        fn prop_opening_closing_chain(entries in entries_strategy(), initial in -500_000i64..500_000) {
            let initial = Decimal::new(initial, 2);
            let first = FinancialYear::new(2019);
            let engine = BalanceEngine::new(initial, first);

            prop_assert_eq!(engine.opening_balance(&entries, first), initial);

            let mut y = first;
            while y < FinancialYear::new(2027) {
                let tb = engine.trial_balance(&entries, y, &[]);
                let next_opening = engine.opening_balance(&entries, y.next());
                prop_assert_eq!(
                    tb.closing_balance,
                    next_opening,
                    "closing({:?}) must equal opening({:?})",
                    y,
                    y.next()
                );
                y = y.next();
            }
        }

        /// **Conservation**: closing == opening + totalDebit - totalCredit,
        /// and the row sums equal the reported totals.
        #[test]
        fn prop_conservation(entries in entries_strategy()) {
            let engine = BalanceEngine::new(dec!(1000), FinancialYear::new(2019));
            for y in 2019..2027 {
                let year = FinancialYear::new(y);
                let tb = engine.trial_balance(&entries, year, &[]);

                let row_debit: Decimal = tb.rows.iter().map(|r| r.debit).sum();
                let row_credit: Decimal = tb.rows.iter().map(|r| r.credit).sum();
                prop_assert_eq!(row_debit, tb.totals.debit);
                prop_assert_eq!(row_credit, tb.totals.credit);
                prop_assert_eq!(
                    tb.closing_balance,
                    tb.opening_balance + tb.totals.debit - tb.totals.credit
                );
            }
        }

        /// **Determinism**: the same entry set always yields the same report.
        #[test]
        fn prop_deterministic(entries in entries_strategy()) {
            let engine = BalanceEngine::new(dec!(0), FinancialYear::new(2019));
            let year = FinancialYear::new(2023);
            let a = engine.trial_balance(&entries, year, &[]);
            let b = engine.trial_balance(&entries, year, &[]);
            prop_assert_eq!(a.opening_balance, b.opening_balance);
            prop_assert_eq!(a.closing_balance, b.closing_balance);
            prop_assert_eq!(a.rows.len(), b.rows.len());
        }
    }
}
