//! Tests for mapping rules and report derivation.

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sahakar_shared::types::AccountHeadId;

use crate::fiscal::FinancialYear;
use crate::ledger::{EntrySide, HeadTotals};

use super::derive::{balance_sheet_lines, profit_loss_lines};
use super::error::ReportError;
use super::mapping::{
    apply_mapping, ensure_balance_sheet_exclusive, remove_mapping, snapshot_amount,
};
use super::types::{MappingRecord, ReportKind, YearMappings};

fn record(head: AccountHeadId, side: EntrySide, kind: ReportKind, amount: Decimal) -> MappingRecord {
    MappingRecord {
        account_head_id: head,
        side,
        kind,
        total_amount: amount,
    }
}

fn totals(debit: Decimal, credit: Decimal) -> HeadTotals {
    HeadTotals { debit, credit }
}

#[test]
fn test_snapshot_amount_picks_mapped_side() {
    let t = totals(dec!(500), dec!(120));
    assert_eq!(snapshot_amount(&t, EntrySide::Debit), dec!(500));
    assert_eq!(snapshot_amount(&t, EntrySide::Credit), dec!(120));
}

#[test]
fn test_balance_sheet_exclusivity_rejects_opposite_side() {
    let head = AccountHeadId::new();
    let year = FinancialYear::new(2023);
    let existing = vec![record(
        head,
        EntrySide::Debit,
        ReportKind::BalanceSheet,
        dec!(100),
    )];

    let err = ensure_balance_sheet_exclusive(
        &existing,
        head,
        EntrySide::Credit,
        ReportKind::BalanceSheet,
        year,
    );
    assert!(matches!(err, Err(ReportError::OppositeSideMapped { .. })));

    // The mirror case rejects too.
    let existing = vec![record(
        head,
        EntrySide::Credit,
        ReportKind::BalanceSheet,
        dec!(100),
    )];
    assert!(
        ensure_balance_sheet_exclusive(
            &existing,
            head,
            EntrySide::Debit,
            ReportKind::BalanceSheet,
            year,
        )
        .is_err()
    );
}

#[test]
fn test_profit_loss_never_blocked_by_other_side() {
    let head = AccountHeadId::new();
    let year = FinancialYear::new(2023);
    let existing = vec![record(
        head,
        EntrySide::Debit,
        ReportKind::BalanceSheet,
        dec!(100),
    )];

    assert!(
        ensure_balance_sheet_exclusive(
            &existing,
            head,
            EntrySide::Credit,
            ReportKind::ProfitLoss,
            year,
        )
        .is_ok()
    );
    assert!(
        ensure_balance_sheet_exclusive(
            &existing,
            head,
            EntrySide::Credit,
            ReportKind::Construction,
            year,
        )
        .is_ok()
    );
}

#[test]
fn test_same_side_remap_to_balance_sheet_allowed() {
    // Re-mapping the side that already sits on the balance sheet is an
    // overwrite, not a collision.
    let head = AccountHeadId::new();
    let existing = vec![record(
        head,
        EntrySide::Debit,
        ReportKind::BalanceSheet,
        dec!(100),
    )];
    assert!(
        ensure_balance_sheet_exclusive(
            &existing,
            head,
            EntrySide::Debit,
            ReportKind::BalanceSheet,
            FinancialYear::new(2023),
        )
        .is_ok()
    );
}

#[test]
fn test_other_heads_do_not_collide() {
    let existing = vec![record(
        AccountHeadId::new(),
        EntrySide::Debit,
        ReportKind::BalanceSheet,
        dec!(100),
    )];
    assert!(
        ensure_balance_sheet_exclusive(
            &existing,
            AccountHeadId::new(),
            EntrySide::Credit,
            ReportKind::BalanceSheet,
            FinancialYear::new(2023),
        )
        .is_ok()
    );
}

#[test]
fn test_apply_mapping_upserts() {
    let head = AccountHeadId::new();
    let mut records = Vec::new();

    apply_mapping(
        &mut records,
        record(head, EntrySide::Debit, ReportKind::ProfitLoss, dec!(100)),
    );
    assert_eq!(records.len(), 1);

    // Same (head, side): overwrite in place.
    apply_mapping(
        &mut records,
        record(head, EntrySide::Debit, ReportKind::BalanceSheet, dec!(250)),
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, ReportKind::BalanceSheet);
    assert_eq!(records[0].total_amount, dec!(250));

    // Other side: a separate record.
    apply_mapping(
        &mut records,
        record(head, EntrySide::Credit, ReportKind::ProfitLoss, dec!(30)),
    );
    assert_eq!(records.len(), 2);
}

#[test]
fn test_remove_mapping_is_idempotent() {
    let head = AccountHeadId::new();
    let mut records = vec![record(
        head,
        EntrySide::Debit,
        ReportKind::ProfitLoss,
        dec!(100),
    )];

    assert!(remove_mapping(&mut records, head, EntrySide::Debit));
    assert!(records.is_empty());

    // Second removal: no error, nothing changes.
    assert!(!remove_mapping(&mut records, head, EntrySide::Debit));
    assert!(records.is_empty());
}

#[test]
fn test_profit_loss_lines_from_snapshot() {
    let rent = AccountHeadId::new();
    let years = vec![YearMappings {
        year: FinancialYear::new(2023),
        records: vec![record(
            rent,
            EntrySide::Debit,
            ReportKind::ProfitLoss,
            dec!(500),
        )],
    }];
    let names = HashMap::from([(rent, "Rent".to_string())]);

    let lines = profit_loss_lines(&years, &names);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].account_head_name, "Rent");
    assert_eq!(lines[0].amount, dec!(500));
    assert_eq!(lines[0].side, EntrySide::Debit);
    assert_eq!(lines[0].year, FinancialYear::new(2023));
}

#[test]
fn test_profit_loss_years_are_independent() {
    let dues = AccountHeadId::new();
    let years = vec![
        YearMappings {
            year: FinancialYear::new(2024),
            records: vec![record(
                dues,
                EntrySide::Credit,
                ReportKind::ProfitLoss,
                dec!(80),
            )],
        },
        YearMappings {
            year: FinancialYear::new(2023),
            records: vec![record(
                dues,
                EntrySide::Credit,
                ReportKind::ProfitLoss,
                dec!(60),
            )],
        },
    ];
    let lines = profit_loss_lines(&years, &HashMap::new());

    // Ascending year order, no accumulation between years.
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].year, FinancialYear::new(2023));
    assert_eq!(lines[0].amount, dec!(60));
    assert_eq!(lines[1].year, FinancialYear::new(2024));
    assert_eq!(lines[1].amount, dec!(80));
}

#[test]
fn test_profit_loss_skips_balance_sheet_records() {
    let head = AccountHeadId::new();
    let years = vec![YearMappings {
        year: FinancialYear::new(2023),
        records: vec![record(
            head,
            EntrySide::Debit,
            ReportKind::BalanceSheet,
            dec!(500),
        )],
    }];
    assert!(profit_loss_lines(&years, &HashMap::new()).is_empty());
}

#[test]
fn test_balance_sheet_pure_carry_forward() {
    // Mapped in two consecutive years, no activity in the second:
    // the amount carries through unchanged.
    let loan = AccountHeadId::new();
    let y2023 = FinancialYear::new(2023);
    let y2024 = FinancialYear::new(2024);

    let years = vec![
        YearMappings {
            year: y2023,
            records: vec![record(
                loan,
                EntrySide::Debit,
                ReportKind::BalanceSheet,
                dec!(0),
            )],
        },
        YearMappings {
            year: y2024,
            records: vec![record(
                loan,
                EntrySide::Debit,
                ReportKind::BalanceSheet,
                dec!(0),
            )],
        },
    ];
    let totals_by_year = HashMap::from([
        (y2023, HashMap::from([(loan, totals(dec!(700), dec!(100)))])),
        (y2024, HashMap::new()),
    ]);

    let lines = balance_sheet_lines(&years, &totals_by_year, &HashMap::new());
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].amount, dec!(600));
    assert_eq!(lines[1].amount, dec!(600));
}

#[test]
fn test_balance_sheet_carry_forward_accumulates_movement() {
    let loan = AccountHeadId::new();
    let y2023 = FinancialYear::new(2023);
    let y2024 = FinancialYear::new(2024);

    let years = vec![
        YearMappings {
            year: y2023,
            records: vec![record(
                loan,
                EntrySide::Credit,
                ReportKind::BalanceSheet,
                dec!(0),
            )],
        },
        YearMappings {
            year: y2024,
            records: vec![record(
                loan,
                EntrySide::Credit,
                ReportKind::BalanceSheet,
                dec!(0),
            )],
        },
    ];
    // Credit side: amount = credit + carry - debit.
    let totals_by_year = HashMap::from([
        (y2023, HashMap::from([(loan, totals(dec!(200), dec!(1000)))])),
        (y2024, HashMap::from([(loan, totals(dec!(300), dec!(50)))])),
    ]);

    let lines = balance_sheet_lines(&years, &totals_by_year, &HashMap::new());
    assert_eq!(lines[0].amount, dec!(800)); // 1000 + 0 - 200
    assert_eq!(lines[1].amount, dec!(550)); // 50 + 800 - 300
}

#[test]
fn test_balance_sheet_uses_live_totals_not_snapshot() {
    // The stored snapshot is stale (42); the derived line must reflect the
    // live ledger totals instead.
    let head = AccountHeadId::new();
    let year = FinancialYear::new(2023);
    let years = vec![YearMappings {
        year,
        records: vec![record(
            head,
            EntrySide::Debit,
            ReportKind::BalanceSheet,
            dec!(42),
        )],
    }];
    let totals_by_year = HashMap::from([(
        year,
        HashMap::from([(head, totals(dec!(900), dec!(150)))]),
    )]);

    let lines = balance_sheet_lines(&years, &totals_by_year, &HashMap::new());
    assert_eq!(lines[0].amount, dec!(750));
}

#[test]
fn test_balance_sheet_carry_forward_is_per_head() {
    let a = AccountHeadId::new();
    let b = AccountHeadId::new();
    let y2023 = FinancialYear::new(2023);
    let y2024 = FinancialYear::new(2024);

    let years = vec![
        YearMappings {
            year: y2023,
            records: vec![
                record(a, EntrySide::Debit, ReportKind::BalanceSheet, dec!(0)),
                record(b, EntrySide::Debit, ReportKind::BalanceSheet, dec!(0)),
            ],
        },
        YearMappings {
            year: y2024,
            records: vec![record(b, EntrySide::Debit, ReportKind::BalanceSheet, dec!(0))],
        },
    ];
    let totals_by_year = HashMap::from([
        (
            y2023,
            HashMap::from([
                (a, totals(dec!(100), dec!(0))),
                (b, totals(dec!(40), dec!(0))),
            ]),
        ),
        (y2024, HashMap::new()),
    ]);

    let lines = balance_sheet_lines(&years, &totals_by_year, &HashMap::new());
    assert_eq!(lines.len(), 3);
    // Head b's 2024 line carries only b's own amount.
    let b_2024 = lines
        .iter()
        .find(|l| l.account_head_id == b && l.year == y2024)
        .unwrap();
    assert_eq!(b_2024.amount, dec!(40));
}

#[test]
fn test_unknown_head_name_resolves_empty() {
    let head = AccountHeadId::new();
    let years = vec![YearMappings {
        year: FinancialYear::new(2023),
        records: vec![record(
            head,
            EntrySide::Debit,
            ReportKind::ProfitLoss,
            dec!(10),
        )],
    }];
    let lines = profit_loss_lines(&years, &HashMap::new());
    assert_eq!(lines[0].account_head_name, "");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Carry-forward chaining**: for a debit-side head mapped to the
    /// Balance Sheet in every year, the final amount equals the sum of the
    /// per-year net movements (debit - credit).
    #[test]
    fn prop_carry_forward_equals_sum_of_net_movements(
        movements in prop::collection::vec((0i64..100_000, 0i64..100_000), 1..8),
    ) {
        let head = AccountHeadId::new();
        let mut years = Vec::new();
        let mut totals_by_year = HashMap::new();
        let mut expected = Decimal::ZERO;

        for (i, (debit, credit)) in movements.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let year = FinancialYear::new(2020 + i as i32);
            let debit = Decimal::new(*debit, 2);
            let credit = Decimal::new(*credit, 2);
            expected += debit - credit;

            years.push(YearMappings {
                year,
                records: vec![record(head, EntrySide::Debit, ReportKind::BalanceSheet, dec!(0))],
            });
            totals_by_year.insert(year, HashMap::from([(head, totals(debit, credit))]));
        }

        let lines = balance_sheet_lines(&years, &totals_by_year, &HashMap::new());
        prop_assert_eq!(lines.last().unwrap().amount, expected);
    }

    /// **Upsert/remove round trip**: applying then removing a mapping
    /// restores the original record set, for any starting set.
    #[test]
    fn prop_apply_then_remove_round_trips(n in 0usize..6) {
        let mut records: Vec<MappingRecord> = (0..n)
            .map(|_| record(AccountHeadId::new(), EntrySide::Debit, ReportKind::ProfitLoss, dec!(1)))
            .collect();
        let original = records.clone();

        let head = AccountHeadId::new();
        apply_mapping(
            &mut records,
            record(head, EntrySide::Credit, ReportKind::Construction, dec!(9)),
        );
        prop_assert!(remove_mapping(&mut records, head, EntrySide::Credit));
        prop_assert_eq!(records, original);
    }
}
