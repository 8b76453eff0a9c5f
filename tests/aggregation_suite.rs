mod common;

use chrono::NaiveDate;
use expense_core::core::services::{MovementService, SummaryService};
use expense_core::domain::{MovementDraft, MovementKind};
use rust_decimal_macros::dec;

use common::setup_test_env;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// The canonical March scenario: one salary, two food expenses.
fn seed_march(store: &expense_core::store::LedgerStore) {
    for (kind, amount, description, category, day) in [
        (MovementKind::Income, dec!(1000.00), "Salary", "Job", 1),
        (MovementKind::Expense, dec!(250.50), "Groceries", "Food", 15),
        (MovementKind::Expense, dec!(75.00), "Bus pass", "Food", 20),
    ] {
        store
            .add(&MovementDraft::new(
                kind,
                amount,
                description,
                category,
                date(2024, 3, day),
            ))
            .unwrap();
    }
}

#[test]
fn march_scenario_summary_and_breakdown() {
    let (store, _config) = setup_test_env();
    seed_march(&store);

    let movements = store.movements_for_month(3, 2024).unwrap();
    assert_eq!(movements.len(), 3);
    assert_eq!(movements[0].date, date(2024, 3, 20), "newest date first");

    let summary = SummaryService::summary(&movements);
    assert_eq!(summary.total_income, dec!(1000.00));
    assert_eq!(summary.total_expense, dec!(325.50));
    assert_eq!(summary.balance, dec!(674.50));

    let breakdown = SummaryService::category_breakdown(&movements);
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].category, "Food");
    assert_eq!(breakdown[0].total, dec!(325.50));
}

#[test]
fn month_view_bundles_movements_with_derived_figures() {
    let (store, _config) = setup_test_env();
    seed_march(&store);

    let view = MovementService::month_view(&store, 3, 2024).unwrap();
    assert_eq!(view.month, 3);
    assert_eq!(view.year, 2024);
    assert_eq!(view.movements.len(), 3);
    assert_eq!(view.summary.balance, dec!(674.50));
    assert_eq!(view.breakdown.len(), 1);

    let empty = MovementService::month_view(&store, 4, 2024).unwrap();
    assert!(empty.movements.is_empty());
    assert_eq!(empty.summary.total_income, dec!(0));
    assert_eq!(empty.summary.total_expense, dec!(0));
    assert_eq!(empty.summary.balance, dec!(0));
}

#[test]
fn cent_level_sums_stay_exact_over_many_rows() {
    let (store, _config) = setup_test_env();
    // 0.10 added a hundred times must be exactly 10.00, the case binary
    // floating point famously gets wrong.
    for _ in 0..100 {
        store
            .add(&MovementDraft::new(
                MovementKind::Expense,
                dec!(0.10),
                "",
                "",
                date(2024, 7, 1),
            ))
            .unwrap();
    }
    let movements = store.movements_for_month(7, 2024).unwrap();
    let summary = SummaryService::summary(&movements);
    assert_eq!(summary.total_expense, dec!(10.00));
    assert_eq!(summary.balance, dec!(-10.00));
}
