mod common;

use chrono::NaiveDate;
use expense_core::domain::{MovementDraft, MovementKind};
use expense_core::errors::LedgerError;
use rust_decimal_macros::dec;

use common::setup_test_env;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn draft(
    kind: MovementKind,
    amount: rust_decimal::Decimal,
    description: &str,
    category: &str,
    day: NaiveDate,
) -> MovementDraft {
    MovementDraft::new(kind, amount, description, category, day)
}

#[test]
fn add_then_query_returns_matching_movement_with_fresh_id() {
    let (store, _config) = setup_test_env();
    let first = store
        .add(&draft(
            MovementKind::Income,
            dec!(1000.00),
            "Salary",
            "Job",
            date(2024, 3, 1),
        ))
        .unwrap();
    let second = store
        .add(&draft(
            MovementKind::Expense,
            dec!(250.50),
            "Groceries",
            "Food",
            date(2024, 3, 15),
        ))
        .unwrap();
    assert_ne!(first, second, "identifiers must be previously unseen");

    let movements = store.movements_for_month(3, 2024).unwrap();
    assert_eq!(movements.len(), 2);
    let salary = movements.iter().find(|m| m.id == first).unwrap();
    assert_eq!(salary.kind, MovementKind::Income);
    assert_eq!(salary.amount, dec!(1000.00));
    assert_eq!(salary.description, "Salary");
    assert_eq!(salary.category, "Job");
    assert_eq!(salary.date, date(2024, 3, 1));
}

#[test]
fn add_rejects_non_positive_amounts() {
    let (store, _config) = setup_test_env();
    let zero = store.add(&draft(
        MovementKind::Expense,
        dec!(0),
        "",
        "",
        date(2024, 1, 1),
    ));
    assert!(matches!(zero, Err(LedgerError::Validation(_))));
    let negative = store.add(&draft(
        MovementKind::Income,
        dec!(-10.00),
        "",
        "",
        date(2024, 1, 1),
    ));
    assert!(matches!(negative, Err(LedgerError::Validation(_))));
    assert_eq!(store.movement_count().unwrap(), 0, "no partial writes");
}

#[test]
fn update_replaces_all_editable_fields() {
    let (store, _config) = setup_test_env();
    let id = store
        .add(&draft(
            MovementKind::Expense,
            dec!(20.00),
            "Bus",
            "Transport",
            date(2024, 5, 2),
        ))
        .unwrap();
    store
        .update(
            id,
            &draft(
                MovementKind::Income,
                dec!(99.99),
                "Refund",
                "Misc",
                date(2024, 6, 3),
            ),
        )
        .unwrap();
    let movements = store.movements_for_month(6, 2024).unwrap();
    assert_eq!(movements.len(), 1);
    let updated = &movements[0];
    assert_eq!(updated.id, id, "identifier itself is immutable");
    assert_eq!(updated.kind, MovementKind::Income);
    assert_eq!(updated.amount, dec!(99.99));
    assert_eq!(updated.description, "Refund");
    assert_eq!(updated.category, "Misc");
}

#[test]
fn update_missing_id_fails_without_changing_rows() {
    let (store, _config) = setup_test_env();
    store
        .add(&draft(
            MovementKind::Expense,
            dec!(5.00),
            "",
            "",
            date(2024, 2, 2),
        ))
        .unwrap();
    let before = store.movement_count().unwrap();

    let result = store.update(
        9999,
        &draft(MovementKind::Expense, dec!(1.00), "", "", date(2024, 2, 2)),
    );
    assert!(matches!(result, Err(LedgerError::NotFound(9999))));
    assert_eq!(store.movement_count().unwrap(), before);
}

#[test]
fn delete_removes_and_is_idempotent() {
    let (store, _config) = setup_test_env();
    let id = store
        .add(&draft(
            MovementKind::Expense,
            dec!(12.00),
            "",
            "",
            date(2024, 4, 4),
        ))
        .unwrap();
    store.delete(id).unwrap();
    assert!(store
        .movements_for_month(4, 2024)
        .unwrap()
        .iter()
        .all(|m| m.id != id));
    // Second delete of the same identifier is not an error.
    store.delete(id).unwrap();
}

#[test]
fn month_query_orders_date_desc_then_id_desc() {
    let (store, _config) = setup_test_env();
    let early = store
        .add(&draft(
            MovementKind::Expense,
            dec!(1.00),
            "",
            "",
            date(2024, 3, 5),
        ))
        .unwrap();
    let late_first = store
        .add(&draft(
            MovementKind::Expense,
            dec!(2.00),
            "",
            "",
            date(2024, 3, 20),
        ))
        .unwrap();
    let late_second = store
        .add(&draft(
            MovementKind::Expense,
            dec!(3.00),
            "",
            "",
            date(2024, 3, 20),
        ))
        .unwrap();

    let ids: Vec<i64> = store
        .movements_for_month(3, 2024)
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect();
    // Most recent date first; same-date ties resolved newest insertion first.
    assert_eq!(ids, vec![late_second, late_first, early]);
}

#[test]
fn month_boundary_dates_stay_in_their_month() {
    let (store, _config) = setup_test_env();
    store
        .add(&draft(
            MovementKind::Expense,
            dec!(10.00),
            "",
            "",
            date(2024, 3, 31),
        ))
        .unwrap();
    assert!(store.movements_for_month(4, 2024).unwrap().is_empty());
    assert_eq!(store.movements_for_month(3, 2024).unwrap().len(), 1);
}

#[test]
fn out_of_range_months_yield_empty_not_error() {
    let (store, _config) = setup_test_env();
    store
        .add(&draft(
            MovementKind::Income,
            dec!(1.00),
            "",
            "",
            date(2024, 1, 1),
        ))
        .unwrap();
    assert!(store.movements_for_month(0, 2024).unwrap().is_empty());
    assert!(store.movements_for_month(13, 2024).unwrap().is_empty());
}

#[test]
fn all_movements_spans_months_in_date_order() {
    let (store, _config) = setup_test_env();
    store
        .add(&draft(
            MovementKind::Expense,
            dec!(1.00),
            "",
            "",
            date(2023, 12, 31),
        ))
        .unwrap();
    store
        .add(&draft(
            MovementKind::Income,
            dec!(2.00),
            "",
            "",
            date(2024, 1, 1),
        ))
        .unwrap();
    let movements = store.all_movements().unwrap();
    assert_eq!(movements.len(), 2);
    assert!(movements[0].date > movements[1].date);
}

#[test]
fn identifiers_are_not_reused_after_deletion() {
    let (store, _config) = setup_test_env();
    let first = store
        .add(&draft(
            MovementKind::Expense,
            dec!(1.00),
            "",
            "",
            date(2024, 1, 1),
        ))
        .unwrap();
    store.delete(first).unwrap();
    let second = store
        .add(&draft(
            MovementKind::Expense,
            dec!(2.00),
            "",
            "",
            date(2024, 1, 2),
        ))
        .unwrap();
    assert!(second > first);
}
