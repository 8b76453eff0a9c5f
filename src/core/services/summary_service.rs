//! Derives monthly totals and category breakdowns from a movement snapshot.
//!
//! Everything here is a pure function of its input slice: no store access,
//! no hidden state. All arithmetic is decimal, so currency totals are exact
//! to the cent.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{Movement, MovementKind};

/// Label applied to empty or whitespace-only categories at aggregation time.
/// Stored values are left untouched.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Aggregate totals over a set of movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

/// One row of the per-category expense breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    /// Totals income, expense, and their balance. Empty input is all zero.
    pub fn summary(movements: &[Movement]) -> LedgerSummary {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        for movement in movements {
            match movement.kind {
                MovementKind::Income => total_income += movement.amount,
                MovementKind::Expense => total_expense += movement.amount,
            }
        }
        LedgerSummary {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }

    /// Per-category expense totals, largest first. Income movements never
    /// contribute. Equal totals are ordered by category name ascending so the
    /// output is deterministic.
    pub fn category_breakdown(movements: &[Movement]) -> Vec<CategoryTotal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for movement in movements {
            if movement.kind != MovementKind::Expense {
                continue;
            }
            let category = normalize_category(&movement.category);
            *totals.entry(category).or_default() += movement.amount;
        }
        let mut breakdown: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect();
        breakdown.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });
        breakdown
    }
}

fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn movement(id: i64, kind: MovementKind, amount: Decimal, category: &str) -> Movement {
        Movement {
            id,
            kind,
            amount,
            description: String::new(),
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        }
    }

    #[test]
    fn summary_of_empty_input_is_zero() {
        let summary = SummaryService::summary(&[]);
        assert_eq!(summary, LedgerSummary::default());
    }

    #[test]
    fn summary_signs_amounts_by_kind() {
        let movements = vec![
            movement(1, MovementKind::Income, dec!(1000.00), "Job"),
            movement(2, MovementKind::Expense, dec!(250.50), "Food"),
            movement(3, MovementKind::Expense, dec!(75.00), "Food"),
        ];
        let summary = SummaryService::summary(&movements);
        assert_eq!(summary.total_income, dec!(1000.00));
        assert_eq!(summary.total_expense, dec!(325.50));
        assert_eq!(summary.balance, dec!(674.50));
    }

    #[test]
    fn summary_is_additive_over_disjoint_slices() {
        let a = vec![
            movement(1, MovementKind::Income, dec!(10.10), ""),
            movement(2, MovementKind::Expense, dec!(3.33), ""),
        ];
        let b = vec![movement(3, MovementKind::Expense, dec!(6.67), "")];
        let combined: Vec<Movement> = a.iter().chain(b.iter()).cloned().collect();

        let left = SummaryService::summary(&a);
        let right = SummaryService::summary(&b);
        let whole = SummaryService::summary(&combined);
        assert_eq!(whole.total_income, left.total_income + right.total_income);
        assert_eq!(whole.total_expense, left.total_expense + right.total_expense);
        assert_eq!(whole.balance, left.balance + right.balance);
    }

    #[test]
    fn breakdown_ignores_income_movements() {
        let movements = vec![
            movement(1, MovementKind::Income, dec!(5000.00), "Job"),
            movement(2, MovementKind::Expense, dec!(40.00), "Transport"),
        ];
        let breakdown = SummaryService::category_breakdown(&movements);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category, "Transport");
        assert_eq!(breakdown[0].total, dec!(40.00));
    }

    #[test]
    fn breakdown_normalizes_blank_categories() {
        let movements = vec![
            movement(1, MovementKind::Expense, dec!(10.00), ""),
            movement(2, MovementKind::Expense, dec!(5.00), "   "),
        ];
        let breakdown = SummaryService::category_breakdown(&movements);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].category, UNCATEGORIZED);
        assert_eq!(breakdown[0].total, dec!(15.00));
    }

    #[test]
    fn breakdown_breaks_ties_by_name_ascending() {
        let movements = vec![
            movement(1, MovementKind::Expense, dec!(20.00), "Zoo"),
            movement(2, MovementKind::Expense, dec!(20.00), "Art"),
            movement(3, MovementKind::Expense, dec!(30.00), "Food"),
        ];
        let breakdown = SummaryService::category_breakdown(&movements);
        let names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, vec!["Food", "Art", "Zoo"]);
    }
}
