use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// Date format used for persistence; sorts lexicographically in date order.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Income/Expense classification of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Income,
    Expense,
}

impl MovementKind {
    /// Canonical lowercase key used in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Income => "income",
            MovementKind::Expense => "expense",
        }
    }

    /// Human-facing label used in reports and exports.
    pub const fn label(&self) -> &'static str {
        match self {
            MovementKind::Income => "Income",
            MovementKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MovementKind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(MovementKind::Income),
            "expense" => Ok(MovementKind::Expense),
            other => Err(LedgerError::Validation(format!(
                "unknown movement kind `{other}`"
            ))),
        }
    }
}

/// A single recorded income or expense entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: i64,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

/// The editable fields of a movement, used for both inserts and updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub kind: MovementKind,
    pub amount: Decimal,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
}

impl MovementDraft {
    pub fn new(
        kind: MovementKind,
        amount: Decimal,
        description: impl Into<String>,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            description: description.into(),
            category: category.into(),
            date,
        }
    }

    /// Amounts are stored as positive magnitudes and signed only by kind.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` date, mapping failures to a validation error.
pub fn parse_date(value: &str) -> Result<NaiveDate, LedgerError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|err| LedgerError::Validation(format!("malformed date `{value}`: {err}")))
}

/// Parses a decimal amount, mapping failures to a validation error.
pub fn parse_amount(value: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(value.trim())
        .map_err(|err| LedgerError::Validation(format!("malformed amount `{value}`: {err}")))
}
