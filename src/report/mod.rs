//! Serializes a month's ledger and summary into external artifacts: a
//! semicolon-delimited text file and a paginated PDF. Both exports commit
//! atomically; a failed export never leaves a partial file behind.

pub mod csv;
pub mod pdf;

pub use csv::{export_csv, render_csv, CSV_DELIMITER};
pub use pdf::{export_pdf, render_pdf};

use crate::domain::Movement;
use crate::errors::{LedgerError, Result};

fn ensure_not_empty(movements: &[Movement]) -> Result<()> {
    if movements.is_empty() {
        return Err(LedgerError::Export("nothing to report".into()));
    }
    Ok(())
}

/// Bounded-length copy for a fixed-width table cell. The stored value is
/// never mutated, only the rendered copy.
fn truncate_cell(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
