//! Semicolon-delimited text export.

use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use super::ensure_not_empty;
use crate::domain::movement::DATE_FORMAT;
use crate::domain::Movement;
use crate::errors::{LedgerError, Result};
use crate::utils::commit_bytes;

pub const CSV_DELIMITER: u8 = b';';

const HEADER: [&str; 6] = ["Id", "Kind", "Amount", "Description", "Category", "Date"];

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    kind: &'static str,
    amount: String,
    description: &'a str,
    category: &'a str,
    date: String,
}

/// Serializes movements in input order: one header row, then one row per
/// movement, fields separated by `;`, UTF-8 encoded. Re-parsing with the
/// same delimiter reconstructs the original tuples.
pub fn render_csv(movements: &[Movement]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER).map_err(csv_error)?;
    for movement in movements {
        writer
            .serialize(CsvRow {
                id: movement.id,
                kind: movement.kind.label(),
                amount: movement.amount.to_string(),
                description: &movement.description,
                category: &movement.category,
                date: movement.date.format(DATE_FORMAT).to_string(),
            })
            .map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|err| LedgerError::Export(format!("CSV buffer flush failed: {err}")))
}

/// Renders and commits the delimited file. Fails with an export error when
/// there is nothing to report or the destination cannot be written.
pub fn export_csv(movements: &[Movement], path: &Path) -> Result<()> {
    ensure_not_empty(movements)?;
    let bytes = render_csv(movements)?;
    commit_bytes(path, &bytes)
        .map_err(|err| LedgerError::Export(format!("cannot write `{}`: {err}", path.display())))?;
    info!(path = %path.display(), rows = movements.len(), "CSV exported");
    Ok(())
}

fn csv_error(err: csv::Error) -> LedgerError {
    LedgerError::Export(format!("CSV encoding failed: {err}"))
}
