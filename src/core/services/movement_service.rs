//! Validated CRUD helpers over the ledger store, plus the per-month view
//! consumed by front ends for one render cycle.

use tracing::debug;

use crate::core::services::summary_service::{CategoryTotal, LedgerSummary, SummaryService};
use crate::domain::{Movement, MovementDraft};
use crate::errors::Result;
use crate::store::LedgerStore;

/// Snapshot of one month: the filtered movements together with the derived
/// figures a front end renders. Held transiently; nothing caches it.
#[derive(Debug, Clone)]
pub struct MonthView {
    pub month: u32,
    pub year: i32,
    pub movements: Vec<Movement>,
    pub summary: LedgerSummary,
    pub breakdown: Vec<CategoryTotal>,
}

pub struct MovementService;

impl MovementService {
    /// Adds a new movement and returns its identifier.
    pub fn add(store: &LedgerStore, draft: MovementDraft) -> Result<i64> {
        store.add(&draft)
    }

    /// Replaces all editable fields of the movement with the given id.
    pub fn update(store: &LedgerStore, id: i64, draft: MovementDraft) -> Result<()> {
        store.update(id, &draft)
    }

    /// Removes a movement; removing an unknown id is a no-op.
    pub fn delete(store: &LedgerStore, id: i64) -> Result<()> {
        store.delete(id)
    }

    pub fn list_month(store: &LedgerStore, month: u32, year: i32) -> Result<Vec<Movement>> {
        store.movements_for_month(month, year)
    }

    pub fn list_all(store: &LedgerStore) -> Result<Vec<Movement>> {
        store.all_movements()
    }

    /// Queries one month and derives its summary and category breakdown in a
    /// single pass, the unit of work behind every screen refresh.
    pub fn month_view(store: &LedgerStore, month: u32, year: i32) -> Result<MonthView> {
        let movements = store.movements_for_month(month, year)?;
        let summary = SummaryService::summary(&movements);
        let breakdown = SummaryService::category_breakdown(&movements);
        debug!(month, year, rows = movements.len(), "month view assembled");
        Ok(MonthView {
            month,
            year,
            movements,
            summary,
            breakdown,
        })
    }
}
