//! SQLite-backed persistence for movements and accounts.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::domain::movement::DATE_FORMAT;
use crate::domain::{Account, Movement, MovementDraft};
use crate::errors::{LedgerError, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS movements (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    amount TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT '',
    date TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_movements_date ON movements(date);
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    credential TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0
);
";

const MOVEMENT_COLUMNS: &str = "id, kind, amount, description, category, date";

/// Owns the relational store. Every operation is a self-contained statement,
/// so each either fully applies or not at all. The connection sits behind a
/// mutex, making the store safe to share between a UI thread and a request
/// thread.
pub struct LedgerStore {
    conn: Mutex<Connection>,
}

impl LedgerStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %path.display(), "ledger store opened");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::Storage("store mutex poisoned".into()))
    }

    /// Inserts a new movement and returns its freshly assigned identifier.
    /// Identifiers are never reused after deletion (`AUTOINCREMENT`).
    pub fn add(&self, draft: &MovementDraft) -> Result<i64> {
        draft.validate()?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO movements (kind, amount, description, category, date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                draft.kind.as_str(),
                draft.amount.to_string(),
                draft.description,
                draft.category,
                draft.date.format(DATE_FORMAT).to_string(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(id, kind = draft.kind.as_str(), "movement added");
        Ok(id)
    }

    /// Replaces all editable fields of the movement with the given id.
    pub fn update(&self, id: i64, draft: &MovementDraft) -> Result<()> {
        draft.validate()?;
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE movements
             SET kind = ?1, amount = ?2, description = ?3, category = ?4, date = ?5
             WHERE id = ?6",
            params![
                draft.kind.as_str(),
                draft.amount.to_string(),
                draft.description,
                draft.category,
                draft.date.format(DATE_FORMAT).to_string(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(LedgerError::NotFound(id));
        }
        info!(id, "movement updated");
        Ok(())
    }

    /// Removes the movement. Deleting an unknown id is not an error.
    pub fn delete(&self, id: i64) -> Result<()> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM movements WHERE id = ?1", params![id])?;
        info!(id, removed, "movement delete");
        Ok(())
    }

    /// All movements within the given calendar month, most recent date first,
    /// ties broken by id descending. An out-of-range month or year yields an
    /// empty list rather than an error.
    pub fn movements_for_month(&self, month: u32, year: i32) -> Result<Vec<Movement>> {
        let Some(bounds) = month_bounds(month, year) else {
            return Ok(Vec::new());
        };
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements
             WHERE date >= ?1 AND date < ?2
             ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![bounds.0, bounds.1], row_to_movement)?;
        let movements = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(month, year, count = movements.len(), "month query");
        Ok(movements)
    }

    /// Every movement in the ledger, most recent date first.
    pub fn all_movements(&self) -> Result<Vec<Movement>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], row_to_movement)?;
        let movements = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = movements.len(), "full query");
        Ok(movements)
    }

    pub fn movement_count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movements", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // Account rows are only touched through `AccountService`.

    pub fn insert_account(&self, username: &str, credential: &str, is_admin: bool) -> Result<i64> {
        let conn = self.lock()?;
        let result = conn.execute(
            "INSERT INTO accounts (username, credential, is_admin) VALUES (?1, ?2, ?3)",
            params![username, credential, is_admin as i64],
        );
        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(LedgerError::Validation(format!(
                    "username `{username}` is already taken"
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn find_account(&self, username: &str) -> Result<Option<Account>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, username, credential, is_admin FROM accounts WHERE username = ?1",
        )?;
        let mut rows = stmt.query_map(params![username], row_to_account)?;
        rows.next().transpose().map_err(Into::into)
    }

    pub fn account_count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn update_credential(&self, username: &str, credential: &str) -> Result<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE accounts SET credential = ?1 WHERE username = ?2",
            params![credential, username],
        )?;
        if changed == 0 {
            return Err(LedgerError::AccountNotFound(username.to_string()));
        }
        Ok(())
    }

    pub fn list_usernames(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT username FROM accounts ORDER BY username")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}

/// Inclusive start and exclusive end of a calendar month as sortable text.
/// Half-open bounds keep month-boundary dates from leaking into a neighbour.
fn month_bounds(month: u32, year: i32) -> Option<(String, String)> {
    let start = chrono::NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        chrono::NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        chrono::NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((
        start.format(DATE_FORMAT).to_string(),
        end.format(DATE_FORMAT).to_string(),
    ))
}

fn row_to_movement(row: &Row<'_>) -> rusqlite::Result<Movement> {
    let kind: String = row.get(1)?;
    let amount: String = row.get(2)?;
    let date: String = row.get(5)?;
    Ok(Movement {
        id: row.get(0)?,
        kind: kind
            .parse()
            .map_err(|err| conversion_error(1, Box::new(err)))?,
        amount: amount
            .parse()
            .map_err(|err: rust_decimal::Error| conversion_error(2, Box::new(err)))?,
        description: row.get(3)?,
        category: row.get(4)?,
        date: chrono::NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|err| conversion_error(5, Box::new(err)))?,
    })
}

fn row_to_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        username: row.get(1)?,
        credential: row.get(2)?,
        is_admin: row.get::<_, i64>(3)? != 0,
    })
}

fn conversion_error(
    column: usize,
    err: Box<dyn std::error::Error + Send + Sync + 'static>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, err)
}
