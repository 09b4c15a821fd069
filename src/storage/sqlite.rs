//! SQLite storage implementation

use super::schema::{self, ExistingColumn, TableSchema};
use crate::record::ScoreRecord;
use crate::{Result, StoreError};
use rusqlite::{params, Connection, DatabaseName};
use std::path::{Path, PathBuf};

/// SQLite-backed table of score records.
///
/// Holds at most one connection. Every operation reports failure as a
/// [`StoreError`]; nothing is retried and nothing is logged here.
#[derive(Debug, Default)]
pub struct ScoreStore {
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl ScoreStore {
    /// Create a store with no connection; call [`initialize`](Self::initialize)
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self::new();
        store.initialize(path)?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::OpenFailed(format!(":memory:: {}", e)))?;
        Self::initialize_schema(&conn, &schema::HIGH_SCORES)
            .map_err(|reason| StoreError::OpenFailed(format!(":memory:: {}", reason)))?;
        Ok(Self {
            conn: Some(conn),
            path: None,
        })
    }

    /// Open or create the file at `path` and make sure the schema is in place.
    ///
    /// Calling this again with the path that is already open does nothing.
    /// A different path replaces the current connection, but only once the
    /// new file has opened and passed the schema check.
    pub fn initialize(&mut self, path: &Path) -> Result<()> {
        if self.conn.is_some() && self.path.as_deref() == Some(path) {
            return Ok(());
        }

        let open_failed = |reason: String| StoreError::OpenFailed(format!("{}: {}", path.display(), reason));

        let conn = Connection::open(path).map_err(|e| open_failed(e.to_string()))?;
        if conn
            .is_readonly(DatabaseName::Main)
            .map_err(|e| open_failed(e.to_string()))?
        {
            return Err(open_failed("database file is read-only".to_string()));
        }
        Self::initialize_schema(&conn, &schema::HIGH_SCORES).map_err(open_failed)?;

        self.close();
        self.conn = Some(conn);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Create the table and indexes, then verify an existing table matches
    fn initialize_schema(conn: &Connection, table: &TableSchema) -> std::result::Result<(), String> {
        for stmt in table.all_statements() {
            conn.execute(&stmt, []).map_err(|e| e.to_string())?;
        }

        let table_sql: String = conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table.name],
                |row| row.get(0),
            )
            .map_err(|e| e.to_string())?;
        if let Some(mismatch) = table.check_table_sql(&table_sql) {
            return Err(format!("incompatible schema: {}", mismatch));
        }

        let mut stmt = conn
            .prepare(&format!(
                "SELECT name, type, \"notnull\", pk FROM pragma_table_info('{}') ORDER BY cid",
                table.name
            ))
            .map_err(|e| e.to_string())?;
        let existing = stmt
            .query_map([], |row| {
                Ok(ExistingColumn {
                    name: row.get(0)?,
                    declared_type: row.get(1)?,
                    not_null: row.get::<_, i64>(2)? != 0,
                    primary_key: row.get::<_, i64>(3)? != 0,
                })
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| e.to_string())?;

        match table.check_columns(&existing) {
            Some(mismatch) => Err(format!("incompatible schema: {}", mismatch)),
            None => Ok(()),
        }
    }

    /// Release the connection. Safe to call when nothing is open.
    pub fn close(&mut self) {
        self.conn = None;
        self.path = None;
    }

    /// Whether a connection is currently held
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Path of the open file (`None` when closed or in-memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(StoreError::NotOpen)
    }

    // ========== Record Operations ==========

    /// Validate and persist a record, writing the assigned id back into it
    pub fn insert(&self, record: &mut ScoreRecord) -> Result<i64> {
        let conn = self.conn()?;
        record.validate()?;

        conn.execute(
            &format!(
                "INSERT INTO {} (player_name, score, level_name, achieved_at, completion_time)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                schema::HIGH_SCORES.name
            ),
            params![
                record.player_name,
                record.score,
                record.level_name,
                record.achieved_at,
                record.completion_time,
            ],
        )
        .map_err(StoreError::WriteFailed)?;

        let id = conn.last_insert_rowid();
        record.id = id;
        Ok(id)
    }

    /// Highest scores across all levels, ties broken by insertion order
    pub fn query_top(&self, limit: i64) -> Result<Vec<ScoreRecord>> {
        self.query_ranked(None, limit)
    }

    /// Highest scores on one level (exact, case-sensitive match)
    pub fn query_top_for_level(&self, level_name: &str, limit: i64) -> Result<Vec<ScoreRecord>> {
        self.query_ranked(Some(level_name), limit)
    }

    fn query_ranked(&self, level_name: Option<&str>, limit: i64) -> Result<Vec<ScoreRecord>> {
        let conn = self.conn()?;
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let table = &schema::HIGH_SCORES;
        let filter = if level_name.is_some() {
            "WHERE level_name = ?1 ORDER BY score DESC, id ASC LIMIT ?2"
        } else {
            "ORDER BY score DESC, id ASC LIMIT ?1"
        };
        let sql = format!("SELECT {} FROM {} {}", table.column_list(), table.name, filter);

        let mut stmt = conn.prepare(&sql).map_err(StoreError::QueryFailed)?;
        let rows = match level_name {
            Some(level) => stmt.query_map(params![level, limit], row_to_record),
            None => stmt.query_map(params![limit], row_to_record),
        }
        .map_err(StoreError::QueryFailed)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::QueryFailed)
    }

    /// Count all records
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", schema::HIGH_SCORES.name),
                [],
                |row| row.get(0),
            )
            .map_err(StoreError::QueryFailed)?;
        Ok(count as usize)
    }

    /// Delete every record. The id sequence keeps counting.
    pub fn clear_all(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(&format!("DELETE FROM {}", schema::HIGH_SCORES.name), [])
            .map_err(StoreError::WriteFailed)?;
        Ok(())
    }
}

/// Helper to convert a row to a ScoreRecord (columns in schema order)
fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<ScoreRecord> {
    Ok(ScoreRecord {
        id: row.get(0)?,
        player_name: row.get(1)?,
        score: row.get(2)?,
        level_name: row.get(3)?,
        achieved_at: row.get(4)?,
        completion_time: row.get(5)?,
    })
}
