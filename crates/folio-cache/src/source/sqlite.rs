//! SQLite-backed row source.

use std::path::Path;

use folio_common::error::{FolioError, FolioResult};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

use super::RowSource;
use crate::value::{RawValue, Row};

impl From<SqlValue> for RawValue {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => RawValue::Null,
            SqlValue::Integer(i) => RawValue::Integer(i),
            SqlValue::Real(f) => RawValue::Real(f),
            SqlValue::Text(s) => RawValue::Text(s),
            SqlValue::Blob(b) => RawValue::Blob(b),
        }
    }
}

/// A row source over one SQLite connection.
///
/// Queries are serialized on the connection.
pub struct SqliteSource {
    conn: Mutex<Connection>,
}

impl SqliteSource {
    /// Wraps an open connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> FolioResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            FolioError::source_query(format!("open {}", path.display()), e.to_string())
        })?;
        Ok(Self::new(conn))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> FolioResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| FolioError::source_query("open :memory:", e.to_string()))?;
        Ok(Self::new(conn))
    }

    /// Locks the underlying connection, e.g. to seed a fixture.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}

impl RowSource for SqliteSource {
    fn execute(&self, query: &str) -> FolioResult<Vec<Row>> {
        let conn = self.conn.lock();
        let fail = |e: rusqlite::Error| FolioError::source_query(query, e.to_string());

        let mut stmt = conn.prepare(query).map_err(fail)?;
        let column_count = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    let value: SqlValue = row.get(i)?;
                    values.push(RawValue::from(value));
                }
                Ok(Row::new(values))
            })
            .map_err(fail)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(fail)
    }
}
