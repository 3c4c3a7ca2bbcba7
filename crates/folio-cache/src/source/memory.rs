//! In-memory row source for testing.
//!
//! Rows are registered per exact query text. Queries can be made to fail
//! to exercise build aborts, and every executed query is logged.

use std::collections::HashMap;

use folio_common::error::{FolioError, FolioResult};
use parking_lot::{Mutex, RwLock};

use super::RowSource;
use crate::value::Row;

/// A row source serving canned rows keyed by query text.
#[derive(Debug, Default)]
pub struct MemorySource {
    /// Rows returned for each query.
    responses: RwLock<HashMap<String, Vec<Row>>>,
    /// Queries forced to fail, with their failure reason.
    failures: RwLock<HashMap<String, String>>,
    /// Every query executed, in order.
    log: Mutex<Vec<String>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rows returned for `query`, replacing any previous rows.
    pub fn set_rows(&self, query: impl Into<String>, rows: Vec<Row>) {
        self.responses.write().insert(query.into(), rows);
    }

    /// Builder form of [`MemorySource::set_rows`].
    pub fn with_rows(self, query: impl Into<String>, rows: Vec<Row>) -> Self {
        self.set_rows(query, rows);
        self
    }

    /// Makes `query` fail with `reason` until cleared.
    pub fn fail_query(&self, query: impl Into<String>, reason: impl Into<String>) {
        self.failures.write().insert(query.into(), reason.into());
    }

    /// Stops failing `query`.
    pub fn clear_failure(&self, query: &str) {
        self.failures.write().remove(query);
    }

    /// Returns every query executed so far.
    pub fn executed(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

impl RowSource for MemorySource {
    fn execute(&self, query: &str) -> FolioResult<Vec<Row>> {
        self.log.lock().push(query.to_string());

        if let Some(reason) = self.failures.read().get(query) {
            return Err(FolioError::source_query(query, reason.clone()));
        }

        self.responses
            .read()
            .get(query)
            .cloned()
            .ok_or_else(|| FolioError::source_query(query, "no such table"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RawValue;
    use folio_common::error::ErrorCode;

    #[test]
    fn test_rows_and_log() {
        let source = MemorySource::new().with_rows(
            "SELECT id, title FROM books",
            vec![Row::from(vec![RawValue::from(1), RawValue::from("Dune")])],
        );

        let rows = source.execute("SELECT id, title FROM books").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(source.executed(), vec!["SELECT id, title FROM books".to_string()]);
    }

    #[test]
    fn test_unknown_query_fails() {
        let source = MemorySource::new();
        let err = source.execute("SELECT 1").unwrap_err();
        assert_eq!(err.code(), ErrorCode::SourceQuery);
    }

    #[test]
    fn test_failure_injection() {
        let source = MemorySource::new().with_rows("q", Vec::new());
        source.fail_query("q", "disk I/O error");
        let err = source.execute("q").unwrap_err();
        assert!(err.to_string().contains("disk I/O error"));

        source.clear_failure("q");
        assert!(source.execute("q").unwrap().is_empty());
    }
}
