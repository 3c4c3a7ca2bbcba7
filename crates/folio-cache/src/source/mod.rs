//! The read-only row-query boundary to the backing store.
//!
//! Table builds issue static query text through [`RowSource::execute`] and
//! consume the returned rows in order. Implementations:
//!
//! - [`MemorySource`]: canned rows per query text, with failure injection
//! - [`SqliteSource`]: a SQLite connection (feature `sqlite`)

use std::sync::atomic::{AtomicU64, Ordering};

use folio_common::error::FolioResult;

use crate::value::Row;

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::MemorySource;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;

/// Synchronous, read-only query execution against the backing store.
///
/// Rows must be returned fully materialized and in store order. Failures
/// are reported as [`folio_common::FolioError::SourceQuery`].
pub trait RowSource: Send + Sync {
    /// Executes `query` and returns every row it produces.
    fn execute(&self, query: &str) -> FolioResult<Vec<Row>>;
}

impl<S: RowSource + ?Sized> RowSource for &S {
    fn execute(&self, query: &str) -> FolioResult<Vec<Row>> {
        (**self).execute(query)
    }
}

impl<S: RowSource + ?Sized> RowSource for std::sync::Arc<S> {
    fn execute(&self, query: &str) -> FolioResult<Vec<Row>> {
        (**self).execute(query)
    }
}

/// Wraps a source and counts the rows it returns.
pub(crate) struct CountingSource<'a> {
    inner: &'a dyn RowSource,
    rows: AtomicU64,
}

impl<'a> CountingSource<'a> {
    pub(crate) fn new(inner: &'a dyn RowSource) -> Self {
        Self {
            inner,
            rows: AtomicU64::new(0),
        }
    }

    pub(crate) fn rows(&self) -> u64 {
        self.rows.load(Ordering::Relaxed)
    }
}

impl RowSource for CountingSource<'_> {
    fn execute(&self, query: &str) -> FolioResult<Vec<Row>> {
        let rows = self.inner.execute(query)?;
        self.rows.fetch_add(rows.len() as u64, Ordering::Relaxed);
        Ok(rows)
    }
}
