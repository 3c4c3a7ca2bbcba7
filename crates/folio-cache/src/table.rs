//! Publication of one field's snapshots.
//!
//! A [`Table`] holds the current snapshot behind a read-write lock that is
//! only ever held for a pointer clone or a pointer swap. Builds run outside
//! that lock, serialized by a separate build mutex, so readers never wait
//! on a build and never observe a partially built snapshot.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use folio_common::config::{AuthorSortConfig, FieldMetadata};
use folio_common::error::FolioResult;
use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{info, warn};

use crate::adapter::ValueAdapters;
use crate::source::{CountingSource, RowSource};
use crate::stats::ReloadStats;
use crate::tables::TableSnapshot;

/// Everything a table build reads from.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
    /// Backing store queried for rows.
    pub source: &'a dyn RowSource,
    /// Shared value conversions.
    pub adapters: &'a ValueAdapters,
    /// Settings for derived author sort keys.
    pub author_sort: &'a AuthorSortConfig,
}

impl<'a> BuildContext<'a> {
    /// Creates a build context.
    pub fn new(
        source: &'a dyn RowSource,
        adapters: &'a ValueAdapters,
        author_sort: &'a AuthorSortConfig,
    ) -> Self {
        Self {
            source,
            adapters,
            author_sort,
        }
    }
}

/// Lifecycle state of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    /// No snapshot has been published yet.
    Unloaded,
    /// A build is in flight; readers still see the previous snapshot, if any.
    Loading,
    /// A snapshot is published and no build is in flight.
    Loaded,
}

/// One catalog field and its current snapshot.
#[derive(Debug)]
pub struct Table {
    /// Field metadata.
    meta: FieldMetadata,
    /// Current snapshot.
    current: RwLock<Option<Arc<TableSnapshot>>>,
    /// Serializes builds.
    build_lock: Mutex<()>,
    /// Whether a build is in flight.
    loading: AtomicBool,
    /// Number of snapshots published.
    generation: AtomicU64,
    /// Build statistics.
    stats: ReloadStats,
}

impl Table {
    /// Creates an unloaded table.
    pub fn new(meta: FieldMetadata) -> Self {
        Self {
            meta,
            current: RwLock::new(None),
            build_lock: Mutex::new(()),
            loading: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            stats: ReloadStats::new(),
        }
    }

    /// Returns the field metadata.
    pub fn meta(&self) -> &FieldMetadata {
        &self.meta
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> TableState {
        if self.loading.load(Ordering::Acquire) {
            TableState::Loading
        } else if self.current.read().is_some() {
            TableState::Loaded
        } else {
            TableState::Unloaded
        }
    }

    /// Pins the current snapshot. The snapshot stays valid for as long as
    /// the caller holds it, across any number of reloads.
    pub fn snapshot(&self) -> Option<Arc<TableSnapshot>> {
        self.current.read().clone()
    }

    /// Returns the number of snapshots published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Returns the build statistics.
    pub fn stats(&self) -> &ReloadStats {
        &self.stats
    }

    /// Builds a fresh snapshot and publishes it.
    ///
    /// A reload requested while another is in flight waits for it. On
    /// failure the previous snapshot stays published.
    pub fn reload(&self, ctx: &BuildContext<'_>) -> FolioResult<Arc<TableSnapshot>> {
        let guard = self.begin_build();
        let pending = guard.build(ctx)?;
        Ok(guard.publish(pending))
    }

    /// Takes the build lock and marks the table as loading.
    pub(crate) fn begin_build(&self) -> BuildGuard<'_> {
        let lock = self.build_lock.lock();
        self.loading.store(true, Ordering::Release);
        BuildGuard {
            table: self,
            _lock: lock,
        }
    }
}

/// A built snapshot awaiting publication.
pub(crate) struct PendingSnapshot {
    snapshot: TableSnapshot,
    rows: u64,
    elapsed: Duration,
}

/// Exclusive right to build and publish one table.
pub(crate) struct BuildGuard<'t> {
    table: &'t Table,
    _lock: MutexGuard<'t, ()>,
}

impl BuildGuard<'_> {
    /// Builds a snapshot without publishing it.
    pub(crate) fn build(&self, ctx: &BuildContext<'_>) -> FolioResult<PendingSnapshot> {
        let table = self.table;
        let start = Instant::now();
        let counting = CountingSource::new(ctx.source);
        let counted = BuildContext {
            source: &counting,
            ..*ctx
        };

        match TableSnapshot::load(&table.meta, &counted) {
            Ok(snapshot) => Ok(PendingSnapshot {
                snapshot,
                rows: counting.rows(),
                elapsed: start.elapsed(),
            }),
            Err(err) => {
                table.stats.record_failure(counting.rows());
                warn!(
                    table = %table.meta.name,
                    error = %err,
                    code = ?err.code(),
                    "table build failed; keeping the previous snapshot"
                );
                Err(err)
            }
        }
    }

    /// Swaps in a built snapshot and returns it.
    pub(crate) fn publish(self, pending: PendingSnapshot) -> Arc<TableSnapshot> {
        let table = self.table;
        let snapshot = Arc::new(pending.snapshot);
        *table.current.write() = Some(Arc::clone(&snapshot));
        let generation = table.generation.fetch_add(1, Ordering::AcqRel) + 1;
        table.stats.record_build(pending.rows, pending.elapsed);

        info!(
            table = %table.meta.name,
            generation,
            rows = pending.rows,
            books = snapshot.book_count(),
            elapsed_us = u64::try_from(pending.elapsed.as_micros()).unwrap_or(u64::MAX),
            "published table snapshot"
        );
        snapshot
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.table.loading.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::value::{DomainValue, RawValue, Row};
    use folio_common::error::ErrorCode;
    use folio_common::types::BookId;
    use std::thread;

    const TITLE_QUERY: &str = "SELECT id, title FROM books";

    fn title_table() -> Table {
        Table::new(FieldMetadata::one_to_one("title", "books", "title"))
    }

    fn titles(names: &[&str]) -> Vec<Row> {
        names
            .iter()
            .zip(1i64..)
            .map(|(name, id)| Row::from(vec![RawValue::from(id), RawValue::from(*name)]))
            .collect()
    }

    fn title_of(snapshot: &TableSnapshot, book: i64) -> Option<DomainValue> {
        snapshot
            .as_one_to_one()
            .and_then(|s| s.get(BookId::new(book)))
            .cloned()
    }

    #[test]
    fn test_lifecycle() {
        let table = title_table();
        assert_eq!(table.state(), TableState::Unloaded);
        assert!(table.snapshot().is_none());

        let source = MemorySource::new().with_rows(TITLE_QUERY, titles(&["Dune"]));
        let adapters = ValueAdapters::new();
        let author_sort = AuthorSortConfig::default();
        let ctx = BuildContext::new(&source, &adapters, &author_sort);

        table.reload(&ctx).unwrap();
        assert_eq!(table.state(), TableState::Loaded);
        assert_eq!(table.generation(), 1);
        assert_eq!(table.stats().builds(), 1);
        assert_eq!(table.stats().rows_read(), 1);
    }

    #[test]
    fn test_pinned_snapshot_survives_reload() {
        let table = title_table();
        let source = MemorySource::new().with_rows(TITLE_QUERY, titles(&["Dune"]));
        let adapters = ValueAdapters::new();
        let author_sort = AuthorSortConfig::default();
        let ctx = BuildContext::new(&source, &adapters, &author_sort);

        table.reload(&ctx).unwrap();
        let pinned = table.snapshot().unwrap();

        source.set_rows(TITLE_QUERY, titles(&["Children of Dune"]));
        table.reload(&ctx).unwrap();

        assert_eq!(title_of(&pinned, 1), Some(DomainValue::text("Dune")));
        assert_eq!(
            title_of(&table.snapshot().unwrap(), 1),
            Some(DomainValue::text("Children of Dune"))
        );
        assert_eq!(table.generation(), 2);
    }

    #[test]
    fn test_failed_build_keeps_previous() {
        let table = title_table();
        let source = MemorySource::new().with_rows(TITLE_QUERY, titles(&["Dune"]));
        let adapters = ValueAdapters::new();
        let author_sort = AuthorSortConfig::default();
        let ctx = BuildContext::new(&source, &adapters, &author_sort);

        table.reload(&ctx).unwrap();
        source.fail_query(TITLE_QUERY, "disk I/O error");

        let err = table.reload(&ctx).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SourceQuery);
        assert_eq!(table.state(), TableState::Loaded);
        assert_eq!(table.generation(), 1);
        assert_eq!(table.stats().failures(), 1);
        assert_eq!(
            title_of(&table.snapshot().unwrap(), 1),
            Some(DomainValue::text("Dune"))
        );
    }

    #[test]
    fn test_failed_first_build_stays_unloaded() {
        let table = title_table();
        let source = MemorySource::new();
        let adapters = ValueAdapters::new();
        let author_sort = AuthorSortConfig::default();
        let ctx = BuildContext::new(&source, &adapters, &author_sort);

        assert!(table.reload(&ctx).is_err());
        assert_eq!(table.state(), TableState::Unloaded);
    }

    #[test]
    fn test_loading_state_during_build() {
        let table = title_table();
        let guard = table.begin_build();
        assert_eq!(table.state(), TableState::Loading);
        drop(guard);
        assert_eq!(table.state(), TableState::Unloaded);
    }

    #[test]
    fn test_concurrent_reloads_serialize() {
        let table = Arc::new(title_table());
        let source = Arc::new(MemorySource::new().with_rows(TITLE_QUERY, titles(&["Dune"])));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                let source = Arc::clone(&source);
                thread::spawn(move || {
                    let adapters = ValueAdapters::new();
                    let author_sort = AuthorSortConfig::default();
                    let ctx = BuildContext::new(&*source, &adapters, &author_sort);
                    table.reload(&ctx).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(table.generation(), 8);
        assert_eq!(table.stats().builds(), 8);
        assert_eq!(table.state(), TableState::Loaded);
    }
}
